//! Traffic Light State Machine
//!
//! This demo drives a cyclic machine and watches it from three angles.
//!
//! Key concepts:
//! - Cyclic state transitions (states repeat)
//! - Event parameters flowing into the next state
//! - Enter watchers with cleanup on exit
//! - Exact-transition watchers from the text spec form
//!
//! Run with: cargo run --example traffic_light

use tagmachine::core::{State, Transition, TransitionTable};
use tagmachine::{create_machine, events, states, Cleanup, Filter};

states! {
    #[derive(Clone, PartialEq, Debug)]
    enum TrafficLight: LightTag {
        Red,
        Green { seconds: u32 },
        Yellow,
    }
}

events! {
    #[derive(Debug)]
    enum Timer: TimerKind {
        Go(u32),
        Slow,
        Stop,
    }
}

fn main() {
    println!("=== Traffic Light State Machine ===\n");

    let table = TransitionTable::builder()
        .on(
            LightTag::Red,
            TimerKind::Go,
            Transition::new(|event: &Timer| {
                let seconds = match event {
                    Timer::Go(seconds) => *seconds,
                    _ => 0,
                };
                move |_: &TrafficLight| TrafficLight::Green { seconds }
            }),
        )
        .on(LightTag::Green, TimerKind::Slow, Transition::to(|| TrafficLight::Yellow))
        .on(LightTag::Yellow, TimerKind::Stop, Transition::to(|| TrafficLight::Red))
        .build()
        .unwrap();

    let machine = create_machine(table)
        .with_label("intersection")
        .spawn(TrafficLight::Red);

    println!("Traffic light machine spawned");
    println!("Initial state: {:?}\n", machine.state());

    // Pedestrians may cross while the light is red
    machine.on_enter([LightTag::Red], |_| {
        println!("  [walk] pedestrians may cross");
        Some(Cleanup::new(|| println!("  [walk] crossing closed")))
    });

    machine
        .on_transition_str(["Yellow => Stop => Red"], |_, _, _| {
            println!("  [camera] armed for red-light runners")
        })
        .unwrap();

    machine.watch(Filter::states([LightTag::Green]), |next, _, prev| {
        println!("  [display] {} -> {next:?}", prev.name())
    });

    println!("\nTransition sequence:");
    for cycle in 1..=2 {
        println!("Cycle {cycle}");
        machine.send(Timer::Go(30 * cycle));
        machine.send(Timer::Slow);
        machine.send(Timer::Stop);
    }

    println!("\nIgnored event (Slow while Red):");
    machine.send(Timer::Slow);
    println!("  still {:?}", machine.state());

    machine.dispose();
    machine.send(Timer::Go(10));
    println!("\nAfter dispose: {:?}", machine.state());

    println!("\nKey Characteristics:");
    println!("- Unhandled events are silent no-ops");
    println!("- No final state (cycles indefinitely)");
    println!("- Watchers are derived from a single notification stream");

    println!("\n=== Demo Complete ===");
}
