//! Async Task Machine
//!
//! This demo drives a single async call through IDLE/PENDING/RESOLVED/REJECTED.
//!
//! Key concepts:
//! - The machine stays synchronous; tokio runs the call
//! - Entering PENDING starts the call, the outcome settles it
//! - Retrying from RESOLVED or REJECTED
//!
//! Run with: cargo run --example fetch_task

use std::time::Duration;
use tagmachine::task::{task_definition, TaskMachine, TaskState};
use tokio::sync::mpsc;
use tokio::task::LocalSet;

async fn fetch(id: u32) -> Result<String, String> {
    tokio::time::sleep(Duration::from_millis(20)).await;
    if id % 3 == 0 {
        Err(format!("record {id} not found"))
    } else {
        Ok(format!("record {id}"))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("=== Async Task Machine ===\n");

    LocalSet::new()
        .run_until(async {
            let machine: TaskMachine<u32, String, String> =
                task_definition().spawn(TaskState::Idle);
            let (settled_tx, mut settled_rx) = mpsc::unbounded_channel();

            machine.subscribe(move |next, event, prev| {
                println!("  {prev:?} --{event:?}--> {next:?}");
                if !matches!(next, TaskState::Pending { .. }) {
                    let _ = settled_tx.send(());
                }
            });

            let weak = machine.downgrade();
            machine.on_pending(move |id| {
                let weak = weak.clone();
                let id = *id;
                tokio::task::spawn_local(async move {
                    let result = fetch(id).await;
                    if let Some(machine) = weak.upgrade() {
                        machine.settle(result);
                    }
                });
            });

            for id in [1, 3, 4] {
                println!("execute({id})");
                machine.execute(id);
                // Ignored: a call is already pending
                machine.execute(id + 100);
                settled_rx.recv().await;
            }

            println!("\nFinal state: {:?}", machine.state());
        })
        .await;

    println!("\n=== Demo Complete ===");
}
