//! Tagmachine: a small, embeddable finite-state-machine runtime
//!
//! States are tagged values drawn from a closed set; a transition table maps
//! `(state tag, event kind)` to a transition function. Spawning a definition
//! yields a live machine that owns its current state, dispatches events
//! synchronously and notifies subscribers with `(next, event, prev)`.
//!
//! # Core Concepts
//!
//! - **State / Event**: enums generated by [`states!`] and [`events!`]
//! - **Transition table**: built once with [`TableBuilder`], looked up per event
//! - **Machine**: the live instance; unhandled events are silent no-ops
//! - **Router**: enter/exit watchers, exact-transition watchers, filters
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use tagmachine::core::{Transition, TransitionTable};
//! use tagmachine::{create_machine, events, states, Cleanup};
//!
//! states! {
//!     #[derive(Clone, PartialEq, Debug)]
//!     enum Player: PlayerTag {
//!         Stopped,
//!         Playing { track: u32 },
//!         Paused { track: u32 },
//!     }
//! }
//!
//! events! {
//!     #[derive(Debug)]
//!     enum Control: ControlKind {
//!         Play(u32),
//!         Pause,
//!         Stop,
//!     }
//! }
//!
//! let table = TransitionTable::builder()
//!     .on(
//!         PlayerTag::Stopped,
//!         ControlKind::Play,
//!         Transition::new(|event: &Control| {
//!             let track = match event {
//!                 Control::Play(track) => *track,
//!                 _ => 0,
//!             };
//!             move |_: &Player| Player::Playing { track }
//!         }),
//!     )
//!     .on(
//!         PlayerTag::Playing,
//!         ControlKind::Pause,
//!         Transition::map(|state: &Player| match state {
//!             Player::Playing { track } => Player::Paused { track: *track },
//!             other => other.clone(),
//!         }),
//!     )
//!     .on(PlayerTag::Playing, ControlKind::Stop, Transition::to(|| Player::Stopped))
//!     .on(PlayerTag::Paused, ControlKind::Stop, Transition::to(|| Player::Stopped))
//!     .build()
//!     .unwrap();
//!
//! let machine = create_machine(table).spawn(Player::Stopped);
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&log);
//! machine.on_enter([PlayerTag::Playing, PlayerTag::Paused], move |_| {
//!     sink.borrow_mut().push("busy");
//!     let sink = Rc::clone(&sink);
//!     Some(Cleanup::new(move || sink.borrow_mut().push("idle")))
//! });
//!
//! machine.send(Control::Play(3));
//! machine.send(Control::Pause);
//! machine.send(Control::Pause);
//! machine.send(Control::Stop);
//!
//! assert_eq!(*machine.state(), Player::Stopped);
//! assert_eq!(*log.borrow(), vec!["busy", "idle"]);
//! ```

pub mod builder;
pub mod core;
pub mod machine;
pub mod router;
pub mod task;

// Re-export commonly used types
pub use builder::{BuildError, TableBuilder};
pub use core::{Event, State, Tag, Transition, TransitionTable};
pub use machine::{
    create_machine, Cleanup, Definition, Events, Machine, MachineId, Subscription, WeakMachine,
};
pub use router::{Filter, SpecError, TransitionSpec};
pub use task::{task_definition, task_table, TaskEvent, TaskMachine, TaskState, TaskStatus};
