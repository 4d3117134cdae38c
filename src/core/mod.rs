//! Core state machine types.
//!
//! This module contains the data the engine runs on:
//! - Tags, states and events via the `Tag`, `State` and `Event` traits
//! - Curried transition functions
//! - The transition table they are registered in
//!
//! Nothing here holds mutable state; a table is built once and shared by
//! every machine spawned from it.

mod state;
mod table;
mod transition;

pub use state::{Event, State, Tag};
pub use table::TransitionTable;
pub use transition::{Step, Transition};
