//! The machine engine.
//!
//! A [`Definition`] binds a transition table; each [`Definition::spawn`]
//! produces an independent [`Machine`] that holds the current state, runs
//! the dispatch loop and notifies subscribers.
//!
//! # Key Concepts
//!
//! - **Dispatch**: `send` looks up `(current tag, event kind)`, swaps in the
//!   new state and notifies synchronously
//! - **Silence**: unhandled events and events after `dispose` are no-ops
//! - **Subscriptions**: explicit handles, cancelled only by `unsubscribe`

mod definition;
mod events;
mod instance;
mod subscription;

pub use definition::{create_machine, Definition, MachineId};
pub use events::Events;
pub use instance::{Machine, WeakMachine};
pub use subscription::{Cleanup, Subscription};
