//! Derived observation modes built on [`Machine::subscribe`].
//!
//! Every watcher here is a plain subscriber that re-reads the same
//! `(next, event, prev)` notification stream:
//!
//! - [`Machine::on_enter`]: fires on entering a group of states, with a
//!   cleanup that runs on leaving the group
//! - [`Machine::on_transition`] / [`Machine::on_transition_str`]: fires on an
//!   exact `from => event => to` triple
//! - [`Machine::watch`]: filtered subscribe with no enter/exit bookkeeping
//!
//! [`Machine::subscribe`]: crate::machine::Machine::subscribe
//! [`Machine::on_enter`]: crate::machine::Machine::on_enter
//! [`Machine::on_transition`]: crate::machine::Machine::on_transition
//! [`Machine::on_transition_str`]: crate::machine::Machine::on_transition_str
//! [`Machine::watch`]: crate::machine::Machine::watch

mod enter;
mod filter;
mod spec;
mod transition;

pub use filter::Filter;
pub use spec::{SpecError, TransitionSpec};
pub use transition::SpecFor;
