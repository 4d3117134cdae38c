//! Build errors for transition tables.

use std::fmt;
use thiserror::Error;

/// A `(state, event)` pair registered more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub state: &'static str,
    pub event: &'static str,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}", self.state, self.event)
    }
}

/// Errors that can occur when building a transition table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("Transitions defined more than once: {}", list(.conflicts))]
    DuplicateTransitions { conflicts: Vec<Conflict> },
}

fn list(conflicts: &[Conflict]) -> String {
    conflicts
        .iter()
        .map(Conflict::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
