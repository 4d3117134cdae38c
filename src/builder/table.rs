//! Builder for constructing transition tables.

use crate::builder::error::{BuildError, Conflict};
use crate::core::{Event, State, Tag, Transition, TransitionTable};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for a [`TransitionTable`] with a fluent API.
///
/// Entries are checked together when the table is built, so a table with
/// several conflicting definitions reports all of them at once.
pub struct TableBuilder<S: State, E: Event> {
    entries: Vec<(S::Tag, E::Kind, Transition<S, E>)>,
}

impl<S: State, E: Event> TableBuilder<S, E> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register `transition` for `event` while in `state`.
    pub fn on(mut self, state: S::Tag, event: E::Kind, transition: Transition<S, E>) -> Self {
        self.entries.push((state, event, transition));
        self
    }

    /// Register the same transition for `event` in each of `states`.
    pub fn on_any<I>(mut self, states: I, event: E::Kind, transition: Transition<S, E>) -> Self
    where
        I: IntoIterator<Item = S::Tag>,
    {
        for state in states {
            self.entries.push((state, event, transition.clone()));
        }
        self
    }

    /// Check every entry, accumulating ALL conflicts.
    fn validate(&self) -> Validation<(), NonEmptyVec<Conflict>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<Conflict>>> = Vec::new();

        for (index, (state, event, _)) in self.entries.iter().enumerate() {
            // Report each conflicting pair once, on its second definition.
            let seen_before = self.entries[..index]
                .iter()
                .filter(|(s, e, _)| s == state && e == event)
                .count();

            let check = if seen_before == 1 {
                Validation::fail(Conflict {
                    state: state.name(),
                    event: event.name(),
                })
            } else {
                Validation::success(())
            };
            checks.push(check);
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Build the table.
    /// Returns an error if any `(state, event)` pair is defined twice.
    pub fn build(self) -> Result<TransitionTable<S, E>, BuildError> {
        match self.validate() {
            Validation::Success(_) => Ok(TransitionTable::from_entries(self.entries)),
            Validation::Failure(conflicts) => Err(BuildError::DuplicateTransitions {
                conflicts: conflicts.iter().copied().collect(),
            }),
        }
    }
}

impl<S: State, E: Event> Default for TableBuilder<S, E> {
    fn default() -> Self {
        Self::new()
    }
}
