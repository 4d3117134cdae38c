//! The transition table: `(state tag, event kind) -> transition`.

use super::state::{Event, State, Tag};
use super::transition::Transition;
use crate::builder::TableBuilder;
use std::collections::HashMap;
use std::fmt;

/// Lookup structure resolved once when the table is built.
///
/// Besides the per-state rows, the table remembers every event kind that
/// appears under any state, in first-registration order. Those are the events
/// a spawned machine accepts; whether one does anything depends on the state
/// the machine is in when it arrives.
pub struct TransitionTable<S: State, E: Event> {
    rows: HashMap<S::Tag, HashMap<E::Kind, Transition<S, E>>>,
    kinds: Vec<E::Kind>,
}

impl<S: State, E: Event> TransitionTable<S, E> {
    /// Start building a table.
    pub fn builder() -> TableBuilder<S, E> {
        TableBuilder::new()
    }

    pub(crate) fn from_entries(entries: Vec<(S::Tag, E::Kind, Transition<S, E>)>) -> Self {
        let mut rows: HashMap<S::Tag, HashMap<E::Kind, Transition<S, E>>> = HashMap::new();
        let mut kinds = Vec::new();

        for (state, event, transition) in entries {
            if !kinds.contains(&event) {
                kinds.push(event);
            }
            rows.entry(state).or_default().insert(event, transition);
        }

        Self { rows, kinds }
    }

    /// The transition registered for `event` while in `state`, if any.
    pub fn get(&self, state: S::Tag, event: E::Kind) -> Option<&Transition<S, E>> {
        self.rows.get(&state)?.get(&event)
    }

    /// Whether an `event` arriving in `state` would transition.
    pub fn handles(&self, state: S::Tag, event: E::Kind) -> bool {
        self.get(state, event).is_some()
    }

    /// Every event kind found under any state.
    pub fn kinds(&self) -> &[E::Kind] {
        &self.kinds
    }

    /// Event kinds with an entry under `state`, in the order of [`kinds`](Self::kinds).
    pub fn events_for(&self, state: S::Tag) -> Vec<E::Kind> {
        let Some(row) = self.rows.get(&state) else {
            return Vec::new();
        };
        self.kinds
            .iter()
            .copied()
            .filter(|kind| row.contains_key(kind))
            .collect()
    }

    /// States with at least one outgoing transition.
    pub fn states(&self) -> Vec<S::Tag> {
        <S::Tag as Tag>::ALL
            .iter()
            .copied()
            .filter(|tag| self.rows.get(tag).is_some_and(|row| !row.is_empty()))
            .collect()
    }

    /// Number of `(state, event)` entries.
    pub fn len(&self) -> usize {
        self.rows.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: State, E: Event> fmt::Debug for TransitionTable<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionTable")
            .field("states", &self.states())
            .field("kinds", &self.kinds)
            .field("entries", &self.len())
            .finish()
    }
}
