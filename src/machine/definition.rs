//! Machine definitions: a transition table ready to spawn instances.

use crate::core::{Event, State, TransitionTable};
use crate::machine::instance::Machine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

/// Identity of a spawned machine, attached to its log records.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MachineId(Uuid);

impl MachineId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A transition table bound into a machine factory.
///
/// Spawning is independent per call: every instance owns its own current
/// state, subscriber list and disposed flag. Only the immutable table is
/// shared. Cloning a definition is cheap.
///
/// # Example
///
/// ```
/// use tagmachine::core::{Transition, TransitionTable};
/// use tagmachine::{create_machine, events, states};
///
/// states! {
///     #[derive(Clone, Debug, PartialEq)]
///     enum Switch: SwitchTag {
///         Off,
///         On,
///     }
/// }
///
/// events! {
///     #[derive(Debug)]
///     enum Toggle: ToggleKind {
///         Flip,
///     }
/// }
///
/// let table = TransitionTable::builder()
///     .on(SwitchTag::Off, ToggleKind::Flip, Transition::to(|| Switch::On))
///     .on(SwitchTag::On, ToggleKind::Flip, Transition::to(|| Switch::Off))
///     .build()
///     .unwrap();
///
/// let definition = create_machine(table).with_label("switch");
/// let first = definition.spawn(Switch::Off);
/// let second = definition.spawn(Switch::Off);
///
/// first.send(Toggle::Flip);
/// assert_eq!(*first.state(), Switch::On);
/// assert_eq!(*second.state(), Switch::Off);
/// ```
pub struct Definition<S: State, E: Event> {
    table: Rc<TransitionTable<S, E>>,
    label: Option<Rc<str>>,
}

impl<S: State, E: Event> Definition<S, E> {
    pub fn new(table: TransitionTable<S, E>) -> Self {
        Self {
            table: Rc::new(table),
            label: None,
        }
    }

    /// Attach a label to every machine spawned from this definition.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(Rc::from(label.into()));
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn table(&self) -> &TransitionTable<S, E> {
        &self.table
    }

    /// Instantiate a live machine seeded with `initial`.
    pub fn spawn(&self, initial: S) -> Machine<S, E> {
        Machine::spawn(Rc::clone(&self.table), self.label.clone(), initial)
    }
}

impl<S: State, E: Event> Clone for Definition<S, E> {
    fn clone(&self) -> Self {
        Self {
            table: Rc::clone(&self.table),
            label: self.label.clone(),
        }
    }
}

impl<S: State, E: Event> From<TransitionTable<S, E>> for Definition<S, E> {
    fn from(table: TransitionTable<S, E>) -> Self {
        Self::new(table)
    }
}

impl<S: State, E: Event> fmt::Debug for Definition<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("label", &self.label)
            .field("table", &self.table)
            .finish()
    }
}

/// Bind a transition table into a [`Definition`] whose `spawn` creates machines.
pub fn create_machine<S: State, E: Event>(table: TransitionTable<S, E>) -> Definition<S, E> {
    Definition::new(table)
}
