//! The event dispatcher surface of a machine.

use crate::core::{Event, State};
use crate::machine::instance::WeakMachine;
use std::fmt;
use std::rc::Rc;

/// Dispatchers for the events a machine knows about.
///
/// Every event kind that appears under any state of the table is accepted,
/// whether or not the current state handles it; an unhandled event is simply
/// ignored by the machine. `Events` does not keep the machine alive, so it can
/// be handed to subscribers without creating a reference cycle.
pub struct Events<S: State, E: Event> {
    machine: WeakMachine<S, E>,
    kinds: Rc<[E::Kind]>,
}

impl<S: State, E: Event> Events<S, E> {
    pub(crate) fn new(machine: WeakMachine<S, E>, kinds: Rc<[E::Kind]>) -> Self {
        Self { machine, kinds }
    }

    /// Dispatch `event` to the machine.
    ///
    /// No-op for kinds outside this surface, or once the machine is gone.
    pub fn send(&self, event: E) {
        if !self.contains(event.kind()) {
            tracing::trace!(event = event.name(), "event outside dispatcher surface");
            return;
        }
        if let Some(machine) = self.machine.upgrade() {
            machine.send(event);
        }
    }

    /// Kinds this surface dispatches.
    pub fn kinds(&self) -> &[E::Kind] {
        &self.kinds
    }

    pub fn contains(&self, kind: E::Kind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Whether sending `kind` right now would transition.
    pub fn can_send(&self, kind: E::Kind) -> bool {
        if !self.contains(kind) {
            return false;
        }
        self.machine.upgrade().is_some_and(|machine| {
            !machine.is_disposed() && machine.table().handles(machine.tag(), kind)
        })
    }

    /// A narrower surface exposing only `kinds`.
    pub fn pick<I>(&self, kinds: I) -> Self
    where
        I: IntoIterator<Item = E::Kind>,
    {
        let mut picked: Vec<E::Kind> = Vec::new();
        for kind in kinds {
            if self.contains(kind) && !picked.contains(&kind) {
                picked.push(kind);
            }
        }
        Self {
            machine: self.machine.clone(),
            kinds: picked.into(),
        }
    }
}

impl<S: State, E: Event> Clone for Events<S, E> {
    fn clone(&self) -> Self {
        Self {
            machine: self.machine.clone(),
            kinds: Rc::clone(&self.kinds),
        }
    }
}

impl<S: State, E: Event> fmt::Debug for Events<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Events").field("kinds", &self.kinds).finish()
    }
}
