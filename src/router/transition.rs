//! Exact-transition watchers.

use crate::core::{Event, State};
use crate::machine::{Machine, Subscription};
use crate::router::spec::{SpecError, TransitionSpec};

/// Spec type matching a machine's tags and event kinds.
pub type SpecFor<S, E> = TransitionSpec<<S as State>::Tag, <E as Event>::Kind>;

impl<S: State, E: Event> Machine<S, E> {
    /// Call `on_transition(prev, event, next)` for transitions matching any of
    /// `specs` exactly.
    ///
    /// Nothing fires at subscription time.
    pub fn on_transition<I, F>(&self, specs: I, on_transition: F) -> Subscription
    where
        I: IntoIterator<Item = SpecFor<S, E>>,
        F: Fn(&S, &E, &S) + 'static,
    {
        let specs: Vec<SpecFor<S, E>> = specs.into_iter().collect();

        self.subscribe(move |next, event, prev| {
            let (from, kind, to) = (prev.tag(), event.kind(), next.tag());
            if specs.iter().any(|spec| spec.matches(from, kind, to)) {
                on_transition(prev, event, next);
            }
        })
    }

    /// Like [`on_transition`](Self::on_transition), reading specs in their
    /// `"A => E => B"` text form.
    ///
    /// Every spec must parse and its source state must handle its event in
    /// this machine's table; otherwise nothing is subscribed and all problems
    /// are reported together.
    ///
    /// # Example
    ///
    /// ```
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    /// use tagmachine::core::{Transition, TransitionTable};
    /// use tagmachine::{create_machine, events, states, SpecError};
    ///
    /// states! {
    ///     #[derive(Debug)]
    ///     enum Toggle: ToggleTag {
    ///         Foo,
    ///         Bar,
    ///     }
    /// }
    ///
    /// events! {
    ///     #[derive(Debug)]
    ///     enum Flip: FlipKind {
    ///         Switch,
    ///     }
    /// }
    ///
    /// let table = TransitionTable::builder()
    ///     .on(ToggleTag::Foo, FlipKind::Switch, Transition::to(|| Toggle::Bar))
    ///     .on(ToggleTag::Bar, FlipKind::Switch, Transition::to(|| Toggle::Foo))
    ///     .build()
    ///     .unwrap();
    /// let machine = create_machine(table).spawn(Toggle::Foo);
    ///
    /// let hits = Rc::new(Cell::new(0));
    /// let counter = Rc::clone(&hits);
    /// machine
    ///     .on_transition_str(["Foo => Switch => Bar"], move |_, _, _| counter.set(counter.get() + 1))
    ///     .unwrap();
    ///
    /// machine.send(Flip::Switch);
    /// machine.send(Flip::Switch);
    /// assert_eq!(hits.get(), 1);
    ///
    /// let err = machine.on_transition_str(["Foo -> Bar"], |_, _, _| {}).unwrap_err();
    /// assert!(matches!(err, SpecError::Malformed { .. }));
    /// ```
    pub fn on_transition_str<'a, I, F>(
        &self,
        specs: I,
        on_transition: F,
    ) -> Result<Subscription, SpecError>
    where
        I: IntoIterator<Item = &'a str>,
        F: Fn(&S, &E, &S) + 'static,
    {
        let specs = self.resolve_specs(specs)?;
        Ok(self.on_transition(specs, on_transition))
    }

    /// Parse text specs and check them against the table.
    pub fn resolve_specs<'a, I>(&self, specs: I) -> Result<Vec<SpecFor<S, E>>, SpecError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let parsed = TransitionSpec::parse_all(specs)?;

        let unhandled: Vec<SpecError> = parsed
            .iter()
            .filter(|spec| !self.table().handles(spec.from, spec.event))
            .map(|spec| SpecError::Unhandled {
                spec: spec.to_string(),
            })
            .collect();

        match SpecError::from_errors(unhandled) {
            None => Ok(parsed),
            Some(error) => Err(error),
        }
    }
}
