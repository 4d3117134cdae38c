//! Transition functions.
//!
//! A transition is curried: it first sees the event (and so its parameters),
//! and produces a step that maps the current state to the next one. The event
//! decides the intent, the current state decides the mechanics.

use super::state::{Event, State};
use std::fmt;
use std::rc::Rc;

/// The second half of a transition: current state to next state.
///
/// May borrow from the event it was prepared for.
pub type Step<'a, S> = Box<dyn FnOnce(&S) -> S + 'a>;

type Handler<S, E> = dyn for<'a> Fn(&'a E) -> Step<'a, S>;

fn handler<S, E, F>(handler: F) -> Rc<Handler<S, E>>
where
    F: for<'a> Fn(&'a E) -> Step<'a, S> + 'static,
{
    Rc::new(handler)
}

/// A transition registered under a `(state tag, event kind)` pair.
///
/// Cloning is cheap; clones share the same handler.
///
/// # Example
///
/// ```rust
/// use tagmachine::core::Transition;
/// use tagmachine::{events, states};
///
/// states! {
///     #[derive(Clone, Debug, PartialEq)]
///     enum Counter: CounterTag {
///         Counting { total: u32 },
///     }
/// }
///
/// events! {
///     #[derive(Debug)]
///     enum CounterEvent: CounterKind {
///         Add(u32),
///     }
/// }
///
/// let add = Transition::with(|event: &CounterEvent, state: &Counter| {
///     let (CounterEvent::Add(n), Counter::Counting { total }) = (event, state);
///     Counter::Counting { total: total + n }
/// });
///
/// let next = add.apply(&CounterEvent::Add(2), &Counter::Counting { total: 1 });
/// assert_eq!(next, Counter::Counting { total: 3 });
/// ```
pub struct Transition<S, E> {
    handler: Rc<Handler<S, E>>,
}

impl<S: State, E: Event> Transition<S, E> {
    /// Build a transition from its curried form: `event -> (state -> state)`.
    ///
    /// The returned step must own what it needs from the event; use
    /// [`Transition::with`] to borrow event parameters instead.
    pub fn new<F, G>(transition: F) -> Self
    where
        F: Fn(&E) -> G + 'static,
        G: FnOnce(&S) -> S + 'static,
    {
        Self {
            handler: handler(move |event| {
                let step: Step<'_, S> = Box::new(transition(event));
                step
            }),
        }
    }

    /// Build a transition from a flat `(event, state) -> state` function.
    pub fn with<F>(transition: F) -> Self
    where
        F: Fn(&E, &S) -> S + 'static,
    {
        let transition = Rc::new(transition);
        Self {
            handler: handler(move |event| {
                let transition = Rc::clone(&transition);
                let step: Step<'_, S> = Box::new(move |state: &S| transition(event, state));
                step
            }),
        }
    }

    /// A transition that ignores the event and derives the next state from the
    /// current one.
    pub fn map<F>(transition: F) -> Self
    where
        F: Fn(&S) -> S + 'static,
    {
        Self::with(move |_: &E, state: &S| transition(state))
    }

    /// A transition that always lands on a freshly constructed state.
    pub fn to<F>(target: F) -> Self
    where
        F: Fn() -> S + 'static,
    {
        Self::with(move |_: &E, _: &S| target())
    }

    /// Feed the event in, getting back the state step.
    pub fn prepare<'a>(&self, event: &'a E) -> Step<'a, S> {
        (self.handler)(event)
    }

    /// Run both halves of the transition.
    pub fn apply(&self, event: &E, state: &S) -> S {
        self.prepare(event)(state)
    }
}

impl<S, E> Clone for Transition<S, E> {
    fn clone(&self) -> Self {
        Self {
            handler: Rc::clone(&self.handler),
        }
    }
}

impl<S, E> fmt::Debug for Transition<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Tag;
    use std::cell::Cell;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum TestTag {
        Start,
        Middle,
        End,
    }

    impl Tag for TestTag {
        const ALL: &'static [Self] = &[Self::Start, Self::Middle, Self::End];

        fn name(self) -> &'static str {
            match self {
                Self::Start => "Start",
                Self::Middle => "Middle",
                Self::End => "End",
            }
        }
    }

    #[derive(Clone, PartialEq, Debug)]
    enum TestState {
        Start,
        Middle { steps: u32 },
        End { label: String },
    }

    impl State for TestState {
        type Tag = TestTag;

        fn tag(&self) -> TestTag {
            match self {
                Self::Start => TestTag::Start,
                Self::Middle { .. } => TestTag::Middle,
                Self::End { .. } => TestTag::End,
            }
        }
    }

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum TestKind {
        Advance,
        Finish,
    }

    impl Tag for TestKind {
        const ALL: &'static [Self] = &[Self::Advance, Self::Finish];

        fn name(self) -> &'static str {
            match self {
                Self::Advance => "Advance",
                Self::Finish => "Finish",
            }
        }
    }

    #[derive(Debug)]
    enum TestEvent {
        Advance(u32),
        Finish(String),
    }

    impl Event for TestEvent {
        type Kind = TestKind;

        fn kind(&self) -> TestKind {
            match self {
                Self::Advance(_) => TestKind::Advance,
                Self::Finish(_) => TestKind::Finish,
            }
        }
    }

    fn steps(state: &TestState) -> u32 {
        match state {
            TestState::Middle { steps } => *steps,
            _ => 0,
        }
    }

    #[test]
    fn curried_transition_sees_event_before_state() {
        let seen_event = Rc::new(Cell::new(false));
        let flag = Rc::clone(&seen_event);

        let transition = Transition::new(move |event: &TestEvent| {
            flag.set(true);
            let by = match event {
                TestEvent::Advance(n) => *n,
                TestEvent::Finish(_) => 0,
            };
            move |state: &TestState| TestState::Middle {
                steps: steps(state) + by,
            }
        });

        let event = TestEvent::Advance(2);
        let step = transition.prepare(&event);
        assert!(seen_event.get());

        assert_eq!(step(&TestState::Middle { steps: 1 }), TestState::Middle { steps: 3 });
    }

    #[test]
    fn flat_transition_borrows_event_params() {
        let transition = Transition::with(|event: &TestEvent, _: &TestState| match event {
            TestEvent::Finish(label) => TestState::End {
                label: label.clone(),
            },
            TestEvent::Advance(_) => TestState::Start,
        });

        let next = transition.apply(&TestEvent::Finish("done".into()), &TestState::Start);
        assert_eq!(
            next,
            TestState::End {
                label: "done".into()
            }
        );
    }

    #[test]
    fn map_ignores_event() {
        let transition: Transition<TestState, TestEvent> = Transition::map(|state| TestState::Middle {
            steps: steps(state) + 1,
        });

        let first = transition.apply(&TestEvent::Advance(10), &TestState::Start);
        let second = transition.apply(&TestEvent::Finish("x".into()), &first);
        assert_eq!(second, TestState::Middle { steps: 2 });
    }

    #[test]
    fn to_builds_fresh_target() {
        let transition: Transition<TestState, TestEvent> = Transition::to(|| TestState::Start);

        let next = transition.apply(&TestEvent::Advance(1), &TestState::Middle { steps: 4 });
        assert_eq!(next, TestState::Start);
    }

    #[test]
    fn clones_share_handler() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let transition: Transition<TestState, TestEvent> = Transition::to(move || {
            counter.set(counter.get() + 1);
            TestState::Start
        });
        let clone = transition.clone();

        transition.apply(&TestEvent::Advance(0), &TestState::Start);
        clone.apply(&TestEvent::Advance(0), &TestState::Start);
        assert_eq!(calls.get(), 2);
    }
}
