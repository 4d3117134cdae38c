//! Filtered subscriptions without enter/exit bookkeeping.

use crate::core::{Event, State, Tag};
use crate::machine::{Machine, Subscription};

/// Which notifications a [`Machine::watch`] callback receives.
///
/// A notification matches when the new state's tag is one of `states`, and,
/// when set, the event kind equals `event` and the previous tag equals `from`.
///
/// # Example
///
/// ```
/// use tagmachine::router::Filter;
/// use tagmachine::{events, states};
///
/// states! {
///     #[derive(Debug)]
///     enum Door: DoorTag {
///         Open,
///         Closed,
///     }
/// }
///
/// events! {
///     #[derive(Debug)]
///     enum Action: ActionKind {
///         Close,
///         Slam,
///     }
/// }
///
/// let filter = Filter::states([DoorTag::Closed])
///     .event(ActionKind::Slam)
///     .from(DoorTag::Open);
///
/// assert!(filter.matches(DoorTag::Open, ActionKind::Slam, DoorTag::Closed));
/// assert!(!filter.matches(DoorTag::Open, ActionKind::Close, DoorTag::Closed));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Filter<T, K> {
    states: Vec<T>,
    event: Option<K>,
    from: Option<T>,
}

impl<T: Tag, K: Tag> Filter<T, K> {
    pub fn states<I>(states: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self {
            states: states.into_iter().collect(),
            event: None,
            from: None,
        }
    }

    /// Only notifications caused by this event kind.
    pub fn event(mut self, event: K) -> Self {
        self.event = Some(event);
        self
    }

    /// Only notifications leaving this state.
    pub fn from(mut self, from: T) -> Self {
        self.from = Some(from);
        self
    }

    pub fn matches(&self, prev: T, event: K, next: T) -> bool {
        self.states.contains(&next)
            && self.event.map_or(true, |wanted| wanted == event)
            && self.from.map_or(true, |wanted| wanted == prev)
    }
}

impl<S: State, E: Event> Machine<S, E> {
    /// Call `on_match(next, event, prev)` for every notification `filter`
    /// accepts.
    ///
    /// Unlike [`on_enter`](Self::on_enter), moving between two watched states
    /// fires again, and nothing fires at subscription time.
    pub fn watch<F>(&self, filter: Filter<S::Tag, E::Kind>, on_match: F) -> Subscription
    where
        F: Fn(&S, &E, &S) + 'static,
    {
        self.subscribe(move |next, event, prev| {
            if filter.matches(prev.tag(), event.kind(), next.tag()) {
                on_match(next, event, prev);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Transition, TransitionTable};
    use crate::machine::create_machine;
    use crate::{events, states};
    use std::cell::RefCell;
    use std::rc::Rc;

    states! {
        #[derive(Clone, PartialEq, Debug)]
        enum TestState: TestTag {
            Foo,
            Bar,
            Baz,
        }
    }

    events! {
        #[derive(Clone, PartialEq, Debug)]
        enum TestEvent: TestKind {
            Switch,
            SwitchBaz,
            Back,
        }
    }

    type Log = Rc<RefCell<Vec<String>>>;

    fn spawn() -> Machine<TestState, TestEvent> {
        let table = TransitionTable::builder()
            .on(TestTag::Foo, TestKind::Switch, Transition::to(|| TestState::Bar))
            .on(TestTag::Bar, TestKind::Switch, Transition::to(|| TestState::Foo))
            .on(TestTag::Bar, TestKind::SwitchBaz, Transition::to(|| TestState::Baz))
            .on(TestTag::Baz, TestKind::Back, Transition::to(|| TestState::Foo))
            .build()
            .unwrap();
        create_machine(table).spawn(TestState::Foo)
    }

    fn record(log: &Log) -> impl Fn(&TestState, &TestEvent, &TestState) + 'static {
        let log = Rc::clone(log);
        move |next: &TestState, event: &TestEvent, prev: &TestState| {
            log.borrow_mut()
                .push(format!("{} -{}-> {}", prev.name(), event.name(), next.name()))
        }
    }

    #[test]
    fn state_only_filter_fires_within_set_without_suppression() {
        let machine = spawn();
        let log: Log = Rc::default();
        machine.watch(Filter::states([TestTag::Foo, TestTag::Bar]), record(&log));

        machine.send(TestEvent::Switch);
        machine.send(TestEvent::Switch);
        machine.send(TestEvent::Switch);
        machine.send(TestEvent::SwitchBaz);

        assert_eq!(
            *log.borrow(),
            vec!["Foo -Switch-> Bar", "Bar -Switch-> Foo", "Foo -Switch-> Bar"]
        );
    }

    #[test]
    fn event_and_source_narrow_the_match() {
        let machine = spawn();
        let by_event: Log = Rc::default();
        let by_source: Log = Rc::default();
        machine.watch(
            Filter::states([TestTag::Foo]).event(TestKind::Back),
            record(&by_event),
        );
        machine.watch(
            Filter::states([TestTag::Foo]).from(TestTag::Bar),
            record(&by_source),
        );

        machine.send(TestEvent::Switch);
        machine.send(TestEvent::Switch);
        machine.send(TestEvent::Switch);
        machine.send(TestEvent::SwitchBaz);
        machine.send(TestEvent::Back);

        assert_eq!(*by_event.borrow(), vec!["Baz -Back-> Foo"]);
        assert_eq!(*by_source.borrow(), vec!["Bar -Switch-> Foo"]);
    }

    #[test]
    fn nothing_fires_at_subscription() {
        let machine = spawn();
        let log: Log = Rc::default();
        machine.watch(Filter::states([TestTag::Foo]), record(&log));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn empty_state_set_never_matches() {
        let filter: Filter<TestTag, TestKind> = Filter::states([]);
        assert!(!filter.matches(TestTag::Foo, TestKind::Switch, TestTag::Bar));
    }

    #[test]
    fn unsubscribe_stops_filtered_watcher() {
        let machine = spawn();
        let log: Log = Rc::default();
        let subscription = machine.watch(Filter::states([TestTag::Bar]), record(&log));

        subscription.unsubscribe();
        machine.send(TestEvent::Switch);

        assert!(log.borrow().is_empty());
        assert_eq!(machine.subscriber_count(), 0);
    }
}
