//! Live machine instances and the dispatch loop.

use crate::core::{Event, State, TransitionTable};
use crate::machine::definition::MachineId;
use crate::machine::events::Events;
use crate::machine::subscription::Subscription;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::Span;

type Callback<S, E> = dyn Fn(&S, &E, &S);

struct Slot<S, E> {
    id: u64,
    active: Cell<bool>,
    callback: Box<Callback<S, E>>,
}

struct Inner<S: State, E: Event> {
    id: MachineId,
    label: Option<Rc<str>>,
    span: Span,
    table: Rc<TransitionTable<S, E>>,
    current: RefCell<Rc<S>>,
    subscribers: RefCell<Vec<Rc<Slot<S, E>>>>,
    next_slot: Cell<u64>,
    disposed: Cell<bool>,
}

/// A running state machine.
///
/// `Machine` is a handle: clones refer to the same instance. The instance
/// owns its current state and subscriber list; nothing outside it can
/// replace either.
///
/// Dispatch is synchronous. [`send`](Self::send) swaps the state and notifies
/// every subscriber before returning. Notification walks a snapshot of the
/// subscriber list taken when the round starts: subscribers removed during
/// the round are skipped, subscribers added during the round are first
/// notified on the next event.
///
/// A subscriber that sends another event re-enters the dispatcher. The nested
/// dispatch runs to completion first, so subscribers later in the outer round
/// receive the outer `(next, event, prev)` triple while [`state`](Self::state)
/// already reports the nested result.
///
/// Transition functions and subscribers are caller code and may panic. A
/// panicking transition leaves the state untouched; a panicking subscriber
/// stops the rest of that round after the state has already changed.
pub struct Machine<S: State, E: Event> {
    inner: Rc<Inner<S, E>>,
}

impl<S: State, E: Event> Machine<S, E> {
    pub(crate) fn spawn(
        table: Rc<TransitionTable<S, E>>,
        label: Option<Rc<str>>,
        initial: S,
    ) -> Self {
        let id = MachineId::new();
        let span = tracing::debug_span!("machine", id = %id, label = ?label.as_deref());
        span.in_scope(|| tracing::debug!(state = initial.name(), "spawned"));

        Self {
            inner: Rc::new(Inner {
                id,
                label,
                span,
                table,
                current: RefCell::new(Rc::new(initial)),
                subscribers: RefCell::new(Vec::new()),
                next_slot: Cell::new(0),
                disposed: Cell::new(false),
            }),
        }
    }

    pub fn id(&self) -> MachineId {
        self.inner.id
    }

    pub fn label(&self) -> Option<&str> {
        self.inner.label.as_deref()
    }

    pub fn table(&self) -> &TransitionTable<S, E> {
        &self.inner.table
    }

    /// The current state.
    ///
    /// A pure read: between two notifications every call returns the same
    /// `Rc`.
    pub fn state(&self) -> Rc<S> {
        Rc::clone(&self.inner.current.borrow())
    }

    /// Tag of the current state.
    pub fn tag(&self) -> S::Tag {
        self.inner.current.borrow().tag()
    }

    /// Dispatch an event.
    ///
    /// Silently ignored when the machine is disposed or the current state has
    /// no transition for the event's kind.
    pub fn send(&self, event: E) {
        let inner = &self.inner;
        let _entered = inner.span.enter();

        if inner.disposed.get() {
            tracing::trace!(event = event.name(), "ignored event on disposed machine");
            return;
        }

        let prev = self.state();
        let Some(transition) = inner.table.get(prev.tag(), event.kind()) else {
            tracing::trace!(
                state = prev.name(),
                event = event.name(),
                "ignored event without transition"
            );
            return;
        };

        let next = Rc::new(transition.apply(&event, &prev));
        *inner.current.borrow_mut() = Rc::clone(&next);

        tracing::debug!(
            from = prev.name(),
            event = event.name(),
            to = next.name(),
            "transition"
        );

        let round = inner.subscribers.borrow().clone();
        for slot in round {
            if slot.active.get() {
                (slot.callback)(&next, &event, &prev);
            }
        }
    }

    /// The dispatcher surface: every event kind found in the table.
    pub fn events(&self) -> Events<S, E> {
        Events::new(self.downgrade(), self.inner.table.kinds().into())
    }

    /// Receive every `(next, event, prev)` notification.
    ///
    /// Subscribing to a disposed machine yields an inactive subscription.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&S, &E, &S) + 'static,
    {
        let inner = &self.inner;
        if inner.disposed.get() {
            return Subscription::inert();
        }

        let id = inner.next_slot.get();
        inner.next_slot.set(id + 1);

        let slot = Rc::new(Slot {
            id,
            active: Cell::new(true),
            callback: Box::new(callback),
        });
        let handle = Rc::downgrade(&slot);
        inner.subscribers.borrow_mut().push(slot);
        tracing::trace!(parent: &inner.span, slot = id, "subscribed");

        let machine = Rc::downgrade(inner);
        Subscription::new(move || {
            if let Some(slot) = handle.upgrade() {
                slot.active.set(false);
            }
            let Some(inner) = machine.upgrade() else {
                return;
            };
            let removed = {
                let mut subscribers = inner.subscribers.borrow_mut();
                subscribers
                    .iter()
                    .position(|slot| slot.id == id)
                    .map(|index| subscribers.remove(index))
            };
            if removed.is_some() {
                tracing::trace!(parent: &inner.span, slot = id, "unsubscribed");
            }
        })
    }

    /// Make the machine permanently inert.
    ///
    /// Clears the subscriber list; later events are ignored and later
    /// subscriptions are never registered. Idempotent. Cleanups pending in
    /// enter watchers only run through their own subscription.
    pub fn dispose(&self) {
        let inner = &self.inner;
        if inner.disposed.replace(true) {
            return;
        }

        let slots = std::mem::take(&mut *inner.subscribers.borrow_mut());
        for slot in &slots {
            slot.active.set(false);
        }
        tracing::debug!(parent: &inner.span, subscribers = slots.len(), "disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    /// Number of registered subscriptions, derived watchers included.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// A reference that does not keep the machine alive.
    pub fn downgrade(&self) -> WeakMachine<S, E> {
        WeakMachine {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl<S: State, E: Event> Clone for Machine<S, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: State, E: Event> fmt::Debug for Machine<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("id", &self.inner.id)
            .field("label", &self.inner.label)
            .field("state", &self.state())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Non-owning counterpart of [`Machine`].
pub struct WeakMachine<S: State, E: Event> {
    inner: Weak<Inner<S, E>>,
}

impl<S: State, E: Event> WeakMachine<S, E> {
    pub fn upgrade(&self) -> Option<Machine<S, E>> {
        self.inner.upgrade().map(|inner| Machine { inner })
    }
}

impl<S: State, E: Event> Clone for WeakMachine<S, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<S: State, E: Event> fmt::Debug for WeakMachine<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakMachine")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Transition;
    use crate::machine::create_machine;
    use crate::{events, states};

    states! {
        #[derive(Clone, PartialEq, Debug)]
        enum Light: LightTag {
            Red,
            Green { cars: u32 },
            Yellow,
        }
    }

    events! {
        #[derive(Clone, PartialEq, Debug)]
        enum Signal: SignalKind {
            Go(u32),
            Slow,
            Stop,
        }
    }

    type Log = Rc<RefCell<Vec<String>>>;

    fn spawn(initial: Light) -> Machine<Light, Signal> {
        let table = TransitionTable::builder()
            .on(
                LightTag::Red,
                SignalKind::Go,
                Transition::new(|event: &Signal| {
                    let cars = match event {
                        Signal::Go(cars) => *cars,
                        _ => 0,
                    };
                    move |_: &Light| Light::Green { cars }
                }),
            )
            .on(LightTag::Green, SignalKind::Slow, Transition::to(|| Light::Yellow))
            .on(LightTag::Yellow, SignalKind::Stop, Transition::to(|| Light::Red))
            .build()
            .unwrap();
        create_machine(table).spawn(initial)
    }

    fn record(log: &Log, name: &'static str) -> impl Fn(&Light, &Signal, &Light) + 'static {
        let log = Rc::clone(log);
        move |next: &Light, event: &Signal, prev: &Light| {
            log.borrow_mut().push(format!(
                "{name}: {} -{}-> {}",
                prev.name(),
                event.name(),
                next.name()
            ))
        }
    }

    #[test]
    fn send_transitions_and_passes_params() {
        let machine = spawn(Light::Red);
        machine.send(Signal::Go(4));
        assert_eq!(*machine.state(), Light::Green { cars: 4 });
        assert_eq!(machine.tag(), LightTag::Green);
    }

    #[test]
    fn unhandled_event_is_a_silent_no_op() {
        let machine = spawn(Light::Red);
        let log: Log = Rc::default();
        machine.subscribe(record(&log, "a"));

        let before = machine.state();
        machine.send(Signal::Stop);

        assert!(Rc::ptr_eq(&before, &machine.state()));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn state_is_stable_between_notifications() {
        let machine = spawn(Light::Red);
        assert!(Rc::ptr_eq(&machine.state(), &machine.state()));

        let before = machine.state();
        machine.send(Signal::Go(1));
        assert!(!Rc::ptr_eq(&before, &machine.state()));
        assert_eq!(*before, Light::Red);
    }

    #[test]
    fn subscribers_notified_in_subscription_order() {
        let machine = spawn(Light::Red);
        let log: Log = Rc::default();
        machine.subscribe(record(&log, "a"));
        machine.subscribe(record(&log, "b"));
        machine.subscribe(record(&log, "a"));

        machine.send(Signal::Go(2));

        assert_eq!(
            *log.borrow(),
            vec![
                "a: Red -Go-> Green",
                "b: Red -Go-> Green",
                "a: Red -Go-> Green"
            ]
        );
    }

    #[test]
    fn notification_carries_event_and_both_states() {
        let machine = spawn(Light::Red);
        let seen: Rc<RefCell<Vec<(Light, Signal, Light)>>> = Rc::default();
        let sink = Rc::clone(&seen);
        machine.subscribe(move |next, event, prev| {
            sink.borrow_mut()
                .push((next.clone(), event.clone(), prev.clone()))
        });

        machine.send(Signal::Go(7));

        assert_eq!(
            *seen.borrow(),
            vec![(Light::Green { cars: 7 }, Signal::Go(7), Light::Red)]
        );
    }

    #[test]
    fn unsubscribe_stops_delivery_and_is_idempotent() {
        let machine = spawn(Light::Red);
        let log: Log = Rc::default();
        let subscription = machine.subscribe(record(&log, "a"));

        machine.send(Signal::Go(1));
        subscription.unsubscribe();
        subscription.unsubscribe();
        machine.send(Signal::Slow);

        assert_eq!(log.borrow().len(), 1);
        assert_eq!(machine.subscriber_count(), 0);
    }

    #[test]
    fn unsubscribing_mid_round_skips_nobody_else() {
        let machine = spawn(Light::Red);
        let log: Log = Rc::default();

        let own: Rc<RefCell<Option<Subscription>>> = Rc::default();
        let handle = Rc::clone(&own);
        let first_log = Rc::clone(&log);
        let first = machine.subscribe(move |_, _, _| {
            first_log.borrow_mut().push("first".into());
            if let Some(subscription) = handle.borrow().as_ref() {
                subscription.unsubscribe();
            }
        });
        *own.borrow_mut() = Some(first);
        machine.subscribe(record(&log, "second"));

        machine.send(Signal::Go(1));
        machine.send(Signal::Slow);

        assert_eq!(
            *log.borrow(),
            vec!["first", "second: Red -Go-> Green", "second: Green -Slow-> Yellow"]
        );
    }

    #[test]
    fn subscriber_removed_mid_round_is_skipped() {
        let machine = spawn(Light::Red);
        let log: Log = Rc::default();

        let victim: Rc<RefCell<Option<Subscription>>> = Rc::default();
        let target = Rc::clone(&victim);
        machine.subscribe(move |_, _, _| {
            if let Some(subscription) = target.borrow().as_ref() {
                subscription.unsubscribe();
            }
        });
        *victim.borrow_mut() = Some(machine.subscribe(record(&log, "victim")));

        machine.send(Signal::Go(1));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn subscriber_added_mid_round_waits_for_next_event() {
        let machine = spawn(Light::Red);
        let log: Log = Rc::default();

        let weak = machine.downgrade();
        let late_log = Rc::clone(&log);
        let added = Rc::new(Cell::new(false));
        let once = Rc::clone(&added);
        machine.subscribe(move |_, _, _| {
            if once.replace(true) {
                return;
            }
            if let Some(machine) = weak.upgrade() {
                machine.subscribe(record(&late_log, "late"));
            }
        });

        machine.send(Signal::Go(1));
        assert!(log.borrow().is_empty());

        machine.send(Signal::Slow);
        assert_eq!(*log.borrow(), vec!["late: Green -Slow-> Yellow"]);
    }

    #[test]
    fn reentrant_send_completes_before_outer_round_resumes() {
        let machine = spawn(Light::Red);
        let log: Log = Rc::default();

        let weak = machine.downgrade();
        machine.subscribe(move |next, _, _| {
            if next.tag() == LightTag::Green {
                if let Some(machine) = weak.upgrade() {
                    machine.send(Signal::Slow);
                }
            }
        });
        machine.subscribe(record(&log, "later"));

        machine.send(Signal::Go(3));

        // The nested Slow round reaches "later" before the outer Go round does.
        assert_eq!(
            *log.borrow(),
            vec!["later: Green -Slow-> Yellow", "later: Red -Go-> Green"]
        );
        assert_eq!(*machine.state(), Light::Yellow);
    }

    #[test]
    fn dispose_makes_machine_inert() {
        let machine = spawn(Light::Red);
        let log: Log = Rc::default();
        machine.subscribe(record(&log, "before"));

        machine.dispose();
        machine.dispose();
        machine.subscribe(record(&log, "after"));
        machine.send(Signal::Go(1));

        assert!(machine.is_disposed());
        assert_eq!(*machine.state(), Light::Red);
        assert!(log.borrow().is_empty());
        assert_eq!(machine.subscriber_count(), 0);
    }

    #[test]
    fn dispose_mid_round_silences_remaining_subscribers() {
        let machine = spawn(Light::Red);
        let log: Log = Rc::default();

        let weak = machine.downgrade();
        machine.subscribe(move |_, _, _| {
            if let Some(machine) = weak.upgrade() {
                machine.dispose();
            }
        });
        machine.subscribe(record(&log, "after"));

        machine.send(Signal::Go(1));

        assert_eq!(*machine.state(), Light::Green { cars: 1 });
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn panicking_transition_leaves_state_unchanged() {
        let table = TransitionTable::<Light, Signal>::builder()
            .on(
                LightTag::Red,
                SignalKind::Go,
                Transition::map(|_| panic!("transition failed")),
            )
            .build()
            .unwrap();
        let machine = create_machine(table).spawn(Light::Red);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            machine.send(Signal::Go(1));
        }));

        assert!(result.is_err());
        assert_eq!(*machine.state(), Light::Red);
    }

    #[test]
    fn panicking_subscriber_ends_round_after_state_changed() {
        let machine = spawn(Light::Red);
        let log: Log = Rc::default();

        let armed = Rc::new(Cell::new(true));
        let trigger = Rc::clone(&armed);
        machine.subscribe(move |_, _, _| {
            if trigger.replace(false) {
                panic!("subscriber failed");
            }
        });
        machine.subscribe(record(&log, "later"));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            machine.send(Signal::Go(2));
        }));

        assert!(result.is_err());
        assert_eq!(*machine.state(), Light::Green { cars: 2 });
        assert!(log.borrow().is_empty());

        machine.send(Signal::Slow);
        assert_eq!(*machine.state(), Light::Yellow);
        assert_eq!(*log.borrow(), vec!["later: Green -Slow-> Yellow"]);
    }

    #[test]
    fn weak_machine_does_not_keep_instance_alive() {
        let machine = spawn(Light::Red);
        let weak = machine.downgrade();
        assert!(weak.upgrade().is_some());

        drop(machine);
        assert!(weak.upgrade().is_none());
    }
}
