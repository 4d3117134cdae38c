//! Enter/exit watchers pinned to a group of state tags.

use crate::core::{Event, State};
use crate::machine::{Cleanup, Machine, Subscription};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Tracks whether the machine is inside the watched group and holds the
/// cleanup of the latest entry.
struct EnterWatcher<S: State, F> {
    watched: Vec<S::Tag>,
    on_enter: F,
    active: Cell<bool>,
    entries: Cell<u64>,
    cleanup: RefCell<Option<Cleanup>>,
}

impl<S, F> EnterWatcher<S, F>
where
    S: State,
    F: Fn(&S) -> Option<Cleanup>,
{
    fn contains(&self, tag: S::Tag) -> bool {
        self.watched.contains(&tag)
    }

    fn observe(&self, next: &S) {
        match (self.active.get(), self.contains(next.tag())) {
            (false, true) => self.enter(next),
            (true, false) => self.exit(),
            // Moving within the group, or staying outside of it.
            _ => {}
        }
    }

    fn enter(&self, state: &S) {
        let entry = self.entries.get() + 1;
        self.entries.set(entry);
        self.active.set(true);
        let cleanup = (self.on_enter)(state);

        // The callback left the group and may have re-entered it. This entry
        // is over; any newer entry owns the slot.
        if !self.active.get() || self.entries.get() != entry {
            if let Some(cleanup) = cleanup {
                cleanup.run();
            }
            return;
        }

        let stale = self.cleanup.replace(cleanup);
        if let Some(stale) = stale {
            stale.run();
        }
    }

    fn exit(&self) {
        self.active.set(false);
        let cleanup = self.cleanup.borrow_mut().take();
        if let Some(cleanup) = cleanup {
            cleanup.run();
        }
    }
}

impl<S: State, E: Event> Machine<S, E> {
    /// Run `on_enter` whenever the machine enters the group of `states`.
    ///
    /// Fires immediately if the machine is already inside the group. Moving
    /// between two watched states is not a re-entry. When the machine leaves
    /// the group, the cleanup returned by the latest entry runs once.
    /// Unsubscribing runs any pending cleanup, then stops watching.
    ///
    /// # Example
    ///
    /// ```
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    /// use tagmachine::core::{Transition, TransitionTable};
    /// use tagmachine::{create_machine, events, states, Cleanup};
    ///
    /// states! {
    ///     #[derive(Debug)]
    ///     enum Conn: ConnTag {
    ///         Connecting,
    ///         Online,
    ///         Offline,
    ///     }
    /// }
    ///
    /// events! {
    ///     #[derive(Debug)]
    ///     enum Net: NetKind {
    ///         Up,
    ///         Down,
    ///     }
    /// }
    ///
    /// let table = TransitionTable::builder()
    ///     .on(ConnTag::Connecting, NetKind::Up, Transition::to(|| Conn::Online))
    ///     .on(ConnTag::Online, NetKind::Down, Transition::to(|| Conn::Offline))
    ///     .build()
    ///     .unwrap();
    /// let machine = create_machine(table).spawn(Conn::Connecting);
    ///
    /// let cleaned = Rc::new(Cell::new(false));
    /// let flag = Rc::clone(&cleaned);
    /// machine.on_enter([ConnTag::Connecting, ConnTag::Online], move |_| {
    ///     let flag = Rc::clone(&flag);
    ///     Some(Cleanup::new(move || flag.set(true)))
    /// });
    ///
    /// machine.send(Net::Up);
    /// assert!(!cleaned.get());
    /// machine.send(Net::Down);
    /// assert!(cleaned.get());
    /// ```
    pub fn on_enter<I, F>(&self, states: I, on_enter: F) -> Subscription
    where
        I: IntoIterator<Item = S::Tag>,
        F: Fn(&S) -> Option<Cleanup> + 'static,
    {
        if self.is_disposed() {
            return Subscription::inert();
        }

        let mut watched: Vec<S::Tag> = Vec::new();
        for tag in states {
            if !watched.contains(&tag) {
                watched.push(tag);
            }
        }

        let watcher = Rc::new(EnterWatcher {
            watched,
            on_enter,
            active: Cell::new(false),
            entries: Cell::new(0),
            cleanup: RefCell::new(None),
        });

        let observer = Rc::clone(&watcher);
        let stream = self.subscribe(move |next, _, _| observer.observe(next));

        let current = self.state();
        if watcher.contains(current.tag()) {
            watcher.enter(&current);
        }

        Subscription::new(move || {
            watcher.exit();
            stream.unsubscribe();
        })
    }
}
