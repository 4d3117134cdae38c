//! Subscription handles and cleanup values.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type Teardown = Box<dyn FnOnce()>;

/// Handle returned by every subscribe-family call.
///
/// `unsubscribe` is the only way to cancel; dropping the handle leaves the
/// subscription in place. Clones share the same registration, so a callback
/// may hold a clone and cancel itself.
#[derive(Clone)]
pub struct Subscription {
    teardown: Rc<RefCell<Option<Teardown>>>,
}

impl Subscription {
    pub(crate) fn new<F>(teardown: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            teardown: Rc::new(RefCell::new(Some(Box::new(teardown)))),
        }
    }

    /// A subscription that was never registered.
    pub(crate) fn inert() -> Self {
        Self {
            teardown: Rc::new(RefCell::new(None)),
        }
    }

    /// Stop receiving notifications.
    ///
    /// Idempotent, and safe to call from inside a notification callback.
    pub fn unsubscribe(&self) {
        let teardown = self.teardown.borrow_mut().take();
        if let Some(teardown) = teardown {
            teardown();
        }
    }

    /// Whether `unsubscribe` has not run yet.
    pub fn is_active(&self) -> bool {
        self.teardown.borrow().is_some()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Work to run when a watched state group is exited.
///
/// Returned from [`on_enter`](crate::Machine::on_enter) callbacks; runs at
/// most once.
pub struct Cleanup(Box<dyn FnOnce()>);

impl Cleanup {
    pub fn new<F>(cleanup: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self(Box::new(cleanup))
    }

    pub fn run(self) {
        (self.0)()
    }
}

impl fmt::Debug for Cleanup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Cleanup")
    }
}
