#![forbid(unsafe_code)]

//! Synchronous observer registry with RAII subscriptions.
//!
//! # Design
//!
//! [`Observers<T>`] keeps a list of weak callback references. [`subscribe`]
//! hands back a [`Subscription`] guard owning the strong reference; dropping
//! the guard (or calling [`Subscription::unsubscribe`]) makes the callback
//! unreachable, and the dead entry is pruned on the next notification.
//!
//! Notification is synchronous and unbatched: every live callback runs, in
//! registration order, before [`Observers::notify`] returns.
//!
//! # Failure Modes
//!
//! - **Re-entrant mutation**: a callback cannot reach back into the owner that
//!   is notifying it (the owner is mutably borrowed for the duration), so
//!   re-entrant mutation is rejected at compile time rather than at runtime.
//!
//! [`subscribe`]: Observers::subscribe

use std::fmt;
use std::rc::{Rc, Weak};

use tracing::info_span;

type CallbackRc<T> = Rc<dyn Fn(&T)>;
type CallbackWeak<T> = Weak<dyn Fn(&T)>;

/// Ordered set of observer callbacks for values of type `T`.
pub struct Observers<T: ?Sized + 'static> {
    callbacks: Vec<CallbackWeak<T>>,
}

impl<T: ?Sized + 'static> Default for Observers<T> {
    fn default() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }
}

impl<T: ?Sized + 'static> fmt::Debug for Observers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("live", &self.live_count())
            .field("registered", &self.callbacks.len())
            .finish()
    }
}

impl<T: ?Sized + 'static> Observers<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback. It stays registered while the returned guard lives.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&mut self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: CallbackRc<T> = Rc::new(callback);
        self.callbacks.push(Rc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Number of callbacks whose subscription guard is still alive.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.callbacks
            .iter()
            .filter(|callback| callback.strong_count() > 0)
            .count()
    }

    /// Invoke every live callback with `value`, pruning dead ones.
    pub fn notify(&mut self, value: &T) {
        self.callbacks.retain(|callback| callback.strong_count() > 0);
        if self.callbacks.is_empty() {
            return;
        }

        let live: Vec<CallbackRc<T>> = self
            .callbacks
            .iter()
            .filter_map(|callback| callback.upgrade())
            .collect();
        let _span = info_span!("observers.notify", subscribers = live.len()).entered();
        for callback in &live {
            callback(value);
        }
    }
}

/// RAII guard for one registered callback.
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl Subscription {
    /// Explicitly unsubscribe. Equivalent to dropping the guard.
    pub fn unsubscribe(self) {}
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
