//! Handles which cancel a running subscription.

use core::fmt;
use std::mem;
use std::sync::{Arc, Mutex};

type Teardown = Box<dyn FnOnce() + Send>;

enum State {
    Active(Vec<Teardown>),
    Disposed,
}

/// A cloneable handle which cancels a subscription when disposed.
///
/// A `Subscription` doubles as a composite: child subscriptions and teardown
/// closures can be attached with [`add`] and [`add_teardown`], and all of them
/// run exactly once when the subscription is disposed. Attaching to a
/// subscription which was already disposed runs the child right away.
///
/// [`add`]: Subscription::add
/// [`add_teardown`]: Subscription::add_teardown
///
/// # Examples
///
/// ```
/// use observable_zip::Subscription;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let count = Arc::new(AtomicUsize::new(0));
/// let parent = Subscription::new();
/// for _ in 0..3 {
///     let count = count.clone();
///     parent.add(Subscription::from_fn(move || {
///         count.fetch_add(1, Ordering::SeqCst);
///     }));
/// }
///
/// parent.dispose();
/// parent.dispose();
/// assert_eq!(count.load(Ordering::SeqCst), 3);
/// ```
#[derive(Clone)]
pub struct Subscription {
    state: Arc<Mutex<State>>,
}

impl Subscription {
    /// Create a new, active subscription with nothing attached.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::Active(Vec::new()))),
        }
    }

    /// Create a subscription which runs `teardown` when disposed.
    pub fn from_fn<F>(teardown: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let this = Self::new();
        this.add_teardown(teardown);
        this
    }

    /// Create a subscription which is already disposed.
    pub fn disposed() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::Disposed)),
        }
    }

    /// Attach a child subscription, disposing it together with `self`.
    pub fn add(&self, child: Subscription) {
        if Arc::ptr_eq(&self.state, &child.state) {
            return;
        }
        self.add_teardown(move || child.dispose());
    }

    /// Attach a closure which runs when `self` is disposed.
    pub fn add_teardown<F>(&self, teardown: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = self.state.lock().unwrap();
        match &mut *state {
            State::Active(teardowns) => teardowns.push(Box::new(teardown)),
            State::Disposed => {
                // unlock before running foreign code
                drop(state);
                teardown();
            }
        }
    }

    /// Dispose the subscription and everything attached to it.
    ///
    /// Calling this more than once is a no-op.
    pub fn dispose(&self) {
        let teardowns = {
            let mut state = self.state.lock().unwrap();
            match mem::replace(&mut *state, State::Disposed) {
                State::Active(teardowns) => teardowns,
                State::Disposed => return,
            }
        };
        for teardown in teardowns {
            teardown();
        }
    }

    /// Returns `true` once the subscription has been disposed.
    pub fn is_disposed(&self) -> bool {
        matches!(*self.state.lock().unwrap(), State::Disposed)
    }
}

impl Default for Subscription {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
