//! A hot source which is also an observer.

use crate::observable::Observable;
use crate::scheduler::Scheduler;
use crate::{Observer, Subscription};

use core::fmt;
use slab::Slab;
use smallvec::SmallVec;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};

/// One registered observer.
///
/// `stopped` is set when the observer was unsubscribed or received its
/// terminal notification. It is read while `observer` is locked, so a value
/// racing with `complete` is either delivered first or not at all.
struct Slot<T, E> {
    observer: Mutex<Box<dyn Observer<T, E> + Send>>,
    stopped: AtomicBool,
}

type SharedObserver<T, E> = Arc<Slot<T, E>>;

enum Terminal<E> {
    Error(E),
    Completed,
}

struct Registry<T, E> {
    observers: Slab<SharedObserver<T, E>>,
    terminal: Option<Terminal<E>>,
}

/// A multicast source which values can be pushed into by hand.
///
/// Every value passed to [`next`] is delivered to all current observers.
/// Once [`error`] or [`complete`] was called the subject is finished: later
/// subscribers receive the same terminal notification right away, and further
/// values are ignored.
///
/// Notifications may be pushed from any thread. Observers are not called
/// while the subject's own lock is held, so they are free to dispose their
/// subscription from inside a callback.
///
/// [`next`]: Subject::next
/// [`error`]: Subject::error
/// [`complete`]: Subject::complete
///
/// # Examples
///
/// ```
/// use observable_zip::prelude::*;
/// use observable_zip::Subject;
/// use futures_lite::future::block_on;
/// use futures_lite::StreamExt;
///
/// block_on(async {
///     let subject = Subject::<u8, ()>::new();
///     let mut s = subject.clone().into_stream();
///
///     subject.next(1);
///     subject.complete();
///     assert_eq!(s.next().await, Some(Ok(1)));
///     assert_eq!(s.next().await, None);
/// })
/// ```
pub struct Subject<T, E> {
    registry: Arc<Mutex<Registry<T, E>>>,
}

impl<T, E> Subject<T, E> {
    /// Create a new subject without observers.
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                observers: Slab::new(),
                terminal: None,
            })),
        }
    }

    /// Return the number of observers currently subscribed.
    pub fn observer_count(&self) -> usize {
        self.registry.lock().unwrap().observers.len()
    }

    /// Returns `true` once the subject received an error or completed.
    pub fn is_finished(&self) -> bool {
        self.registry.lock().unwrap().terminal.is_some()
    }

    fn snapshot(&self) -> SmallVec<[SharedObserver<T, E>; 4]> {
        let registry = self.registry.lock().unwrap();
        if registry.terminal.is_some() {
            return SmallVec::new();
        }
        registry.observers.iter().map(|(_, o)| o.clone()).collect()
    }

    fn finish(&self, terminal: Terminal<E>) -> SmallVec<[SharedObserver<T, E>; 4]> {
        let mut registry = self.registry.lock().unwrap();
        if registry.terminal.is_some() {
            return SmallVec::new();
        }
        registry.terminal = Some(terminal);
        registry.observers.drain().collect()
    }
}

impl<T: Clone, E: Clone> Subject<T, E> {
    /// Push a value to every observer.
    pub fn next(&self, value: T) {
        for slot in self.snapshot() {
            let mut observer = slot.observer.lock().unwrap();
            if !slot.stopped.load(Ordering::Acquire) {
                observer.on_next(value.clone());
            }
        }
    }

    /// End the sequence with an error.
    pub fn error(&self, error: E) {
        for slot in self.finish(Terminal::Error(error.clone())) {
            let mut observer = slot.observer.lock().unwrap();
            if !slot.stopped.swap(true, Ordering::AcqRel) {
                observer.on_error(error.clone());
            }
        }
    }

    /// End the sequence normally.
    pub fn complete(&self) {
        for slot in self.finish(Terminal::Completed) {
            let mut observer = slot.observer.lock().unwrap();
            if !slot.stopped.swap(true, Ordering::AcqRel) {
                observer.on_completed();
            }
        }
    }
}

impl<T, E> Clone for Subject<T, E> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
        }
    }
}

impl<T, E> Default for Subject<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> fmt::Debug for Subject<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("observers", &self.observer_count())
            .field("finished", &self.is_finished())
            .finish()
    }
}

impl<T, E> Observable for Subject<T, E>
where
    T: Send + 'static,
    E: Clone + Send + 'static,
{
    type Item = T;
    type Error = E;

    fn subscribe_with<O>(&self, mut observer: O, _scheduler: &dyn Scheduler) -> Subscription
    where
        O: Observer<T, E> + Send + 'static,
    {
        let mut registry = self.registry.lock().unwrap();
        let terminal = match &registry.terminal {
            Some(Terminal::Error(error)) => Some(Terminal::Error(error.clone())),
            Some(Terminal::Completed) => Some(Terminal::Completed),
            None => None,
        };
        if let Some(terminal) = terminal {
            drop(registry);
            match terminal {
                Terminal::Error(error) => observer.on_error(error),
                Terminal::Completed => observer.on_completed(),
            }
            return Subscription::disposed();
        }

        let observer: Box<dyn Observer<T, E> + Send> = Box::new(observer);
        let slot = Arc::new(Slot {
            observer: Mutex::new(observer),
            stopped: AtomicBool::new(false),
        });
        let stop = Arc::downgrade(&slot);
        let key = registry.observers.insert(slot);
        let weak: Weak<Mutex<Registry<T, E>>> = Arc::downgrade(&self.registry);
        Subscription::from_fn(move || {
            // Not locking the observer: it may be disposing itself from
            // inside a notification.
            if let Some(slot) = stop.upgrade() {
                slot.stopped.store(true, Ordering::Release);
            }
            if let Some(registry) = weak.upgrade() {
                let mut registry = registry.lock().unwrap();
                if registry.terminal.is_none() {
                    registry.observers.try_remove(key);
                }
            }
        })
    }
}

/// A subject can be fed by another observable.
impl<T: Clone, E: Clone> Observer<T, E> for Subject<T, E> {
    fn on_next(&mut self, value: T) {
        self.next(value)
    }

    fn on_error(&mut self, error: E) {
        self.error(error)
    }

    fn on_completed(&mut self) {
        self.complete()
    }

    fn is_closed(&self) -> bool {
        self.is_finished()
    }
}
