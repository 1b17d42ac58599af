//! Subscribing to every zip source and funneling their notifications into a
//! single critical section.

use super::state::{Buffers, Next, ZipState};
use crate::{Observer, Subscription};

use core::fmt;
use core::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

struct Inner<B, F, O> {
    state: ZipState<B>,
    combiner: Arc<F>,
    observer: O,
}

/// The state shared by all sources of one zip subscription.
///
/// Every notification takes the same lock, so pushing into a queue, calling
/// the combiner, and emitting the result happen as one step relative to the
/// other sources.
pub(crate) struct Shared<B, F, O, R, E> {
    inner: Mutex<Inner<B, F, O>>,
    closed: AtomicBool,
    subscription: Subscription,
    _marker: PhantomData<fn() -> (R, E)>,
}

impl<B, F, O, R, E> Shared<B, F, O, R, E>
where
    B: Buffers + Send + 'static,
    F: Fn(B::Output) -> Result<R, E> + Send + Sync + 'static,
    O: Observer<R, E> + Send + 'static,
    R: 'static,
    E: 'static,
{
    pub(crate) fn new(buffers: B, combiner: Arc<F>, observer: O) -> Arc<Self> {
        let this = Arc::new(Self {
            inner: Mutex::new(Inner {
                state: ZipState::new(buffers),
                combiner,
                observer,
            }),
            closed: AtomicBool::new(false),
            subscription: Subscription::new(),
            _marker: PhantomData,
        });

        // Owned by the composite until it is disposed, so the downstream
        // observer lives as long as the subscription even without sources.
        let shared = this.clone();
        this.subscription.add_teardown(move || {
            if !shared.closed.swap(true, Ordering::AcqRel) {
                trace!("zip cancelled");
            }
        });
        this
    }
}

impl<B, F, O, R, E> Shared<B, F, O, R, E>
where
    B: Buffers,
    F: Fn(B::Output) -> Result<R, E>,
    O: Observer<R, E>,
{
    /// The composite subscription owning every source subscription.
    pub(crate) fn subscription(&self) -> Subscription {
        self.subscription.clone()
    }

    /// Take ownership of a source subscription.
    pub(crate) fn attach(&self, child: Subscription) {
        self.subscription.add(child);
    }

    /// Returns `true` once the zipped sequence ended or was cancelled.
    ///
    /// A downstream observer which closed itself cancels the zip.
    pub(crate) fn is_closed(&self) -> bool {
        if self.closed.load(Ordering::Acquire) {
            return true;
        }
        // A busy lock means a source is inside the critical section, which
        // checks the downstream itself.
        let downstream_closed =
            matches!(self.inner.try_lock(), Ok(inner) if inner.observer.is_closed());
        if downstream_closed {
            self.subscription.dispose();
        }
        downstream_closed
    }

    /// Enter the critical section, unless the sequence already ended.
    fn enter(&self) -> Option<MutexGuard<'_, Inner<B, F, O>>> {
        if self.closed.load(Ordering::Acquire) {
            return None;
        }
        let inner = self.inner.lock().unwrap();
        // Another source may have ended the sequence while we waited.
        if self.closed.load(Ordering::Acquire) {
            return None;
        }
        if inner.observer.is_closed() {
            drop(inner);
            self.subscription.dispose();
            return None;
        }
        Some(inner)
    }

    fn on_next(&self, index: usize, push: impl FnOnce(&mut B)) {
        let Some(mut inner) = self.enter() else {
            return;
        };

        match inner.state.push_with(index, push) {
            Next::Pending => {}
            Next::Ready(values) => match (inner.combiner)(values) {
                Ok(value) => {
                    inner.observer.on_next(value);
                    if inner.observer.is_closed() {
                        drop(inner);
                        self.subscription.dispose();
                    }
                }
                Err(error) => {
                    trace!(index, "zip combiner failed");
                    self.closed.store(true, Ordering::Release);
                    inner.observer.on_error(error);
                    drop(inner);
                    self.subscription.dispose();
                }
            },
            Next::Exhausted => {
                trace!(index, "zip exhausted: every other source is done");
                self.closed.store(true, Ordering::Release);
                inner.observer.on_completed();
                drop(inner);
                self.subscription.dispose();
            }
        }
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn on_error(&self, index: usize, error: E) {
        let Some(mut inner) = self.enter() else {
            return;
        };

        trace!(index, "zip source failed");
        self.closed.store(true, Ordering::Release);
        inner.observer.on_error(error);
        drop(inner);
        self.subscription.dispose();
    }

    fn on_completed(&self, index: usize) {
        let Some(mut inner) = self.enter() else {
            return;
        };

        if inner.state.complete(index) {
            trace!(index, "zip completed: every source is done");
            self.closed.store(true, Ordering::Release);
            inner.observer.on_completed();
            drop(inner);
            self.subscription.dispose();
        }
    }
}

impl<B, F, O, R, E> fmt::Debug for Shared<B, F, O, R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shared")
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .field("subscription", &self.subscription)
            .finish()
    }
}

/// The observer handed to source `index`, tagging every notification with
/// its origin.
pub(crate) struct ChildObserver<B, F, O, R, E, P> {
    index: usize,
    shared: Arc<Shared<B, F, O, R, E>>,
    push: P,
}

impl<B, F, O, R, E, P> ChildObserver<B, F, O, R, E, P> {
    pub(crate) fn new<T>(index: usize, shared: Arc<Shared<B, F, O, R, E>>, push: P) -> Self
    where
        P: Fn(&mut B, T),
    {
        Self {
            index,
            shared,
            push,
        }
    }
}

impl<B, F, O, R, E, P> fmt::Debug for ChildObserver<B, F, O, R, E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildObserver")
            .field("index", &self.index)
            .field("shared", &self.shared)
            .finish()
    }
}

impl<T, B, F, O, R, E, P> Observer<T, E> for ChildObserver<B, F, O, R, E, P>
where
    B: Buffers,
    F: Fn(B::Output) -> Result<R, E>,
    O: Observer<R, E>,
    P: Fn(&mut B, T),
{
    fn on_next(&mut self, value: T) {
        let push = &self.push;
        self.shared.on_next(self.index, |buffers| push(buffers, value));
    }

    fn on_error(&mut self, error: E) {
        self.shared.on_error(self.index, error);
    }

    fn on_completed(&mut self) {
        self.shared.on_completed(self.index);
    }

    fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }
}
