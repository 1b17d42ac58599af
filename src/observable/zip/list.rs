use crate::observable::Observable;
use crate::scheduler::Scheduler;
use crate::{Observer, Subscription};

use core::fmt;
use core::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// An observable that ‘zips up’ an observable with a list of values.
///
/// This `struct` is created by the [`zip_list`] method on [`ObservableExt`].
/// See its documentation for more.
///
/// [`zip_list`]: crate::observable::ObservableExt::zip_list
/// [`ObservableExt`]: crate::observable::ObservableExt
#[must_use = "observables do nothing unless subscribed to"]
pub struct ZipList<O, T, F> {
    source: O,
    list: Arc<[T]>,
    combiner: Arc<F>,
}

impl<O, T, F> ZipList<O, T, F> {
    pub(crate) fn new(source: O, list: Arc<[T]>, combiner: F) -> Self {
        Self {
            source,
            list,
            combiner: Arc::new(combiner),
        }
    }
}

impl<O, T, F> fmt::Debug for ZipList<O, T, F>
where
    O: fmt::Debug,
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZipList")
            .field("source", &self.source)
            .field("list", &self.list)
            .finish()
    }
}

impl<O, T, F, R> Observable for ZipList<O, T, F>
where
    O: Observable,
    T: Clone + Send + Sync + 'static,
    F: Fn(O::Item, T) -> Result<R, O::Error> + Send + Sync + 'static,
    R: 'static,
    O::Item: 'static,
    O::Error: 'static,
{
    type Item = R;
    type Error = O::Error;

    fn subscribe_with<Ob>(&self, observer: Ob, scheduler: &dyn Scheduler) -> Subscription
    where
        Ob: Observer<Self::Item, Self::Error> + Send + 'static,
    {
        let shared = Arc::new(ListShared {
            inner: Mutex::new(ListInner { index: 0, observer }),
            list: self.list.clone(),
            combiner: self.combiner.clone(),
            closed: AtomicBool::new(false),
            subscription: Subscription::new(),
            _marker: PhantomData,
        });

        let owned = shared.clone();
        shared.subscription.add_teardown(move || {
            if !owned.closed.swap(true, Ordering::AcqRel) {
                trace!("zip list cancelled");
            }
        });

        let subscription = shared.subscription.clone();
        subscription.add(self.source.subscribe_with(ListObserver { shared }, scheduler));
        subscription
    }
}

struct ListInner<O> {
    index: usize,
    observer: O,
}

struct ListShared<T, F, O, L, E> {
    inner: Mutex<ListInner<O>>,
    list: Arc<[T]>,
    combiner: Arc<F>,
    closed: AtomicBool,
    subscription: Subscription,
    _marker: PhantomData<fn(L) -> E>,
}

/// Receives the source's notifications and pairs each value with the next
/// list entry. Nothing is buffered: the list is always ready.
struct ListObserver<T, F, O, L, E> {
    shared: Arc<ListShared<T, F, O, L, E>>,
}

impl<T, F, O, L, E> ListObserver<T, F, O, L, E> {
    fn terminate(&self, notify: impl FnOnce()) {
        self.shared.closed.store(true, Ordering::Release);
        notify();
        self.shared.subscription.dispose();
    }

    /// Enter the critical section, unless the sequence already ended.
    fn enter<R>(&self) -> Option<MutexGuard<'_, ListInner<O>>>
    where
        O: Observer<R, E>,
    {
        if self.shared.closed.load(Ordering::Acquire) {
            return None;
        }
        let inner = self.shared.inner.lock().unwrap();
        if self.shared.closed.load(Ordering::Acquire) {
            return None;
        }
        if inner.observer.is_closed() {
            drop(inner);
            self.shared.subscription.dispose();
            return None;
        }
        Some(inner)
    }
}

impl<T, F, O, L, E, R> Observer<L, E> for ListObserver<T, F, O, L, E>
where
    T: Clone,
    F: Fn(L, T) -> Result<R, E>,
    O: Observer<R, E>,
{
    fn on_next(&mut self, left: L) {
        let Some(mut inner) = self.enter::<R>() else {
            return;
        };

        let len = self.shared.list.len();
        if inner.index == len {
            trace!(len, "zip list exhausted before the source ended");
            self.terminate(|| inner.observer.on_completed());
            return;
        }

        let right = self.shared.list[inner.index].clone();
        inner.index += 1;
        match (self.shared.combiner)(left, right) {
            Ok(value) => {
                inner.observer.on_next(value);
                if inner.index == len {
                    trace!(len, "zip list used up");
                    self.terminate(|| inner.observer.on_completed());
                } else if inner.observer.is_closed() {
                    drop(inner);
                    self.shared.subscription.dispose();
                }
            }
            Err(error) => {
                trace!(index = inner.index - 1, "zip list combiner failed");
                self.terminate(|| inner.observer.on_error(error));
            }
        }
    }

    fn on_error(&mut self, error: E) {
        let Some(mut inner) = self.enter::<R>() else {
            return;
        };
        self.terminate(|| inner.observer.on_error(error));
    }

    fn on_completed(&mut self) {
        let Some(mut inner) = self.enter::<R>() else {
            return;
        };
        self.terminate(|| inner.observer.on_completed());
    }

    fn is_closed(&self) -> bool {
        if self.shared.closed.load(Ordering::Acquire) {
            return true;
        }
        // A busy lock means the critical section is checking the downstream.
        let downstream_closed =
            matches!(self.shared.inner.try_lock(), Ok(inner) if inner.observer.is_closed());
        if downstream_closed {
            self.shared.subscription.dispose();
        }
        downstream_closed
    }
}
