use super::Observable;
use crate::scheduler::Scheduler;
use crate::utils::abortable;
use crate::{Observer, Subscription};

use core::fmt;
use core::future::Future;

/// An observable which pushes the output of a future.
///
/// This `struct` is created by the [`from_future`] function. See its
/// documentation for more.
pub struct FromFuture<F> {
    factory: F,
}

impl<F> fmt::Debug for FromFuture<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromFuture").finish_non_exhaustive()
    }
}

/// Adapt a deferred single-value producer into an observable.
///
/// `factory` is called once per subscription to create the future, which is
/// then driven on the subscription's [`Scheduler`]. An `Ok` output is pushed
/// as the only value followed by completion; an `Err` output ends the
/// sequence with that error. Disposing the subscription drops the future.
///
/// # Examples
///
/// ```
/// use observable_zip::observable::from_future;
/// use observable_zip::prelude::*;
/// use futures_lite::future::block_on;
/// use futures_lite::StreamExt;
///
/// block_on(async {
///     let answer = from_future(|| async { Ok::<_, ()>(42) });
///     let out: Vec<_> = answer.into_stream().collect().await;
///     assert_eq!(out, vec![Ok(42)]);
/// })
/// ```
pub fn from_future<F, Fut, T, E>(factory: F) -> FromFuture<F>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    FromFuture { factory }
}

impl<F, Fut, T, E> Observable for FromFuture<F>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    type Item = T;
    type Error = E;

    fn subscribe_with<O>(&self, mut observer: O, scheduler: &dyn Scheduler) -> Subscription
    where
        O: Observer<Self::Item, Self::Error> + Send + 'static,
    {
        let (future, handle) = abortable((self.factory)());
        let subscription = Subscription::from_fn(move || handle.abort());
        scheduler.schedule(Box::pin(async move {
            match future.await {
                Some(_) if observer.is_closed() => {}
                Some(Ok(value)) => {
                    observer.on_next(value);
                    observer.on_completed();
                }
                Some(Err(error)) => observer.on_error(error),
                None => {}
            }
        }));
        subscription
    }
}
