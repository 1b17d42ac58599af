use super::Observable;
use crate::scheduler::Scheduler;
use crate::utils::abortable;
use crate::{Observer, Subscription};

use core::fmt;
use futures_core::Stream;
use futures_lite::StreamExt;

/// An observable which pushes the items of a stream.
///
/// This `struct` is created by the [`from_stream`] function. See its
/// documentation for more.
pub struct FromStream<F> {
    factory: F,
}

impl<F> fmt::Debug for FromStream<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromStream").finish_non_exhaustive()
    }
}

/// Adapt a fallible stream into an observable.
///
/// `factory` is called once per subscription and the stream it returns is
/// driven on the subscription's [`Scheduler`]. `Ok` items are pushed as
/// values; the first `Err` item ends the sequence with that error. Disposing
/// the subscription drops the stream.
///
/// # Examples
///
/// ```
/// use observable_zip::observable::from_stream;
/// use observable_zip::prelude::*;
/// use futures_lite::future::block_on;
/// use futures_lite::{stream, StreamExt};
///
/// block_on(async {
///     let letters = from_stream(|| stream::iter([Ok::<_, ()>('a'), Ok('b')]));
///     let out: Vec<_> = letters.into_stream().collect().await;
///     assert_eq!(out, vec![Ok('a'), Ok('b')]);
/// })
/// ```
pub fn from_stream<F, S, T, E>(factory: F) -> FromStream<F>
where
    F: Fn() -> S,
    S: Stream<Item = Result<T, E>>,
{
    FromStream { factory }
}

impl<F, S, T, E> Observable for FromStream<F>
where
    F: Fn() -> S,
    S: Stream<Item = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    type Item = T;
    type Error = E;

    fn subscribe_with<O>(&self, mut observer: O, scheduler: &dyn Scheduler) -> Subscription
    where
        O: Observer<Self::Item, Self::Error> + Send + 'static,
    {
        let stream = (self.factory)();
        let (task, handle) = abortable(async move {
            let mut stream = core::pin::pin!(stream);
            while let Some(item) = stream.next().await {
                if observer.is_closed() {
                    return;
                }
                match item {
                    Ok(value) => observer.on_next(value),
                    Err(error) => return observer.on_error(error),
                }
            }
            if !observer.is_closed() {
                observer.on_completed();
            }
        });
        let subscription = Subscription::from_fn(move || handle.abort());
        scheduler.schedule(Box::pin(async move {
            task.await;
        }));
        subscription
    }
}
