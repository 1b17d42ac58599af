//! Composable push-based sequences.
//!
//! # Examples
//!
//! Zip multiple sources so values are paired up by their position:
//!
//! ```
//! use observable_zip::observable::from_iter;
//! use observable_zip::prelude::*;
//! use futures_lite::future::block_on;
//! use futures_lite::StreamExt;
//!
//! block_on(async {
//!     let a = from_iter::<_, ()>(vec![1, 2, 3]);
//!     let b = from_iter::<_, ()>(vec![10, 20]);
//!     let sums = (a, b).zip_with(|(a, b)| Ok(a + b));
//!
//!     let out: Vec<_> = sums.into_stream().collect().await;
//!     assert_eq!(out, vec![Ok(11), Ok(22)]);
//! })
//! ```
//!
//! # Zipping
//!
//! Sources are subscribed concurrently. Every source gets its own queue of
//! values which haven't been paired yet; as soon as every queue holds at least
//! one value, the heads are taken and combined into one output value.
//!
//! | Name      | Operands                          | When does it end?    |
//! | ---       | ---                               | ---                  |
//! | `Zip`     | `Vec<O>`, `[O; N]`, `(O1, O2..)`  | No more complete tuples are possible, or on the first error
//! | `ZipList` | one observable, one `Vec<T>`      | The list is used up, the source ends, or on the first error
use crate::scheduler::{Inline, Scheduler};
use crate::{Observer, Subscription};

pub use from_future::{from_future, FromFuture};
pub use from_iter::{from_iter, FromIter};
pub use from_stream::{from_stream, FromStream};
pub use into_observable::{IntoObservable, ReadyFactory};
pub use into_stream::ObservableStream;
pub use observable_ext::ObservableExt;
pub use zip::{Collect, Zip, ZipList, ZipWith};

pub(crate) mod zip;

mod from_future;
mod from_iter;
mod from_stream;
mod into_observable;
mod into_stream;
mod observable_ext;

/// A sequence of values pushed to an [`Observer`], ended by an error or by
/// completion.
///
/// Observables are definitions: nothing happens until one is subscribed to,
/// and every subscription gets its own state.
pub trait Observable {
    /// The values of the sequence.
    type Item;

    /// The error which may end the sequence.
    type Error;

    /// Start delivering notifications to `observer`.
    ///
    /// Deferred producers such as [`from_future`] run their work on
    /// `scheduler`. The returned [`Subscription`] cancels delivery when
    /// disposed.
    fn subscribe_with<O>(&self, observer: O, scheduler: &dyn Scheduler) -> Subscription
    where
        O: Observer<Self::Item, Self::Error> + Send + 'static;

    /// Start delivering notifications to `observer`, driving deferred work
    /// with the [`Inline`] scheduler.
    fn subscribe<O>(&self, observer: O) -> Subscription
    where
        O: Observer<Self::Item, Self::Error> + Send + 'static,
    {
        self.subscribe_with(observer, &Inline)
    }
}

impl<S> Observable for &S
where
    S: Observable + ?Sized,
{
    type Item = S::Item;
    type Error = S::Error;

    fn subscribe_with<O>(&self, observer: O, scheduler: &dyn Scheduler) -> Subscription
    where
        O: Observer<Self::Item, Self::Error> + Send + 'static,
    {
        (**self).subscribe_with(observer, scheduler)
    }
}

impl<S> Observable for std::sync::Arc<S>
where
    S: Observable + ?Sized,
{
    type Item = S::Item;
    type Error = S::Error;

    fn subscribe_with<O>(&self, observer: O, scheduler: &dyn Scheduler) -> Subscription
    where
        O: Observer<Self::Item, Self::Error> + Send + 'static,
    {
        (**self).subscribe_with(observer, scheduler)
    }
}
