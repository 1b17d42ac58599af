use super::into_stream::{ChannelObserver, ObservableStream};
use super::zip::tuple::Zip2;
use super::zip::{Collect, ZipList};
use super::{IntoObservable, Observable, ZipWith};
use crate::utils::channel;

use std::sync::Arc;

/// An extension trait for the [`Observable`] trait.
pub trait ObservableExt: Observable {
    /// ‘Zips up’ two observables into a single observable of pairs.
    ///
    /// # Examples
    ///
    /// ```
    /// use observable_zip::observable::from_iter;
    /// use observable_zip::prelude::*;
    /// use futures_lite::future::block_on;
    /// use futures_lite::StreamExt;
    ///
    /// block_on(async {
    ///     let a = from_iter::<_, ()>(vec![1, 2, 3]);
    ///     let b = from_iter::<_, ()>(vec!["one", "two"]);
    ///     let out: Vec<_> = a.zip(b).into_stream().collect().await;
    ///     assert_eq!(out, vec![Ok((1, "one")), Ok((2, "two"))]);
    /// })
    /// ```
    fn zip<S>(
        self,
        other: S,
    ) -> Zip2<Self, S::IntoObservable, Collect<(Self::Item, S::Item), Self::Error>>
    where
        Self: Sized,
        Self::Item: Send + 'static,
        Self::Error: Send + 'static,
        S: IntoObservable<Error = Self::Error>,
        S::Item: Send + 'static,
    {
        (self, other).zip_with(Ok as Collect<_, _>)
    }

    /// ‘Zips up’ an observable with a list of values which are already
    /// available.
    ///
    /// The `n`-th value pushed by `self` is combined with `list[n]`. The
    /// resulting observable completes right after the last list entry was
    /// used, without waiting for `self` to end.
    ///
    /// # Examples
    ///
    /// ```
    /// use observable_zip::observable::from_iter;
    /// use observable_zip::prelude::*;
    /// use futures_lite::future::block_on;
    /// use futures_lite::StreamExt;
    ///
    /// block_on(async {
    ///     let source = from_iter::<_, ()>(vec![1, 2, 3, 4]);
    ///     let sums = source.zip_list(vec![10, 20], |a, b| Ok(a + b));
    ///     let out: Vec<_> = sums.into_stream().collect().await;
    ///     assert_eq!(out, vec![Ok(11), Ok(22)]);
    /// })
    /// ```
    fn zip_list<I, F, R>(self, list: I, combiner: F) -> ZipList<Self, I::Item, F>
    where
        Self: Sized,
        I: IntoIterator,
        F: Fn(Self::Item, I::Item) -> Result<R, Self::Error>,
    {
        let list: Arc<[I::Item]> = list.into_iter().collect();
        ZipList::new(self, list, combiner)
    }

    /// Subscribe and expose the notifications as a [`Stream`].
    ///
    /// [`Stream`]: futures_core::Stream
    fn into_stream(self) -> ObservableStream<Self::Item, Self::Error>
    where
        Self: Sized,
        Self::Item: Send + 'static,
        Self::Error: Send + 'static,
    {
        let (sender, receiver) = channel();
        let subscription = self.subscribe(ChannelObserver::new(sender));
        ObservableStream::new(receiver, subscription)
    }
}

impl<S> ObservableExt for S where S: Observable {}
