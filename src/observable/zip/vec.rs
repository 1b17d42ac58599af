use super::fanout::{ChildObserver, Shared};
use super::{Collect, Zip as ZipTrait, ZipWith};
use crate::observable::{IntoObservable, Observable};
use crate::scheduler::Scheduler;
use crate::{Observer, Subscription};

use core::fmt;
use std::collections::VecDeque;
use std::sync::Arc;

/// An observable that ‘zips up’ multiple observables into a single
/// observable of vectors.
///
/// This `struct` is created by the [`zip`] method on the [`Zip`] trait, or
/// the [`zip_with`] method on the [`ZipWith`] trait. See their documentation
/// for more.
///
/// [`zip`]: crate::observable::Zip::zip
/// [`Zip`]: crate::observable::Zip
/// [`zip_with`]: crate::observable::ZipWith::zip_with
/// [`ZipWith`]: crate::observable::ZipWith
#[must_use = "observables do nothing unless subscribed to"]
pub struct Zip<O, F> {
    sources: Vec<O>,
    combiner: Arc<F>,
}

impl<O, F> Zip<O, F> {
    pub(crate) fn new(sources: Vec<O>, combiner: F) -> Self {
        Self {
            sources,
            combiner: Arc::new(combiner),
        }
    }
}

impl<O, F> fmt::Debug for Zip<O, F>
where
    O: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.sources.iter()).finish()
    }
}

impl<O, F, R> Observable for Zip<O, F>
where
    O: Observable,
    O::Item: Send + 'static,
    O::Error: Send + 'static,
    F: Fn(Vec<O::Item>) -> Result<R, O::Error> + Send + Sync + 'static,
    R: 'static,
{
    type Item = R;
    type Error = O::Error;

    fn subscribe_with<Ob>(&self, observer: Ob, scheduler: &dyn Scheduler) -> Subscription
    where
        Ob: Observer<Self::Item, Self::Error> + Send + 'static,
    {
        let buffers: Vec<VecDeque<O::Item>> =
            self.sources.iter().map(|_| VecDeque::new()).collect();
        let shared = Shared::new(buffers, self.combiner.clone(), observer);

        for (index, source) in self.sources.iter().enumerate() {
            // A synchronous source may already have ended the sequence.
            if shared.is_closed() {
                break;
            }
            let child = ChildObserver::new(
                index,
                shared.clone(),
                move |buffers: &mut Vec<VecDeque<O::Item>>, value| {
                    buffers[index].push_back(value)
                },
            );
            shared.attach(source.subscribe_with(child, scheduler));
        }
        shared.subscription()
    }
}

impl<O, F, R> ZipWith<F> for Vec<O>
where
    O: IntoObservable,
    O::Item: Send + 'static,
    O::Error: Send + 'static,
    F: Fn(Vec<O::Item>) -> Result<R, O::Error> + Send + Sync + 'static,
    R: 'static,
{
    type Observable = Zip<O::IntoObservable, F>;

    fn zip_with(self, combiner: F) -> Self::Observable {
        Zip::new(
            self.into_iter().map(|o| o.into_observable()).collect(),
            combiner,
        )
    }
}

impl<O> ZipTrait for Vec<O>
where
    O: IntoObservable,
    O::Item: Send + 'static,
    O::Error: Send + 'static,
{
    type Item = Vec<O::Item>;
    type Error = O::Error;
    type Observable = Zip<O::IntoObservable, Collect<Vec<O::Item>, O::Error>>;

    fn zip(self) -> Self::Observable {
        self.zip_with(Ok as Collect<_, _>)
    }
}
