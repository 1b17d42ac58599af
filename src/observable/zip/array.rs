use super::fanout::{ChildObserver, Shared};
use super::{Collect, Zip as ZipTrait, ZipWith};
use crate::observable::{IntoObservable, Observable};
use crate::scheduler::Scheduler;
use crate::{Observer, Subscription};

use core::fmt;
use std::collections::VecDeque;
use std::sync::Arc;

/// An observable that ‘zips up’ multiple observables into a single
/// observable of arrays.
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
pub struct Zip<O, F, const N: usize> {
    sources: [O; N],
    combiner: Arc<F>,
}

impl<O, F, const N: usize> Zip<O, F, N> {
    pub(crate) fn new(sources: [O; N], combiner: F) -> Self {
        Self {
            sources,
            combiner: Arc::new(combiner),
        }
    }
}

impl<O, F, const N: usize> fmt::Debug for Zip<O, F, N>
where
    O: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.sources.iter()).finish()
    }
}

impl<O, F, R, const N: usize> Observable for Zip<O, F, N>
where
    O: Observable,
    O::Item: Send + 'static,
    O::Error: Send + 'static,
    F: Fn([O::Item; N]) -> Result<R, O::Error> + Send + Sync + 'static,
    R: 'static,
{
    type Item = R;
    type Error = O::Error;

    fn subscribe_with<Ob>(&self, observer: Ob, scheduler: &dyn Scheduler) -> Subscription
    where
        Ob: Observer<Self::Item, Self::Error> + Send + 'static,
    {
        let buffers: [VecDeque<O::Item>; N] = core::array::from_fn(|_| VecDeque::new());
        let shared = Shared::new(buffers, self.combiner.clone(), observer);

        for (index, source) in self.sources.iter().enumerate() {
            if shared.is_closed() {
                break;
            }
            let child = ChildObserver::new(
                index,
                shared.clone(),
                move |buffers: &mut [VecDeque<O::Item>; N], value| {
                    buffers[index].push_back(value)
                },
            );
            shared.attach(source.subscribe_with(child, scheduler));
        }
        shared.subscription()
    }
}

impl<O, F, R, const N: usize> ZipWith<F> for [O; N]
where
    O: IntoObservable,
    O::Item: Send + 'static,
    O::Error: Send + 'static,
    F: Fn([O::Item; N]) -> Result<R, O::Error> + Send + Sync + 'static,
    R: 'static,
{
    type Observable = Zip<O::IntoObservable, F, N>;

    fn zip_with(self, combiner: F) -> Self::Observable {
        Zip::new(self.map(|o| o.into_observable()), combiner)
    }
}

impl<O, const N: usize> ZipTrait for [O; N]
where
    O: IntoObservable,
    O::Item: Send + 'static,
    O::Error: Send + 'static,
{
    type Item = [O::Item; N];
    type Error = O::Error;
    type Observable = Zip<O::IntoObservable, Collect<[O::Item; N], O::Error>, N>;

    fn zip(self) -> Self::Observable {
        self.zip_with(Ok as Collect<_, _>)
    }
}
