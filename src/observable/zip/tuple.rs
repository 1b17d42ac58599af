use super::fanout::{ChildObserver, Shared};
use super::state::Buffers;
use super::{Collect, Zip as ZipTrait, ZipWith};
use crate::observable::{IntoObservable, Observable};
use crate::scheduler::Scheduler;
use crate::{Observer, Subscription};

use core::fmt;
use std::collections::VecDeque;
use std::sync::Arc;

macro_rules! impl_zip_tuple {
    ($StructName:ident $($O:ident=$idx:tt)+) => {
        /// An observable that ‘zips up’ multiple observables into a single
        /// observable of tuples.
        ///
        /// This `struct` is created by the [`zip`] method on the [`Zip`] trait,
        /// or the [`zip_with`] method on the [`ZipWith`] trait. See their
        /// documentation for more.
        ///
        /// [`zip`]: crate::observable::Zip::zip
        /// [`Zip`]: crate::observable::Zip
        /// [`zip_with`]: crate::observable::ZipWith::zip_with
        /// [`ZipWith`]: crate::observable::ZipWith
        #[must_use = "observables do nothing unless subscribed to"]
        pub struct $StructName<$($O,)+ F> {
            sources: ($($O,)+),
            combiner: Arc<F>,
        }

        impl<$($O,)+ F> fmt::Debug for $StructName<$($O,)+ F>
        where $(
            $O: fmt::Debug,
        )+ {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($StructName))
                    $( .field(&self.sources.$idx) )+
                    .finish()
            }
        }

        impl<$($O,)+> Buffers for ($(VecDeque<$O>,)+) {
            type Output = ($($O,)+);

            fn len(&self) -> usize {
                [$($idx),+].len()
            }

            fn all_ready(&self) -> bool {
                $( !self.$idx.is_empty() )&&+
            }

            fn pop(&mut self) -> Self::Output {
                ($( self.$idx.pop_front().unwrap(), )+)
            }
        }

        impl<$($O,)+ F, R, E> Observable for $StructName<$($O,)+ F>
        where $(
            $O: Observable<Error = E>,
            $O::Item: Send + 'static,
        )+
            E: Send + 'static,
            F: Fn(($($O::Item,)+)) -> Result<R, E> + Send + Sync + 'static,
            R: 'static,
        {
            type Item = R;
            type Error = E;

            fn subscribe_with<Ob>(&self, observer: Ob, scheduler: &dyn Scheduler) -> Subscription
            where
                Ob: Observer<R, E> + Send + 'static,
            {
                let buffers = ($( VecDeque::<$O::Item>::new(), )+);
                let shared = Shared::new(buffers, self.combiner.clone(), observer);
                $(
                    if !shared.is_closed() {
                        let child = ChildObserver::new(
                            $idx,
                            shared.clone(),
                            |buffers, value| buffers.$idx.push_back(value),
                        );
                        shared.attach(self.sources.$idx.subscribe_with(child, scheduler));
                    }
                )+
                shared.subscription()
            }
        }

        impl<$($O,)+ F, R, E> ZipWith<F> for ($($O,)+)
        where $(
            $O: IntoObservable<Error = E>,
            $O::Item: Send + 'static,
        )+
            E: Send + 'static,
            F: Fn(($($O::Item,)+)) -> Result<R, E> + Send + Sync + 'static,
            R: 'static,
        {
            type Observable = $StructName<$($O::IntoObservable,)+ F>;

            fn zip_with(self, combiner: F) -> Self::Observable {
                $StructName {
                    sources: ($( self.$idx.into_observable(), )+),
                    combiner: Arc::new(combiner),
                }
            }
        }

        impl<$($O,)+ E> ZipTrait for ($($O,)+)
        where $(
            $O: IntoObservable<Error = E>,
            $O::Item: Send + 'static,
        )+
            E: Send + 'static,
        {
            type Item = ($($O::Item,)+);
            type Error = E;
            type Observable = $StructName<$($O::IntoObservable,)+ Collect<($($O::Item,)+), E>>;

            fn zip(self) -> Self::Observable {
                self.zip_with(Ok as Collect<_, _>)
            }
        }
    };
}

impl_zip_tuple!(Zip1 T0=0);
impl_zip_tuple!(Zip2 T0=0 T1=1);
impl_zip_tuple!(Zip3 T0=0 T1=1 T2=2);
impl_zip_tuple!(Zip4 T0=0 T1=1 T2=2 T3=3);
impl_zip_tuple!(Zip5 T0=0 T1=1 T2=2 T3=3 T4=4);
impl_zip_tuple!(Zip6 T0=0 T1=1 T2=2 T3=3 T4=4 T5=5);
impl_zip_tuple!(Zip7 T0=0 T1=1 T2=2 T3=3 T4=4 T5=5 T6=6);
impl_zip_tuple!(Zip8 T0=0 T1=1 T2=2 T3=3 T4=4 T5=5 T6=6 T7=7);
impl_zip_tuple!(Zip9 T0=0 T1=1 T2=2 T3=3 T4=4 T5=5 T6=6 T7=7 T8=8);
impl_zip_tuple!(Zip10 T0=0 T1=1 T2=2 T3=3 T4=4 T5=5 T6=6 T7=7 T8=8 T9=9);
impl_zip_tuple!(Zip11 T0=0 T1=1 T2=2 T3=3 T4=4 T5=5 T6=6 T7=7 T8=8 T9=9 T10=10);
impl_zip_tuple!(Zip12 T0=0 T1=1 T2=2 T3=3 T4=4 T5=5 T6=6 T7=7 T8=8 T9=9 T10=10 T11=11);

#[cfg(test)]
mod tests {
    use crate::observable::{from_future, from_iter, ObservableExt, Zip, ZipWith};
    use crate::Subject;
    use futures_lite::future::{self, block_on};
    use futures_lite::StreamExt;

    #[test]
    fn zip_tuple_3() {
        block_on(async {
            let a = from_iter::<_, ()>(vec![1, 1]);
            let b = from_iter::<_, ()>(vec!["two", "two"]);
            let c = from_iter::<_, ()>(vec![3.0, 3.0]);
            let mut s = (a, b, c).zip().into_stream();

            assert_eq!(s.next().await, Some(Ok((1, "two", 3.0))));
            assert_eq!(s.next().await, Some(Ok((1, "two", 3.0))));
            assert_eq!(s.next().await, None);
        })
    }

    #[test]
    fn zip_mixed_operands() {
        block_on(async {
            let names = Subject::<&str, ()>::new();
            let id = from_future(|| future::ready(Ok::<_, ()>(7u32)));
            let greetings = (names.clone(), id).zip_with(|(name, id)| Ok(format!("{name}#{id}")));
            let mut s = greetings.into_stream();

            names.next("ada");
            names.next("grace");
            assert_eq!(s.next().await, Some(Ok("ada#7".to_string())));
            // `from_future` completed after one value, so the second name
            // can never be paired.
            assert_eq!(s.next().await, None);
            assert_eq!(names.observer_count(), 0);
        })
    }

    #[test]
    fn zip_single() {
        block_on(async {
            let a = from_iter::<_, ()>(vec!['x', 'y']);
            let out: Vec<_> = (a,).zip().into_stream().collect().await;
            assert_eq!(out, vec![Ok(('x',)), Ok(('y',))]);
        })
    }
}
