use super::Observable;
use crate::scheduler::Scheduler;
use crate::{Observer, Subscription};

use core::fmt;
use core::marker::PhantomData;

/// An observable which synchronously pushes the items of an iterator.
///
/// This `struct` is created by the [`from_iter`] function. See its
/// documentation for more.
pub struct FromIter<I, E> {
    iter: I,
    _error: PhantomData<fn() -> E>,
}

impl<I: fmt::Debug, E> fmt::Debug for FromIter<I, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FromIter").field(&self.iter).finish()
    }
}

impl<I: Clone, E> Clone for FromIter<I, E> {
    fn clone(&self) -> Self {
        Self {
            iter: self.iter.clone(),
            _error: PhantomData,
        }
    }
}

/// Converts an iterable into a cold observable.
///
/// Each subscription walks a fresh clone of `iter`, pushes every item, and
/// then completes. The error type is never produced and only exists so the
/// observable can be zipped with fallible sources.
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
///     let numbers = from_iter::<_, ()>(1..=3);
///     let out: Vec<_> = numbers.into_stream().collect().await;
///     assert_eq!(out, vec![Ok(1), Ok(2), Ok(3)]);
/// })
/// ```
pub fn from_iter<I, E>(iter: I) -> FromIter<I, E>
where
    I: IntoIterator + Clone,
{
    FromIter {
        iter,
        _error: PhantomData,
    }
}

impl<I, E> Observable for FromIter<I, E>
where
    I: IntoIterator + Clone,
{
    type Item = I::Item;
    type Error = E;

    fn subscribe_with<O>(&self, mut observer: O, _scheduler: &dyn Scheduler) -> Subscription
    where
        O: Observer<Self::Item, Self::Error> + Send + 'static,
    {
        for item in self.iter.clone() {
            if observer.is_closed() {
                return Subscription::disposed();
            }
            observer.on_next(item);
        }
        if !observer.is_closed() {
            observer.on_completed();
        }
        Subscription::disposed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer;
    use std::sync::{Arc, Mutex};

    #[test]
    fn pushes_every_item_then_completes() {
        let log = Arc::new(Mutex::new(vec![]));
        let (next, done) = (log.clone(), log.clone());
        from_iter::<_, ()>(vec![1, 2]).subscribe(observer::from_fn(
            move |n: i32| next.lock().unwrap().push(n),
            |_: ()| {},
            move || done.lock().unwrap().push(0),
        ));
        assert_eq!(*log.lock().unwrap(), vec![1, 2, 0]);
    }

    #[test]
    fn is_reusable() {
        let source = from_iter::<_, ()>(vec!['a', 'b']);
        for _ in 0..2 {
            let seen = Arc::new(Mutex::new(String::new()));
            let sink = seen.clone();
            source.subscribe(observer::from_fn(
                move |c: char| sink.lock().unwrap().push(c),
                |_: ()| {},
                || {},
            ));
            assert_eq!(*seen.lock().unwrap(), "ab");
        }
    }

    #[test]
    fn stops_when_observer_closes() {
        struct TakeTwo(Arc<Mutex<Vec<u32>>>);
        impl Observer<u32, ()> for TakeTwo {
            fn on_next(&mut self, value: u32) {
                self.0.lock().unwrap().push(value);
            }
            fn on_error(&mut self, _: ()) {}
            fn on_completed(&mut self) {
                panic!("closed observers are not completed");
            }
            fn is_closed(&self) -> bool {
                self.0.lock().unwrap().len() >= 2
            }
        }

        let seen = Arc::new(Mutex::new(vec![]));
        from_iter::<_, ()>(0..).subscribe(TakeTwo(seen.clone()));
        assert_eq!(*seen.lock().unwrap(), vec![0, 1]);
    }
}
