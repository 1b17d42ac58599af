use super::{from_future, FromFuture, Observable};

use core::future::Ready;

/// Conversion into an [`Observable`].
///
/// Every zip operand passes through `into_observable` before it is
/// subscribed to, so anything implementing this trait can be zipped. Besides
/// observables themselves, a ready `Result` future is accepted and becomes a
/// single-value observable.
pub trait IntoObservable {
    /// The type of the values being pushed.
    type Item;

    /// The error which may end the sequence.
    type Error;

    /// Which kind of observable are we turning this into?
    type IntoObservable: Observable<Item = Self::Item, Error = Self::Error>;

    /// Creates an observable from a value.
    fn into_observable(self) -> Self::IntoObservable;
}

impl<O: Observable> IntoObservable for O {
    type Item = O::Item;
    type Error = O::Error;
    type IntoObservable = O;

    #[inline]
    fn into_observable(self) -> O {
        self
    }
}

/// The factory behind a ready future turned into an observable.
pub type ReadyFactory<T, E> = Box<dyn Fn() -> Ready<Result<T, E>> + Send>;

/// Every subscription receives a copy of the ready output.
impl<T, E> IntoObservable for Ready<Result<T, E>>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    type Item = T;
    type Error = E;
    type IntoObservable = FromFuture<ReadyFactory<T, E>>;

    fn into_observable(self) -> Self::IntoObservable {
        let factory: ReadyFactory<T, E> = Box::new(move || self.clone());
        from_future(factory)
    }
}

#[cfg(test)]
mod tests {
    use crate::observable::{ObservableExt, Zip};
    use crate::Subject;
    use futures_lite::future::block_on;
    use futures_lite::StreamExt;
    use std::future::ready;

    #[test]
    fn zips_a_ready_future_with_an_observable() {
        block_on(async {
            let names = Subject::<&str, ()>::new();
            let mut s = (names.clone(), ready(Ok::<_, ()>(1u8))).zip().into_stream();

            names.next("one");
            names.next("two");
            assert_eq!(s.next().await, Some(Ok(("one", 1))));
            assert_eq!(s.next().await, None);
        })
    }

    #[test]
    fn ready_error_fails_the_zip() {
        block_on(async {
            let names = Subject::<&str, &str>::new();
            let out: Vec<_> = names
                .clone()
                .zip(ready(Err::<u8, _>("unavailable")))
                .into_stream()
                .collect()
                .await;
            assert_eq!(out, vec![Err("unavailable")]);
            assert_eq!(names.observer_count(), 0);
        })
    }
}
