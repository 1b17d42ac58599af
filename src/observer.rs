//! Receivers of push-based notifications.
//!
//! An [`Observer`] receives zero or more values through [`on_next`], followed
//! by at most one terminal notification: either [`on_error`] or
//! [`on_completed`].
//!
//! [`on_next`]: Observer::on_next
//! [`on_error`]: Observer::on_error
//! [`on_completed`]: Observer::on_completed

use core::fmt;

/// The receiving end of an [`Observable`](crate::observable::Observable).
pub trait Observer<T, E> {
    /// Receive the next value of the sequence.
    fn on_next(&mut self, value: T);

    /// Receive the failure which terminates the sequence.
    fn on_error(&mut self, error: E);

    /// Receive the notification that the sequence ended normally.
    fn on_completed(&mut self);

    /// Returns `true` if this observer no longer wants notifications.
    ///
    /// Producers which emit synchronously check this between values so they
    /// can stop early.
    fn is_closed(&self) -> bool {
        false
    }
}

impl<T, E, O> Observer<T, E> for Box<O>
where
    O: Observer<T, E> + ?Sized,
{
    fn on_next(&mut self, value: T) {
        (**self).on_next(value)
    }

    fn on_error(&mut self, error: E) {
        (**self).on_error(error)
    }

    fn on_completed(&mut self) {
        (**self).on_completed()
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }
}

/// An observer built from three closures.
///
/// This `struct` is created by the [`from_fn`] function. See its
/// documentation for more.
pub struct FnObserver<N, Er, C> {
    next: N,
    error: Er,
    completed: C,
}

impl<N, Er, C> fmt::Debug for FnObserver<N, Er, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnObserver").finish_non_exhaustive()
    }
}

/// Create an observer from a value, an error, and a completion callback.
///
/// # Examples
///
/// ```
/// use observable_zip::observable::from_iter;
/// use observable_zip::observer;
/// use observable_zip::prelude::*;
/// use std::sync::{Arc, Mutex};
///
/// let seen = Arc::new(Mutex::new(vec![]));
/// let sink = seen.clone();
/// from_iter::<_, ()>(vec![1, 2, 3]).subscribe(observer::from_fn(
///     move |n: i32| sink.lock().unwrap().push(n),
///     |_: ()| {},
///     || {},
/// ));
/// assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
/// ```
pub fn from_fn<T, E, N, Er, C>(next: N, error: Er, completed: C) -> FnObserver<N, Er, C>
where
    N: FnMut(T),
    Er: FnMut(E),
    C: FnMut(),
{
    FnObserver {
        next,
        error,
        completed,
    }
}

impl<T, E, N, Er, C> Observer<T, E> for FnObserver<N, Er, C>
where
    N: FnMut(T),
    Er: FnMut(E),
    C: FnMut(),
{
    fn on_next(&mut self, value: T) {
        (self.next)(value)
    }

    fn on_error(&mut self, error: E) {
        (self.error)(error)
    }

    fn on_completed(&mut self) {
        (self.completed)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fn_observer_dispatches() {
        let mut values = vec![];
        let mut errors = vec![];
        let mut completions = 0;
        {
            let mut observer = from_fn(
                |n: u8| values.push(n),
                |e: &str| errors.push(e),
                || completions += 1,
            );
            observer.on_next(1);
            observer.on_next(2);
            observer.on_error("boom");
            observer.on_completed();
            assert!(!observer.is_closed());
        }
        assert_eq!(values, vec![1, 2]);
        assert_eq!(errors, vec!["boom"]);
        assert_eq!(completions, 1);
    }

    #[test]
    fn boxed_observer_forwards() {
        let mut out = vec![];
        {
            let mut boxed: Box<dyn Observer<u8, ()> + '_> =
                Box::new(from_fn(|n: u8| out.push(n), |_: ()| {}, || {}));
            boxed.on_next(7);
        }
        assert_eq!(out, vec![7]);
    }
}
