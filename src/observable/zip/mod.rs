use super::Observable;

pub use list::ZipList;

pub(crate) mod array;
pub(crate) mod list;
pub(crate) mod tuple;
pub(crate) mod vec;

mod fanout;
mod state;

/// The combiner used by [`Zip::zip`]: it hands the collected values through
/// unchanged.
pub type Collect<T, E> = fn(T) -> Result<T, E>;

/// ‘Zips up’ multiple observables into a single observable of tuples.
///
/// The `n`-th output holds the `n`-th value of every source, in source order.
pub trait Zip {
    /// What's the type of the zipped values?
    type Item;

    /// What's the error shared by all sources?
    type Error;

    /// What observable do we return?
    type Observable: Observable<Item = Self::Item, Error = Self::Error>;

    /// Combine multiple observables into a single observable.
    fn zip(self) -> Self::Observable;
}

/// ‘Zips up’ multiple observables, combining every aligned set of values with
/// a function.
///
/// The combiner receives the same collection [`Zip`] would yield. Returning
/// `Err` ends the zipped sequence with that error and cancels every source.
pub trait ZipWith<F> {
    /// What observable do we return?
    type Observable: Observable;

    /// Combine multiple observables into a single observable using `combiner`.
    fn zip_with(self, combiner: F) -> Self::Observable;
}
