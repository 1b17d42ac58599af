//! Push-based observables which can be ‘zipped up’ into a single sequence.
//!
//! An [`Observable`][observable::Observable] pushes values to an
//! [`Observer`], followed by at most one terminal notification: an error or
//! completion. Zipping subscribes to several observables at once and pairs
//! their values up by position: the `n`-th output combines the `n`-th value
//! of every source.
//!
//! # Operations
//!
//! This library provides the following operations on arrays, vecs, and tuples
//! of observables:
//!
//! - [`observable::Zip`]: ‘Zips up’ multiple observables into a single observable of tuples.
//! - [`observable::ZipWith`]: Same as `Zip`, but every aligned set of values is passed through a
//!   fallible combiner.
//!
//! Single observables gain [`ObservableExt::zip`][observable::ObservableExt::zip] and
//! [`ObservableExt::zip_list`][observable::ObservableExt::zip_list], the latter pairing values with
//! a list which is already in memory.
//!
//! # Examples
//!
//! Zip three heterogenous sources into a stream of tuples:
//! ```rust
//! use observable_zip::observable::{from_future, from_iter};
//! use observable_zip::prelude::*;
//! use futures_lite::future::{self, block_on};
//! use futures_lite::StreamExt;
//!
//! block_on(async {
//!     let a = from_iter::<_, ()>(vec![1u8, 2]);
//!     let b = from_iter::<_, ()>(vec!["hello", "world"]);
//!     let c = from_future(|| future::ready(Ok::<_, ()>(3u16)));
//!
//!     let out: Vec<_> = (a, b, c).zip().into_stream().collect().await;
//!     assert_eq!(out, vec![Ok((1, "hello", 3))]);
//! })
//! ```
//!
//! # Threads
//!
//! Sources may push from any thread. All notifications of one zip
//! subscription are serialized, and the downstream observer is never called
//! concurrently with itself. Deferred producers run on the
//! [`Scheduler`][scheduler::Scheduler] passed to
//! [`subscribe_with`][observable::Observable::subscribe_with].
//!
//! # Limitations
//!
//! The downstream observer is called while the zip's critical section is
//! held. Pushing into one of the zip's own sources from inside that observer
//! deadlocks.

#![deny(missing_debug_implementations, nonstandard_style)]
#![warn(missing_docs, unreachable_pub)]

#[macro_use]
mod utils;

/// The observable zip prelude.
pub mod prelude {
    pub use super::observable::Observable;

    pub use super::observable::IntoObservable as _;
    pub use super::observable::ObservableExt as _;
    pub use super::observable::Zip as _;
    pub use super::observable::ZipWith as _;
}

pub mod observable;
pub mod observer;
pub mod scheduler;

mod subject;
mod subscription;

pub use observer::Observer;
pub use subject::Subject;
pub use subscription::Subscription;

/// Helper functions and types for tuples.
pub mod tuple {
    pub use crate::observable::zip::tuple::{
        Zip1, Zip10, Zip11, Zip12, Zip2, Zip3, Zip4, Zip5, Zip6, Zip7, Zip8, Zip9,
    };
}

/// Helper functions and types for fixed-length arrays.
pub mod array {
    pub use crate::observable::zip::array::Zip;
}

/// Helper functions and types for contiguous growable array type with heap-allocated contents,
/// written `Vec<T>`.
pub mod vec {
    pub use crate::observable::zip::vec::Zip;
}
