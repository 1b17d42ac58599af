//! Utilities to implement the different observables of this crate.

#[macro_use]
mod trace;

mod abortable;
mod channel;

pub(crate) use abortable::abortable;
pub(crate) use channel::{channel, Receiver, Sender};
