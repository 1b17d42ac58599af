use crate::utils::{Receiver, Sender};
use crate::{Observer, Subscription};

use core::fmt;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures_core::Stream;

/// A stream over the notifications of an observable.
///
/// This `struct` is created by the [`into_stream`] method on
/// [`ObservableExt`]. See its documentation for more.
///
/// Values arrive as `Ok`, a failure arrives as a final `Err`, and completion
/// ends the stream. Dropping the stream disposes the subscription.
///
/// [`into_stream`]: crate::observable::ObservableExt::into_stream
/// [`ObservableExt`]: crate::observable::ObservableExt
#[must_use = "streams do nothing unless polled"]
pub struct ObservableStream<T, E> {
    receiver: Receiver<Result<T, E>>,
    subscription: Subscription,
}

impl<T, E> ObservableStream<T, E> {
    pub(crate) fn new(receiver: Receiver<Result<T, E>>, subscription: Subscription) -> Self {
        Self {
            receiver,
            subscription,
        }
    }
}

impl<T, E> fmt::Debug for ObservableStream<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableStream")
            .field("subscription", &self.subscription)
            .finish()
    }
}

impl<T, E> Stream for ObservableStream<T, E> {
    type Item = Result<T, E>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.receiver).poll_next(cx)
    }
}

impl<T, E> Drop for ObservableStream<T, E> {
    fn drop(&mut self) {
        self.subscription.dispose();
    }
}

/// Forwards notifications into a channel.
pub(crate) struct ChannelObserver<T, E> {
    sender: Sender<Result<T, E>>,
}

impl<T, E> ChannelObserver<T, E> {
    pub(crate) fn new(sender: Sender<Result<T, E>>) -> Self {
        Self { sender }
    }
}

impl<T, E> Observer<T, E> for ChannelObserver<T, E> {
    fn on_next(&mut self, value: T) {
        self.sender.send(Ok(value));
    }

    fn on_error(&mut self, error: E) {
        self.sender.send(Err(error));
        self.sender.close();
    }

    fn on_completed(&mut self) {
        self.sender.close();
    }

    fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
