use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

use futures_core::Stream;

struct Channel<T> {
    queue: VecDeque<T>,
    waker: Option<Waker>,
    closed: bool,
    receiver_dropped: bool,
}

/// The receiving half of an unbounded channel.
pub(crate) struct Receiver<T> {
    channel: Arc<Mutex<Channel<T>>>,
}

impl<T> Stream for Receiver<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut channel = self.channel.lock().unwrap();

        match channel.queue.pop_front() {
            Some(item) => Poll::Ready(Some(item)),
            None => {
                if channel.closed {
                    Poll::Ready(None)
                } else {
                    channel.waker = Some(cx.waker().clone());
                    Poll::Pending
                }
            }
        }
    }
}

impl<T> Drop for Receiver<T> {
    fn drop(&mut self) {
        let mut channel = self.channel.lock().unwrap();
        channel.receiver_dropped = true;
        channel.queue.clear();
    }
}

/// The sending half of an unbounded channel.
pub(crate) struct Sender<T> {
    channel: Arc<Mutex<Channel<T>>>,
}

impl<T> Sender<T> {
    pub(crate) fn send(&self, item: T) {
        let mut channel = self.channel.lock().unwrap();
        if channel.closed || channel.receiver_dropped {
            return;
        }

        channel.queue.push_back(item);

        let waker = channel.waker.take();
        drop(channel);
        if let Some(waker) = waker {
            waker.wake();
        }
    }

    /// Mark the end of the sequence. Items sent afterwards are dropped.
    pub(crate) fn close(&self) {
        let mut channel = self.channel.lock().unwrap();
        channel.closed = true;
        let waker = channel.waker.take();
        drop(channel);
        if let Some(waker) = waker {
            waker.wake();
        }
    }

    /// Returns `true` if nothing will be received anymore.
    pub(crate) fn is_closed(&self) -> bool {
        let channel = self.channel.lock().unwrap();
        channel.closed || channel.receiver_dropped
    }
}

impl<T> Drop for Sender<T> {
    fn drop(&mut self) {
        self.close();
    }
}

pub(crate) fn channel<T>() -> (Sender<T>, Receiver<T>) {
    let channel = Arc::new(Mutex::new(Channel {
        queue: VecDeque::new(),
        waker: None,
        closed: false,
        receiver_dropped: false,
    }));

    (
        Sender {
            channel: channel.clone(),
        },
        Receiver { channel },
    )
}
