use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll, Waker};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use pin_project::pin_project;

#[derive(Debug, Default)]
struct AbortInner {
    aborted: AtomicBool,
    waker: Mutex<Option<Waker>>,
}

/// Remote control for an [`Abortable`] future.
#[derive(Debug, Clone)]
pub(crate) struct AbortHandle {
    inner: Arc<AbortInner>,
}

impl AbortHandle {
    /// Stop the future at its next poll, and wake it so that poll happens.
    pub(crate) fn abort(&self) {
        self.inner.aborted.store(true, Ordering::Release);
        let waker = self.inner.waker.lock().unwrap().take();
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

/// A future which resolves to `None` once its [`AbortHandle`] fired.
#[pin_project]
#[derive(Debug)]
pub(crate) struct Abortable<F> {
    #[pin]
    future: F,
    inner: Arc<AbortInner>,
}

/// Wrap a future so it can be cancelled from another thread.
pub(crate) fn abortable<F: Future>(future: F) -> (Abortable<F>, AbortHandle) {
    let inner = Arc::new(AbortInner::default());
    let handle = AbortHandle {
        inner: inner.clone(),
    };
    (Abortable { future, inner }, handle)
}

impl<F: Future> Future for Abortable<F> {
    type Output = Option<F::Output>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        if this.inner.aborted.load(Ordering::Acquire) {
            return Poll::Ready(None);
        }

        // Register before polling so an abort racing with us is never lost.
        *this.inner.waker.lock().unwrap() = Some(cx.waker().clone());
        if this.inner.aborted.load(Ordering::Acquire) {
            return Poll::Ready(None);
        }

        this.future.poll(cx).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_lite::future::{self, block_on};

    #[test]
    fn completes_when_not_aborted() {
        let (fut, _handle) = abortable(future::ready(3));
        assert_eq!(block_on(fut), Some(3));
    }

    #[test]
    fn abort_before_poll() {
        let (fut, handle) = abortable(future::pending::<()>());
        handle.abort();
        assert_eq!(block_on(fut), None);
    }

    #[test]
    fn abort_from_another_thread_wakes() {
        let (fut, handle) = abortable(future::pending::<()>());
        let aborter = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(10));
            handle.abort();
        });
        assert_eq!(block_on(fut), None);
        aborter.join().unwrap();
    }
}
