//! Execution contexts for driving deferred producers.
//!
//! Sources which wrap a [`Future`] or a `Stream` need something to poll them.
//! Whatever is passed to [`Observable::subscribe_with`] decides where that
//! happens. Any `Fn(Task)` closure is a scheduler, which makes it easy to
//! forward to a runtime:
//!
//! ```no_run
//! use observable_zip::scheduler::Task;
//!
//! let on_tokio = |task: Task| {
//!     tokio::spawn(task);
//! };
//! # let _ = on_tokio;
//! ```
//!
//! [`Observable::subscribe_with`]: crate::observable::Observable::subscribe_with

use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Waker};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::task::Wake;

/// A unit of work handed to a [`Scheduler`].
pub type Task = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Something which can run [`Task`]s to completion.
pub trait Scheduler {
    /// Hand a task over to the scheduler.
    fn schedule(&self, task: Task);
}

impl<F> Scheduler for F
where
    F: Fn(Task),
{
    fn schedule(&self, task: Task) {
        self(task)
    }
}

/// A scheduler which runs tasks on whichever thread drives them.
///
/// The task is polled once right away on the scheduling thread. After that it
/// is polled again by the thread which wakes it. No threads are created and
/// nothing blocks.
#[derive(Debug, Default, Clone, Copy)]
pub struct Inline;

impl Scheduler for Inline {
    fn schedule(&self, task: Task) {
        InlineTask::new(task).run();
    }
}

const IDLE: u8 = 0;
const RUNNING: u8 = 1;
const NOTIFIED: u8 = 2;
const COMPLETE: u8 = 3;

struct InlineTask {
    future: Mutex<Option<Task>>,
    state: AtomicU8,
}

impl fmt::Debug for InlineTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlineTask")
            .field("state", &self.state.load(Ordering::Relaxed))
            .finish()
    }
}

impl InlineTask {
    fn new(task: Task) -> Arc<Self> {
        Arc::new(Self {
            future: Mutex::new(Some(task)),
            state: AtomicU8::new(IDLE),
        })
    }

    fn run(self: Arc<Self>) {
        // Claim the task. If someone else is polling it, ask them to go again.
        let mut current = self.state.load(Ordering::Acquire);
        loop {
            let next = match current {
                IDLE => RUNNING,
                RUNNING => NOTIFIED,
                _ => return,
            };
            match self
                .state
                .compare_exchange(current, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(IDLE) => break,
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }

        let waker = Waker::from(self.clone());
        let mut cx = Context::from_waker(&waker);
        loop {
            let mut slot = self.future.lock().unwrap();
            let Some(future) = slot.as_mut() else {
                self.state.store(COMPLETE, Ordering::Release);
                return;
            };
            if future.as_mut().poll(&mut cx).is_ready() {
                *slot = None;
                self.state.store(COMPLETE, Ordering::Release);
                return;
            }
            drop(slot);

            match self
                .state
                .compare_exchange(RUNNING, IDLE, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return,
                // Woken while polling: poll again.
                Err(_) => self.state.store(RUNNING, Ordering::Release),
            }
        }
    }
}

impl Wake for InlineTask {
    fn wake(self: Arc<Self>) {
        self.run()
    }
}
