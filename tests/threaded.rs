//! Sources pushing from several threads at once.

use observable_zip::observable::{from_future, from_stream};
use observable_zip::prelude::*;
use observable_zip::scheduler::Task;
use observable_zip::{Observer, Subject};

use futures_lite::StreamExt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use tokio::time::{sleep, Duration};

fn on_tokio(task: Task) {
    tokio::spawn(task);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn zips_futures_on_a_runtime() {
    let slow = from_future(|| async {
        sleep(Duration::from_millis(20)).await;
        Ok::<_, ()>("slow")
    });
    let fast = from_future(|| async { Ok::<_, ()>("fast") });

    let (sender, receiver) = tokio::sync::oneshot::channel();
    let mut sender = Some(sender);
    let _subscription = (slow, fast).zip().subscribe_with(
        observable_zip::observer::from_fn(
            move |pair: (&'static str, &'static str)| {
                if let Some(sender) = sender.take() {
                    let _ = sender.send(pair);
                }
            },
            |_: ()| {},
            || {},
        ),
        &on_tokio,
    );

    assert_eq!(receiver.await.unwrap(), ("slow", "fast"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn dispose_cancels_pending_work() {
    let started = Arc::new(AtomicBool::new(false));
    let flag = started.clone();
    let never = from_stream(move || {
        flag.store(true, Ordering::SeqCst);
        futures_lite::stream::pending::<Result<u8, ()>>()
    });
    let ticks = from_stream(|| {
        futures_lite::stream::iter(0..).then(|n: u8| async move {
            sleep(Duration::from_millis(1)).await;
            Ok::<_, ()>(n)
        })
    });

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let subscription = (never, ticks).zip().subscribe_with(
        observable_zip::observer::from_fn(
            move |_: (u8, u8)| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            |_: ()| {},
            || {},
        ),
        &on_tokio,
    );

    sleep(Duration::from_millis(10)).await;
    subscription.dispose();
    assert!(started.load(Ordering::SeqCst));
    assert!(subscription.is_disposed());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

/// Counts how many threads are inside the observer at the same time.
struct Exclusive {
    inside: Arc<AtomicUsize>,
    overlapped: Arc<AtomicBool>,
    values: Arc<Mutex<Vec<(usize, usize)>>>,
    completed: Arc<AtomicBool>,
}

impl Observer<(usize, usize), ()> for Exclusive {
    fn on_next(&mut self, value: (usize, usize)) {
        if self.inside.fetch_add(1, Ordering::SeqCst) != 0 {
            self.overlapped.store(true, Ordering::SeqCst);
        }
        self.values.lock().unwrap().push(value);
        thread::yield_now();
        self.inside.fetch_sub(1, Ordering::SeqCst);
    }

    fn on_error(&mut self, _: ()) {}

    fn on_completed(&mut self) {
        self.completed.store(true, Ordering::SeqCst);
    }
}

#[test]
fn notifications_are_serialized() {
    let a = Subject::<usize, ()>::new();
    let b = Subject::<usize, ()>::new();
    let values = Arc::new(Mutex::new(vec![]));
    let overlapped = Arc::new(AtomicBool::new(false));
    let completed = Arc::new(AtomicBool::new(false));
    let _subscription = (a.clone(), b.clone()).zip().subscribe(Exclusive {
        inside: Arc::new(AtomicUsize::new(0)),
        overlapped: overlapped.clone(),
        values: values.clone(),
        completed: completed.clone(),
    });

    let left = thread::spawn(move || {
        for n in 0..1000 {
            a.next(n);
        }
        a.complete();
    });
    let right = thread::spawn(move || {
        for n in 0..700 {
            b.next(n * 2);
        }
        b.complete();
    });
    left.join().unwrap();
    right.join().unwrap();

    let values = values.lock().unwrap();
    assert!(!overlapped.load(Ordering::SeqCst));
    assert!(completed.load(Ordering::SeqCst));
    assert_eq!(values.len(), 700);
    for (n, pair) in values.iter().enumerate() {
        assert_eq!(*pair, (n, n * 2));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn stream_bridge_across_threads() {
    let sources: Vec<Subject<u32, ()>> = (0..4).map(|_| Subject::new()).collect();
    let mut s = sources.clone().zip().into_stream();

    let handles: Vec<_> = sources
        .into_iter()
        .enumerate()
        .map(|(index, subject)| {
            thread::spawn(move || {
                for n in 0..50 {
                    subject.next(n * 10 + index as u32);
                }
                subject.complete();
            })
        })
        .collect();

    let mut seen = 0;
    while let Some(row) = s.next().await {
        let row = row.unwrap();
        let expected: Vec<u32> = (0..4).map(|i| seen * 10 + i).collect();
        assert_eq!(row, expected);
        seen += 1;
    }
    assert_eq!(seen, 50);

    for handle in handles {
        handle.join().unwrap();
    }
}

#[derive(Debug, PartialEq)]
enum Event<T> {
    Next(T),
    Error(&'static str),
    Completed,
}

/// Appends every notification to a shared log.
struct Log<T>(Arc<Mutex<Vec<Event<T>>>>);

impl<T> Observer<T, &'static str> for Log<T> {
    fn on_next(&mut self, value: T) {
        self.0.lock().unwrap().push(Event::Next(value));
    }

    fn on_error(&mut self, error: &'static str) {
        self.0.lock().unwrap().push(Event::Error(error));
    }

    fn on_completed(&mut self) {
        self.0.lock().unwrap().push(Event::Completed);
    }
}

/// Asserts a single error closes the log and every earlier row is aligned.
fn assert_fails_once(log: &[Event<Vec<u32>>], error: &'static str) {
    let errors = log.iter().filter(|e| matches!(e, Event::Error(_))).count();
    assert_eq!(errors, 1);
    assert_eq!(log.last(), Some(&Event::Error(error)));
    assert!(!log.contains(&Event::Completed));
    for (n, event) in log[..log.len() - 1].iter().enumerate() {
        assert_eq!(*event, Event::Next(vec![n as u32; 3]));
    }
}

#[test]
fn source_error_races_other_sources() {
    for _ in 0..50 {
        let sources: Vec<Subject<u32, &'static str>> = (0..3).map(|_| Subject::new()).collect();
        let log = Arc::new(Mutex::new(vec![]));
        let _subscription = sources.clone().zip().subscribe(Log(log.clone()));

        let failing = sources[0].clone();
        let mut handles = vec![thread::spawn(move || {
            for n in 0..100 {
                failing.next(n);
            }
            failing.error("boom");
        })];
        for subject in sources[1..].iter().cloned() {
            handles.push(thread::spawn(move || {
                for n in 0..200 {
                    subject.next(n);
                }
                subject.complete();
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let log = log.lock().unwrap();
        assert!(log.len() <= 101);
        assert_fails_once(&log, "boom");
        assert!(sources.iter().all(|s| s.observer_count() == 0));
    }
}

#[test]
fn combiner_error_races_every_source() {
    for _ in 0..50 {
        let sources: Vec<Subject<u32, &'static str>> = (0..3).map(|_| Subject::new()).collect();
        let log = Arc::new(Mutex::new(vec![]));
        let _subscription = sources
            .clone()
            .zip_with(|row: Vec<u32>| match row[0] {
                30 => Err("row 30"),
                _ => Ok(row),
            })
            .subscribe(Log(log.clone()));

        let handles: Vec<_> = sources
            .iter()
            .cloned()
            .map(|subject| {
                thread::spawn(move || {
                    for n in 0..200 {
                        subject.next(n);
                    }
                    subject.complete();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 31);
        assert_fails_once(&log, "row 30");
    }
}
