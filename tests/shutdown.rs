use filesystem_service::{
    EventLoop, FilesystemService, Job, KeepAlive, LoopHandle, Outcome, Scheduler, ServiceBuilder,
};

use std::fs;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use tempfile::tempdir;

const TIMEOUT: Duration = Duration::from_secs(5);

/// Caller scheduler whose first post blocks until the test opens the gate.
///
/// This pins the worker thread inside the first request so later requests
/// stay queued.
struct Gate {
    inner: LoopHandle,
    entered: Mutex<mpsc::Sender<()>>,
    open: Arc<(Mutex<bool>, Condvar)>,
}

impl Scheduler for Gate {
    type KeepAlive = KeepAlive;

    fn keep_alive(&self) -> KeepAlive {
        self.inner.keep_alive()
    }

    fn post(&self, job: Job) {
        let _ = self.entered.lock().unwrap().send(());

        let (lock, cvar) = &*self.open;
        let mut open = lock.lock().unwrap();
        while !*open {
            open = cvar.wait(open).unwrap();
        }
        drop(open);

        Scheduler::post(&self.inner, job);
    }
}

fn counter() -> (Arc<AtomicUsize>, impl FnOnce(Outcome) + Send + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let inner = count.clone();
    (count, move |_: Outcome| {
        inner.fetch_add(1, Ordering::SeqCst);
    })
}

#[test]
fn drop_returns_with_request_in_flight() {
    let event_loop = EventLoop::new();
    let service = FilesystemService::new(event_loop.handle()).unwrap();
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "hello world").unwrap();

    let (calls, callback) = counter();
    service.async_rename(dir.path().join("a.txt"), dir.path().join("b.txt"), callback);
    drop(service);

    // Either the completion was posted or the request was discarded; in both
    // cases no token is left holding the caller loop.
    let started = Instant::now();
    event_loop.run_for(TIMEOUT);
    assert!(started.elapsed() < TIMEOUT);
    assert!(calls.load(Ordering::SeqCst) <= 1);
    assert_eq!(event_loop.handle().outstanding_work(), 0);
}

#[test]
fn queued_requests_are_discarded_on_drop() {
    let event_loop = EventLoop::new();
    let (entered_tx, entered_rx) = mpsc::channel();
    let open = Arc::new((Mutex::new(false), Condvar::new()));
    let gate = Gate {
        inner: event_loop.handle(),
        entered: Mutex::new(entered_tx),
        open: open.clone(),
    };

    let service = ServiceBuilder::new()
        .thread_name("gated-worker")
        .build(gate)
        .unwrap();
    let dir = tempdir().unwrap();
    for name in ["one.txt", "two.txt", "three.txt"] {
        fs::write(dir.path().join(name), name).unwrap();
    }

    let (first_calls, first) = counter();
    service.async_rename(dir.path().join("one.txt"), dir.path().join("one.moved"), first);
    entered_rx.recv_timeout(TIMEOUT).expect("worker should reach the gate");

    let (later_calls, later) = counter();
    service.async_rename(dir.path().join("two.txt"), dir.path().join("two.moved"), later);
    let (last_calls, last) = counter();
    service.async_rename(dir.path().join("three.txt"), dir.path().join("three.moved"), last);
    assert_eq!(service.pending(), 2);
    assert_eq!(event_loop.handle().outstanding_work(), 3);

    let opener = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        let (lock, cvar) = &*open;
        *lock.lock().unwrap() = true;
        cvar.notify_all();
    });

    drop(service);
    opener.join().unwrap();

    assert_eq!(event_loop.handle().outstanding_work(), 0);
    event_loop.run_for(TIMEOUT);

    assert_eq!(first_calls.load(Ordering::SeqCst), 1);
    assert_eq!(later_calls.load(Ordering::SeqCst), 0);
    assert_eq!(last_calls.load(Ordering::SeqCst), 0);
    assert!(dir.path().join("one.moved").exists());
    assert!(dir.path().join("two.txt").exists());
    assert!(dir.path().join("three.txt").exists());
}

#[test]
fn idle_service_drops_promptly() {
    let event_loop = EventLoop::new();
    let service = FilesystemService::new(event_loop.handle()).unwrap();
    thread::sleep(Duration::from_millis(20));

    let started = Instant::now();
    drop(service);

    assert!(started.elapsed() < TIMEOUT);
    assert_eq!(event_loop.run(), 0);
}

#[test]
fn services_share_one_caller_loop() {
    let event_loop = EventLoop::new();
    let first = FilesystemService::new(event_loop.handle()).unwrap();
    let second = FilesystemService::new(event_loop.handle()).unwrap();
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();
    fs::write(dir.path().join("b.txt"), "b").unwrap();

    let (calls_a, done_a) = counter();
    let (calls_b, done_b) = counter();
    first.async_rename(dir.path().join("a.txt"), dir.path().join("a.moved"), done_a);
    second.async_rename(dir.path().join("b.txt"), dir.path().join("b.moved"), done_b);

    event_loop.run_for(TIMEOUT);

    assert_eq!(calls_a.load(Ordering::SeqCst), 1);
    assert_eq!(calls_b.load(Ordering::SeqCst), 1);
}

/// Caller scheduler whose first post panics.
struct PanicOnce {
    inner: LoopHandle,
    tripped: AtomicBool,
}

impl Scheduler for PanicOnce {
    type KeepAlive = KeepAlive;

    fn keep_alive(&self) -> KeepAlive {
        self.inner.keep_alive()
    }

    fn post(&self, job: Job) {
        if !self.tripped.swap(true, Ordering::SeqCst) {
            panic!("caller loop rejected completion");
        }

        Scheduler::post(&self.inner, job);
    }
}

#[test]
fn worker_keeps_serving_after_a_request_panics() {
    let event_loop = EventLoop::new();
    let scheduler = PanicOnce {
        inner: event_loop.handle(),
        tripped: AtomicBool::new(false),
    };
    let service = FilesystemService::new(scheduler).unwrap();
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();
    fs::write(dir.path().join("b.txt"), "b").unwrap();

    let (lost_calls, lost) = counter();
    let (calls, done) = counter();
    service.async_rename(dir.path().join("a.txt"), dir.path().join("a.moved"), lost);
    service.async_rename(dir.path().join("b.txt"), dir.path().join("b.moved"), done);

    let started = Instant::now();
    event_loop.run_for(TIMEOUT);

    assert!(started.elapsed() < TIMEOUT, "caller loop should run out of work");
    assert_eq!(lost_calls.load(Ordering::SeqCst), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(service.pending(), 0);
    assert_eq!(event_loop.handle().outstanding_work(), 0);
    assert!(dir.path().join("b.moved").exists());
}
