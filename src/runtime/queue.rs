//! Thread-safe job queue shared by an event loop and its handles.
//!
//! Provides a FIFO queue that any thread can push jobs onto and that the
//! loop's runner pops from. The queue also tracks the loop's stop flag and the
//! number of outstanding keep-alive tokens, since both decide whether an idle
//! runner should wait or return.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// A unit of deferred work posted to an event loop.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// What an idle runner should do next.
pub(crate) enum Next {
    /// A job was dequeued and must be executed.
    Run(Job),
    /// The loop was stopped.
    Stopped,
    /// No jobs are queued and nothing keeps the loop alive.
    OutOfWork,
    /// The deadline passed while waiting.
    TimedOut,
}

/// A thread-safe, FIFO queue for storing posted jobs.
///
/// Uses a Mutex-wrapped VecDeque paired with a Condvar so runners can sleep
/// while the loop is kept alive but has nothing to execute.
pub(crate) struct JobQueue {
    queue: Mutex<VecDeque<Job>>,
    ready: Condvar,
    stopped: AtomicBool,
    work: AtomicUsize,
}

impl JobQueue {
    /// Creates a new empty queue with no outstanding work.
    pub(crate) fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            ready: Condvar::new(),
            stopped: AtomicBool::new(false),
            work: AtomicUsize::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Job>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueues a job behind every job already queued.
    ///
    /// Wakes one idle runner, if any.
    pub(crate) fn push(&self, job: Job) {
        self.lock().push_back(job);
        self.ready.notify_one();
    }

    /// Dequeues the next job without blocking.
    pub(crate) fn pop(&self) -> Option<Job> {
        self.lock().pop_front()
    }

    /// Number of jobs currently queued.
    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    /// Removes every queued job without running it.
    ///
    /// The jobs are returned so the caller can drop them outside the lock;
    /// dropping a job may release keep-alive tokens held by other loops.
    pub(crate) fn drain(&self) -> Vec<Job> {
        self.lock().drain(..).collect()
    }

    /// Signals every runner to return after its current job.
    pub(crate) fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        let _guard = self.lock();
        self.ready.notify_all();
    }

    /// Clears the stop flag so the loop can be run again.
    pub(crate) fn restart(&self) {
        self.stopped.store(false, Ordering::SeqCst);
    }

    /// Checks if a stop has been requested.
    pub(crate) fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Registers one more outstanding keep-alive token.
    pub(crate) fn acquire_work(&self) {
        self.work.fetch_add(1, Ordering::SeqCst);
    }

    /// Releases one keep-alive token.
    ///
    /// When the last token goes away, idle runners are woken so they can
    /// notice that the loop ran out of work.
    pub(crate) fn release_work(&self) {
        if self.work.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Taking the lock orders this wake-up after a runner's idle check.
            let _guard = self.lock();
            self.ready.notify_all();
        }
    }

    /// Number of keep-alive tokens currently outstanding.
    pub(crate) fn outstanding_work(&self) -> usize {
        self.work.load(Ordering::SeqCst)
    }

    /// Blocks until a job is available, the loop is stopped, it runs out of
    /// work, or `deadline` passes.
    pub(crate) fn next(&self, deadline: Option<Instant>) -> Next {
        let mut queue = self.lock();

        loop {
            if self.is_stopped() {
                return Next::Stopped;
            }

            if let Some(job) = queue.pop_front() {
                return Next::Run(job);
            }

            if self.outstanding_work() == 0 {
                return Next::OutOfWork;
            }

            queue = match deadline {
                None => self.ready.wait(queue).unwrap_or_else(PoisonError::into_inner),
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Next::TimedOut;
                    }

                    self.ready
                        .wait_timeout(queue, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
            };
        }
    }
}
