//! Single-threaded event loop that executes posted jobs.
//!
//! The loop coordinates the execution of jobs posted from any thread and keeps
//! running for as long as keep-alive tokens are outstanding. Both sides of a
//! [`FilesystemService`](crate::FilesystemService) are event loops: the
//! application drives the caller loop, and the service drives its own worker
//! loop on a dedicated thread.

use crate::runtime::context::enter_context;
use crate::runtime::handle::LoopHandle;
use crate::runtime::queue::{JobQueue, Next};

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::trace;

/// Cooperative run loop over a FIFO job queue.
///
/// Jobs run on whichever thread calls [`run`](Self::run),
/// [`run_for`](Self::run_for), [`run_until`](Self::run_until) or
/// [`poll`](Self::poll), strictly in the order they were posted.
///
/// # Example
/// ```
/// use filesystem_service::EventLoop;
///
/// let event_loop = EventLoop::new();
/// let handle = event_loop.handle();
///
/// std::thread::spawn(move || handle.post(|| println!("on the loop thread")));
/// ```
pub struct EventLoop {
    queue: Arc<JobQueue>,
}

impl EventLoop {
    /// Creates a new loop with an empty queue and no outstanding work.
    pub fn new() -> Self {
        Self {
            queue: Arc::new(JobQueue::new()),
        }
    }

    /// Returns a handle that can post to this loop from any thread.
    pub fn handle(&self) -> LoopHandle {
        LoopHandle::new(self.queue.clone())
    }

    /// Runs jobs until the loop is stopped or runs out of work.
    ///
    /// The loop runs out of work when its queue is empty and no
    /// [`KeepAlive`](crate::KeepAlive) token is outstanding. While tokens are
    /// outstanding and the queue is empty, the calling thread sleeps.
    ///
    /// # Returns
    /// The number of jobs executed
    pub fn run(&self) -> usize {
        self.run_inner(None)
    }

    /// Like [`run`](Self::run), but also returns once `timeout` has elapsed.
    ///
    /// # Arguments
    /// * `timeout` - Longest time to keep running, measured from now
    ///
    /// # Returns
    /// The number of jobs executed
    pub fn run_for(&self, timeout: Duration) -> usize {
        self.run_until(Instant::now() + timeout)
    }

    /// Like [`run`](Self::run), but also returns once `deadline` has passed.
    ///
    /// A job that is executing when the deadline passes is not interrupted.
    ///
    /// # Arguments
    /// * `deadline` - Instant after which no further job is started
    ///
    /// # Returns
    /// The number of jobs executed
    pub fn run_until(&self, deadline: Instant) -> usize {
        self.run_inner(Some(deadline))
    }

    /// Runs every job that is ready without blocking.
    ///
    /// Jobs posted by the jobs being run are executed too.
    ///
    /// # Returns
    /// The number of jobs executed
    pub fn poll(&self) -> usize {
        let mut executed = 0;

        while !self.queue.is_stopped() {
            let Some(job) = self.queue.pop() else {
                break;
            };

            enter_context(&self.queue, job);
            executed += 1;
        }

        executed
    }

    /// Asks every runner of this loop to return after its current job.
    pub fn stop(&self) {
        self.queue.stop();
    }

    /// Clears a previous [`stop`](Self::stop) so the loop can be run again.
    pub fn restart(&self) {
        self.queue.restart();
    }

    /// Checks if the loop has been stopped.
    pub fn is_stopped(&self) -> bool {
        self.queue.is_stopped()
    }

    fn run_inner(&self, deadline: Option<Instant>) -> usize {
        let mut executed = 0;

        loop {
            match self.queue.next(deadline) {
                Next::Run(job) => {
                    enter_context(&self.queue, job);
                    executed += 1;
                }
                Next::Stopped => {
                    trace!(executed, "event loop stopped");
                    break;
                }
                Next::OutOfWork => {
                    trace!(executed, "event loop out of work");
                    break;
                }
                Next::TimedOut => {
                    trace!(executed, "event loop deadline reached");
                    break;
                }
            }
        }

        executed
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}
