//! Handles used to reach an event loop from other threads.

use crate::runtime::context;
use crate::runtime::queue::{Job, JobQueue};
use crate::runtime::work::KeepAlive;

use std::fmt;
use std::sync::Arc;

/// A loop that accepts work from other threads.
///
/// This is the interface a [`FilesystemService`](crate::FilesystemService)
/// needs from the caller's loop: a way to post a closure that will later run
/// on the loop's own thread, and a way to keep the loop from going idle while
/// a request is outstanding. [`LoopHandle`] implements it for this crate's
/// [`EventLoop`](crate::EventLoop); applications that drive their own loop can
/// implement it for that loop instead.
pub trait Scheduler: Send + Sync + 'static {
    /// Guard returned by [`keep_alive`](Self::keep_alive). Dropping it releases
    /// the loop.
    type KeepAlive: Send + 'static;

    /// Registers an outstanding piece of work against the loop.
    fn keep_alive(&self) -> Self::KeepAlive;

    /// Queues `job` to run later on the loop's thread.
    fn post(&self, job: Job);
}

/// Cloneable, thread-safe reference to an [`EventLoop`](crate::EventLoop).
///
/// The handle never owns the loop's thread; it only shares the loop's queue.
#[derive(Clone)]
pub struct LoopHandle {
    pub(crate) queue: Arc<JobQueue>,
}

impl LoopHandle {
    pub(crate) fn new(queue: Arc<JobQueue>) -> Self {
        Self { queue }
    }

    /// Queues `job` to run on the loop's thread after every job posted before it.
    ///
    /// Posting to a stopped loop still queues the job; it runs once the loop
    /// is restarted and run again.
    ///
    /// # Arguments
    /// * `job` - Closure to execute on the loop's thread
    pub fn post<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.queue.push(Box::new(job));
    }

    /// Returns a token that keeps the loop's `run` from returning while held.
    pub fn keep_alive(&self) -> KeepAlive {
        KeepAlive::new(self.queue.clone())
    }

    /// Asks every runner of the loop to return after its current job.
    pub fn stop(&self) {
        self.queue.stop();
    }

    /// Checks if the loop has been stopped.
    pub fn is_stopped(&self) -> bool {
        self.queue.is_stopped()
    }

    /// Returns true when called from a job executing on this loop.
    pub fn running_in_this_thread(&self) -> bool {
        context::is_current(&self.queue)
    }

    /// Number of jobs queued and not yet started.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Number of keep-alive tokens currently outstanding.
    pub fn outstanding_work(&self) -> usize {
        self.queue.outstanding_work()
    }
}

impl Scheduler for LoopHandle {
    type KeepAlive = KeepAlive;

    fn keep_alive(&self) -> KeepAlive {
        LoopHandle::keep_alive(self)
    }

    fn post(&self, job: Job) {
        self.queue.push(job);
    }
}

impl fmt::Debug for LoopHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoopHandle")
            .field("id", &context::loop_id(&self.queue))
            .field("pending", &self.pending())
            .field("stopped", &self.is_stopped())
            .finish()
    }
}
