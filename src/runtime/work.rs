//! Keep-alive tokens.
//!
//! A [`KeepAlive`] tells an event loop that more jobs are on their way even
//! though its queue may be empty right now. While at least one token is
//! outstanding, [`EventLoop::run`](crate::EventLoop::run) sleeps instead of
//! returning when it runs out of jobs.

use crate::runtime::queue::JobQueue;

use std::fmt;
use std::sync::Arc;

/// Guard that keeps an event loop from running out of work.
///
/// Created with [`LoopHandle::keep_alive`](crate::LoopHandle::keep_alive).
/// The token is released exactly once, when the guard is dropped; it is
/// deliberately not `Clone`.
#[must_use = "the loop is only kept alive while the token is held"]
pub struct KeepAlive {
    queue: Arc<JobQueue>,
}

impl KeepAlive {
    pub(crate) fn new(queue: Arc<JobQueue>) -> Self {
        queue.acquire_work();
        Self { queue }
    }
}

impl Drop for KeepAlive {
    fn drop(&mut self) {
        self.queue.release_work();
    }
}

impl fmt::Debug for KeepAlive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeepAlive")
            .field("outstanding", &self.queue.outstanding_work())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_token_counts_once() {
        let queue = Arc::new(JobQueue::new());

        let first = KeepAlive::new(queue.clone());
        let second = KeepAlive::new(queue.clone());
        assert_eq!(queue.outstanding_work(), 2);

        drop(first);
        assert_eq!(queue.outstanding_work(), 1);

        drop(second);
        assert_eq!(queue.outstanding_work(), 0);
    }

    #[test]
    fn token_can_move_to_another_thread() {
        let queue = Arc::new(JobQueue::new());
        let token = KeepAlive::new(queue.clone());

        std::thread::spawn(move || drop(token)).join().unwrap();

        assert_eq!(queue.outstanding_work(), 0);
    }
}
