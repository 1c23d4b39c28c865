//! Thread-local record of the event loop currently executing on this thread.
//!
//! Every job an [`EventLoop`](crate::EventLoop) runs is executed inside
//! [`enter_context`], which marks that loop as current for the duration of the
//! job and restores the previous value afterwards. Loops are identified by the
//! address of their shared queue, so nested runs of different loops on the same
//! thread are tracked correctly.
//!
//! This is what lets [`LoopHandle::running_in_this_thread`] answer whether a
//! completion callback is running on the caller's loop or somewhere else.
//!
//! [`LoopHandle::running_in_this_thread`]: crate::LoopHandle::running_in_this_thread

use crate::runtime::queue::JobQueue;

use std::cell::Cell;
use std::sync::Arc;

thread_local! {
    /// Identity of the loop whose job is executing on this thread, if any.
    ///
    /// Set by [`enter_context`] around every job.
    static CURRENT_LOOP: Cell<Option<usize>> = const { Cell::new(None) };
}

pub(crate) fn loop_id(queue: &Arc<JobQueue>) -> usize {
    Arc::as_ptr(queue) as usize
}

/// Marks `queue`'s loop as current while `function` runs.
///
/// The previous context is restored on exit, including when `function`
/// unwinds.
pub(crate) fn enter_context<F, R>(queue: &Arc<JobQueue>, function: F) -> R
where
    F: FnOnce() -> R,
{
    struct Restore(Option<usize>);

    impl Drop for Restore {
        fn drop(&mut self) {
            CURRENT_LOOP.with(|current| current.set(self.0));
        }
    }

    let _restore = Restore(CURRENT_LOOP.with(|current| current.replace(Some(loop_id(queue)))));

    function()
}

/// Returns true if a job of `queue`'s loop is executing on this thread.
pub(crate) fn is_current(queue: &Arc<JobQueue>) -> bool {
    CURRENT_LOOP.with(|current| current.get() == Some(loop_id(queue)))
}
