//! Packaging of rename requests for the worker loop.
//!
//! A request crosses threads twice. It is posted to the worker loop as a job
//! holding the paths, the callback and a keep-alive token on the caller loop.
//! After the rename, the outcome and callback are posted back to the caller
//! loop as a second job, and only then is the token released.

use crate::error::Outcome;
use crate::fs;
use crate::runtime::{LoopHandle, Scheduler};

use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, trace, warn};

/// Completion callback of a rename request.
pub(crate) type Callback = Box<dyn FnOnce(Outcome) + Send + 'static>;

/// One rename request on its way to the worker.
pub(crate) struct RenameRequest<S: Scheduler> {
    pub(crate) source: PathBuf,
    pub(crate) destination: PathBuf,
    pub(crate) callback: Callback,
    pub(crate) caller: Arc<S>,
    pub(crate) keep_alive: S::KeepAlive,
}

impl<S: Scheduler> RenameRequest<S> {
    /// Performs the rename and posts the completion back to the caller loop.
    ///
    /// Runs on the worker thread. Failures never escape; they are delivered
    /// to the callback like a success.
    pub(crate) fn execute(self) {
        let Self {
            source,
            destination,
            callback,
            caller,
            keep_alive,
        } = self;

        let outcome = fs::rename(&source, &destination);

        match &outcome {
            Ok(()) => trace!(
                source = %source.display(),
                destination = %destination.display(),
                "rename succeeded"
            ),
            Err(err) => debug!(
                source = %source.display(),
                destination = %destination.display(),
                error = %err,
                os_error = ?err.raw_os_error(),
                "rename failed"
            ),
        }

        caller.post(Box::new(move || callback(outcome)));

        // Released only once the completion is queued on the caller loop.
        drop(keep_alive);
    }
}

/// Queues `request` on the worker loop.
///
/// This is the only cross-thread step taken on the caller's thread; the
/// rename itself happens when the worker dequeues the job.
///
/// A panic while executing the request is contained to that request so the
/// worker thread keeps serving the ones queued behind it. The request's
/// keep-alive token is released while unwinding; its callback never runs.
pub(crate) fn dispatch<S: Scheduler>(worker: &LoopHandle, request: RenameRequest<S>) {
    trace!(
        source = %request.source.display(),
        destination = %request.destination.display(),
        "queueing rename"
    );

    worker.post(move || {
        if panic::catch_unwind(AssertUnwindSafe(|| request.execute())).is_err() {
            warn!("rename request panicked; completion dropped");
        }
    });
}
