//! The public filesystem service.
//!
//! A [`FilesystemService`] owns one worker thread running its own
//! [`EventLoop`]. Requests are handed to that loop, executed one at a time,
//! and their completions are posted back to the caller's loop.

mod dispatch;

use crate::builder::ServiceBuilder;
use crate::error::{Outcome, ServiceError};
use crate::runtime::{EventLoop, KeepAlive, LoopHandle, Scheduler};

use dispatch::{RenameRequest, dispatch};

use std::fmt;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

/// Runs blocking filesystem operations on a dedicated worker thread and
/// delivers their results on the caller's loop.
///
/// The caller's loop is only referenced through the [`Scheduler`] it was
/// built with; the service never runs it. Completion callbacks execute
/// wherever that loop executes its jobs, never on the worker thread.
///
/// # Shutdown
///
/// Dropping the service stops the worker loop and joins the worker thread.
/// A rename already in progress completes and its result is posted. Requests
/// still queued behind it are discarded: their callbacks are never invoked,
/// and the keep-alive tokens they held on the caller loop are released.
///
/// # Example
/// ```
/// use filesystem_service::{EventLoop, FilesystemService};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dir = std::env::temp_dir().join(format!("fs-service-doc-{}", std::process::id()));
/// std::fs::create_dir_all(&dir)?;
/// std::fs::write(dir.join("a.txt"), "hello world")?;
///
/// let event_loop = EventLoop::new();
/// let service = FilesystemService::new(event_loop.handle())?;
///
/// service.async_rename(dir.join("a.txt"), dir.join("b.txt"), |outcome| {
///     assert!(outcome.is_ok());
/// });
///
/// event_loop.run();
/// assert!(dir.join("b.txt").exists());
/// # std::fs::remove_dir_all(&dir)?;
/// # Ok(())
/// # }
/// ```
pub struct FilesystemService<S: Scheduler = LoopHandle> {
    caller: Arc<S>,
    worker: LoopHandle,
    // Keeps the worker loop running while its queue is empty.
    idle: Option<KeepAlive>,
    thread: Option<JoinHandle<()>>,
}

impl<S: Scheduler> FilesystemService<S> {
    /// Starts a service with default settings bound to `caller`.
    ///
    /// # Arguments
    /// * `caller` - Scheduler of the loop that receives completions
    pub fn new(caller: S) -> Result<Self, ServiceError> {
        ServiceBuilder::new().build(caller)
    }

    pub(crate) fn start(builder: ServiceBuilder, caller: S) -> Result<Self, ServiceError> {
        let worker_loop = EventLoop::new();
        let worker = worker_loop.handle();
        let idle = worker.keep_alive();

        let thread_name = builder.thread_name;
        if thread_name.contains('\0') {
            return Err(ServiceError::Spawn {
                thread_name,
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "thread name contains null byte",
                ),
            });
        }

        let mut spawner = thread::Builder::new().name(thread_name.clone());
        if let Some(size) = builder.stack_size {
            spawner = spawner.stack_size(size);
        }

        let thread = spawner
            .spawn(move || {
                debug!("filesystem worker started");
                let executed = worker_loop.run();
                debug!(executed, "filesystem worker exiting");
            })
            .map_err(|source| ServiceError::Spawn {
                thread_name: thread_name.clone(),
                source,
            })?;

        debug!(thread = %thread_name, "filesystem service started");

        Ok(Self {
            caller: Arc::new(caller),
            worker,
            idle: Some(idle),
            thread: Some(thread),
        })
    }

    /// Renames `source` to `destination` on the worker thread.
    ///
    /// Returns immediately. `callback` is invoked exactly once, on the
    /// caller's loop, with the outcome of the rename, unless the service is
    /// dropped before the worker picks the request up. Requests are executed
    /// in the order they were submitted. Failed renames are not retried.
    ///
    /// # Arguments
    /// * `source` - Path to rename
    /// * `destination` - New path
    /// * `callback` - Receives the [`Outcome`] on the caller's loop
    pub fn async_rename<P, Q, F>(&self, source: P, destination: Q, callback: F)
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        F: FnOnce(Outcome) + Send + 'static,
    {
        let request = RenameRequest {
            source: source.as_ref().to_path_buf(),
            destination: destination.as_ref().to_path_buf(),
            callback: Box::new(callback),
            keep_alive: self.caller.keep_alive(),
            caller: Arc::clone(&self.caller),
        };

        dispatch(&self.worker, request);
    }

    /// Number of requests queued on the worker and not yet started.
    pub fn pending(&self) -> usize {
        self.worker.pending()
    }

    /// The scheduler completions are delivered to.
    pub fn caller(&self) -> &S {
        &self.caller
    }
}

impl<S: Scheduler> Drop for FilesystemService<S> {
    fn drop(&mut self) {
        self.worker.stop();

        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            warn!("filesystem worker panicked");
        }

        self.idle.take();

        let discarded = self.worker.queue.drain();
        if !discarded.is_empty() {
            debug!(
                discarded = discarded.len(),
                "discarding rename requests queued at shutdown"
            );
        }
    }
}

impl<S: Scheduler> fmt::Debug for FilesystemService<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilesystemService")
            .field("worker", &self.worker)
            .field("running", &self.thread.is_some())
            .finish_non_exhaustive()
    }
}
