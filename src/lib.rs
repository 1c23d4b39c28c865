//! Blocking filesystem operations offloaded to a worker thread, with results
//! delivered back on the caller's event loop.
//!
//! This crate moves a rename off the thread that drives an application's event
//! loop, runs it on a dedicated worker thread, and posts the outcome back so the
//! completion callback runs on the loop's own thread. Callers never block and
//! never need to synchronize with the worker.
//!
//! # Architecture
//!
//! - **EventLoop**: Single-threaded run loop over a FIFO job queue; both the
//!   caller's loop and the worker's loop are event loops
//! - **LoopHandle**: Thread-safe handle for posting jobs to a loop
//! - **KeepAlive**: Guard that keeps a loop running while work is outstanding
//! - **Scheduler**: Interface the service needs from the caller's loop
//! - **FilesystemService**: Owns the worker thread and exposes `async_rename`
//! - **ServiceBuilder**: Fluent builder for configuring the worker thread
//!
//! # Example
//!
//! ```
//! use filesystem_service::{EventLoop, FilesystemService, RenameError};
//!
//! let event_loop = EventLoop::new();
//! let service = FilesystemService::new(event_loop.handle()).unwrap();
//!
//! let dir = std::env::temp_dir();
//! service.async_rename(
//!     dir.join("fs-service-does-not-exist.txt"),
//!     dir.join("fs-service-never-created.txt"),
//!     |outcome| assert!(matches!(outcome, Err(RenameError::SourceNotFound { .. }))),
//! );
//!
//! event_loop.run();
//! ```

mod builder;
mod error;
mod fs;
mod runtime;
mod service;

pub use builder::{DEFAULT_THREAD_NAME, ServiceBuilder};
pub use error::{Outcome, RenameError, ServiceError};
pub use runtime::{EventLoop, Job, KeepAlive, LoopHandle, Scheduler};
pub use service::FilesystemService;
