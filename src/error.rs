//! # Design
//!
//! - A rename failure is data: it travels to the completion callback inside an
//!   [`Outcome`] and is never raised across the worker boundary.
//! - Constant error messages; the paths involved are kept as fields.
//! - The underlying `io::Error` is always preserved so callers can inspect the
//!   platform error code.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result of one rename attempt. `Ok(())` means the rename happened.
pub type Outcome = Result<(), RenameError>;

/// Reasons a rename did not happen.
///
/// A failed rename never leaves partial state behind: the source is still in
/// place and nothing was created at the destination.
#[derive(Debug, Error)]
pub enum RenameError {
    /// The source path does not exist.
    #[error("rename source not found")]
    SourceNotFound {
        /// Source path of the request.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The destination cannot be created, e.g. its parent directory is missing.
    #[error("rename destination invalid")]
    DestinationInvalid {
        /// Destination path of the request.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The process lacks permission on the source or destination directory.
    #[error("rename permission denied")]
    PermissionDenied {
        /// Source path of the request.
        from: PathBuf,
        /// Destination path of the request.
        to: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Any other platform failure, including renames across devices.
    #[error("rename failed")]
    Platform {
        /// Source path of the request.
        from: PathBuf,
        /// Destination path of the request.
        to: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
}

impl RenameError {
    /// The underlying IO error.
    pub fn io_error(&self) -> &io::Error {
        match self {
            Self::SourceNotFound { source, .. }
            | Self::DestinationInvalid { source, .. }
            | Self::PermissionDenied { source, .. }
            | Self::Platform { source, .. } => source,
        }
    }

    /// The platform error code, when the failure came from the OS.
    pub fn raw_os_error(&self) -> Option<i32> {
        self.io_error().raw_os_error()
    }
}

/// Errors raised while setting up a [`FilesystemService`](crate::FilesystemService).
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The worker thread could not be started.
    #[error("failed to spawn filesystem worker thread")]
    Spawn {
        /// Requested worker thread name.
        thread_name: String,
        /// Underlying IO error.
        source: io::Error,
    },
}
