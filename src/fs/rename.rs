//! Synchronous rename and failure classification.
//!
//! The rename is a single `rename(2)` call, so it either fully happens or
//! leaves the filesystem untouched. On failure the OS error code is mapped
//! onto [`RenameError`] so callbacks can tell a missing source apart from a
//! bad destination without inspecting errno values themselves.

use crate::error::{Outcome, RenameError};

use std::fs;
use std::io;
use std::path::Path;

/// Renames `source` to `destination`, blocking the calling thread.
///
/// Paths are passed to the OS as raw bytes, so any encoding the platform
/// accepts works.
pub(crate) fn rename(source: &Path, destination: &Path) -> Outcome {
    rename_raw(source, destination).map_err(|err| classify(err, source, destination))
}

#[cfg(unix)]
fn rename_raw(source: &Path, destination: &Path) -> io::Result<()> {
    let from = c_path(source)?;
    let to = c_path(destination)?;

    let result = unsafe { libc::rename(from.as_ptr(), to.as_ptr()) };

    if result < 0 {
        return Err(io::Error::last_os_error());
    }

    Ok(())
}

#[cfg(not(unix))]
fn rename_raw(source: &Path, destination: &Path) -> io::Result<()> {
    fs::rename(source, destination)
}

#[cfg(unix)]
fn c_path(path: &Path) -> io::Result<std::ffi::CString> {
    use std::os::unix::ffi::OsStrExt;

    std::ffi::CString::new(path.as_os_str().as_bytes())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path contains null byte"))
}

#[cfg(unix)]
fn classify(err: io::Error, source: &Path, destination: &Path) -> RenameError {
    match err.raw_os_error() {
        Some(libc::ENOENT | libc::ENOTDIR) if source_absent(source) => not_found(err, source),
        Some(
            libc::ENOENT
            | libc::ENOTDIR
            | libc::EISDIR
            | libc::EINVAL
            | libc::ENAMETOOLONG
            | libc::EEXIST
            | libc::ENOTEMPTY
            | libc::ELOOP,
        ) => invalid_destination(err, destination),
        Some(libc::EACCES | libc::EPERM | libc::EROFS) => denied(err, source, destination),
        Some(_) => platform(err, source, destination),
        None => by_kind(err, source, destination),
    }
}

#[cfg(not(unix))]
fn classify(err: io::Error, source: &Path, destination: &Path) -> RenameError {
    by_kind(err, source, destination)
}

// Fallback for failures that carry no OS error code, e.g. an interior NUL byte.
fn by_kind(err: io::Error, source: &Path, destination: &Path) -> RenameError {
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::InvalidInput if source_absent(source) => {
            not_found(err, source)
        }
        io::ErrorKind::NotFound | io::ErrorKind::InvalidInput => {
            invalid_destination(err, destination)
        }
        io::ErrorKind::PermissionDenied => denied(err, source, destination),
        _ => platform(err, source, destination),
    }
}

// The source is absent when it cannot be looked up at all. A source that exists
// but cannot be stat'ed for other reasons is not reported as missing.
fn source_absent(source: &Path) -> bool {
    match fs::symlink_metadata(source) {
        Ok(_) => false,
        Err(err) => {
            matches!(
                err.kind(),
                io::ErrorKind::NotFound | io::ErrorKind::InvalidInput
            ) || is_not_a_directory(&err)
        }
    }
}

#[cfg(unix)]
fn is_not_a_directory(err: &io::Error) -> bool {
    err.raw_os_error() == Some(libc::ENOTDIR)
}

#[cfg(not(unix))]
fn is_not_a_directory(_err: &io::Error) -> bool {
    false
}

fn not_found(err: io::Error, source: &Path) -> RenameError {
    RenameError::SourceNotFound {
        path: source.to_path_buf(),
        source: err,
    }
}

fn invalid_destination(err: io::Error, destination: &Path) -> RenameError {
    RenameError::DestinationInvalid {
        path: destination.to_path_buf(),
        source: err,
    }
}

fn denied(err: io::Error, source: &Path, destination: &Path) -> RenameError {
    RenameError::PermissionDenied {
        from: source.to_path_buf(),
        to: destination.to_path_buf(),
        source: err,
    }
}

fn platform(err: io::Error, source: &Path, destination: &Path) -> RenameError {
    RenameError::Platform {
        from: source.to_path_buf(),
        to: destination.to_path_buf(),
        source: err,
    }
}
