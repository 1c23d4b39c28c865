//! Blocking filesystem primitives executed on the worker thread.
//!
//! Nothing in this module is asynchronous on its own; the
//! [`FilesystemService`](crate::FilesystemService) is what moves these calls
//! off the caller's loop.

pub(crate) mod rename;

pub(crate) use rename::rename;
