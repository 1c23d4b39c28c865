//! Fluent builder for FilesystemService construction.
//!
//! Provides a builder pattern interface for configuring the worker thread
//! before the service is started.

use crate::error::ServiceError;
use crate::runtime::Scheduler;
use crate::service::FilesystemService;

/// Name given to the worker thread unless configured otherwise.
pub const DEFAULT_THREAD_NAME: &str = "fs-service-worker";

/// Builder for constructing [`FilesystemService`] instances with fluent API.
///
/// # Example
/// ```
/// use filesystem_service::{EventLoop, ServiceBuilder};
///
/// let event_loop = EventLoop::new();
/// let service = ServiceBuilder::new()
///     .thread_name("renamer")
///     .stack_size(256 * 1024)
///     .build(event_loop.handle())
///     .expect("worker thread should start");
/// # drop(service);
/// ```
#[derive(Clone, Debug)]
pub struct ServiceBuilder {
    pub(crate) thread_name: String,
    pub(crate) stack_size: Option<usize>,
}

impl Default for ServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceBuilder {
    /// Creates a builder with the default worker thread name and the
    /// platform's default stack size.
    pub fn new() -> Self {
        Self {
            thread_name: DEFAULT_THREAD_NAME.to_string(),
            stack_size: None,
        }
    }

    /// Sets the name of the worker thread.
    ///
    /// # Arguments
    /// * `name` - Thread name; must not contain a null byte
    ///
    /// # Returns
    /// The updated builder
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Sets the stack size of the worker thread, in bytes.
    ///
    /// # Arguments
    /// * `size` - Stack size in bytes
    ///
    /// # Returns
    /// The updated builder
    pub fn stack_size(mut self, size: usize) -> Self {
        self.stack_size = Some(size);
        self
    }

    /// Starts the worker thread and returns a service bound to `caller`.
    ///
    /// # Arguments
    /// * `caller` - Scheduler of the loop that receives completions
    ///
    /// # Returns
    /// A running [`FilesystemService`]
    ///
    /// # Errors
    /// Returns [`ServiceError::Spawn`] if the OS refuses to create the thread.
    pub fn build<S: Scheduler>(self, caller: S) -> Result<FilesystemService<S>, ServiceError> {
        FilesystemService::start(self, caller)
    }
}
