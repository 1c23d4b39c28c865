//! Runtime subsystem modules.

pub(crate) mod context;
mod core;
mod handle;
pub(crate) mod queue;
mod work;

pub use self::core::EventLoop;
pub use handle::{LoopHandle, Scheduler};
pub use queue::Job;
pub use work::KeepAlive;
