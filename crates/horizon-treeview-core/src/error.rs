//! Error types for the core event-loop plumbing.

/// Errors raised by the scheduler and event loop.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// The timer ID is invalid, has already fired, or was cancelled.
    #[error("Invalid or expired timer ID")]
    InvalidTimerId,
    /// The task has already run or was cancelled.
    #[error("Task not found in the pending queue")]
    TaskNotFound,
}

/// A specialized Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
