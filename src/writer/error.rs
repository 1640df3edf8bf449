//! Error types for the log writer.

use crate::framework::FrameworkError;
use thiserror::Error;

/// Errors that can occur while appending to the log file.
#[derive(Debug, Error)]
pub enum WriterError {
    /// The underlying file operation failed.
    #[error("log file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The log file is already past its maximum size.
    #[error("log file size {size} bytes exceeds the limit of {limit} bytes")]
    LimitExceeded { size: u64, limit: u64 },

    /// The writer was closed and accepts no more records.
    #[error("log writer is closed")]
    Closed,

    /// The writer task could not be reached.
    #[error("log writer unavailable: {0}")]
    Actor(#[from] FrameworkError),
}
