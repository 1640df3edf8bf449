//! Plain data: log records, their on-disk framing, and session statistics.

pub mod record;
pub mod stats;

pub use record::*;
pub use stats::*;
