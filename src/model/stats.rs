use crate::util::human_readable_size;
use serde::Serialize;
use std::fmt;

/// Byte and record counters kept by the log writer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    /// Size of the whole log file, including content from earlier sessions.
    pub total_bytes: u64,
    /// Bytes appended by this process.
    pub session_bytes: u64,
    /// Records appended by this process.
    pub records: u64,
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total log size: {} | Written in this session: {}",
            human_readable_size(self.total_bytes),
            human_readable_size(self.session_bytes)
        )
    }
}
