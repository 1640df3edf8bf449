//! Small helpers shared across the crate: clock, environment parsing, size formatting.

pub mod env;
pub mod size;

pub use env::{parsable_env_var, parse_or};
pub use size::human_readable_size;

use std::time::SystemTime;

/// Milliseconds since the Unix epoch, or 0 if the clock reads earlier than that.
pub fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(now_millis() > 1_577_836_800_000);
    }
}
