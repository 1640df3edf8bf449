//! Runtime configuration.
//!
//! The server is configured from environment variables, which is all a
//! container entry point gives it. Values that are missing or do not parse
//! fall back to their defaults. Command-line flags, when present, are applied
//! on top (see [`crate::cli`]).
//!
//! | Variable            | Default        |
//! |---------------------|----------------|
//! | `PORT`              | `8001`         |
//! | `BIND_ADDR`         | `0.0.0.0`      |
//! | `LOG_FILE`          | `messages.log` |
//! | `MAX_FILE_SIZE`     | 50 MiB         |
//! | `MAX_MESSAGE_SIZE`  | `4096`         |
//! | `READ_TIMEOUT_MS`   | `5000`         |
//! | `SHUTDOWN_GRACE_MS` | `2000`         |
//! | `LOG_FORMAT`        | `pretty`       |

use crate::util::parse_or;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8001;
pub const DEFAULT_LOG_FILE: &str = "messages.log";
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 4096;
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(5000);
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_millis(2000);

/// Output format of the diagnostic log (not the message log).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub bind: IpAddr,
    pub log_file: PathBuf,
    pub max_file_size: u64,
    pub max_message_size: usize,
    /// How long a connection may stay silent before its message is considered complete.
    pub read_timeout: Duration,
    /// How long in-flight connections get to finish once shutdown starts.
    pub shutdown_grace: Duration,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            read_timeout: DEFAULT_READ_TIMEOUT,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let millis = |name: &str, default: Duration| {
            Duration::from_millis(parse_or(lookup(name), default.as_millis() as u64))
        };

        Self {
            port: parse_or(lookup("PORT"), defaults.port),
            bind: parse_or(lookup("BIND_ADDR"), defaults.bind),
            log_file: lookup("LOG_FILE")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
            max_file_size: parse_or(lookup("MAX_FILE_SIZE"), defaults.max_file_size),
            max_message_size: parse_or(lookup("MAX_MESSAGE_SIZE"), defaults.max_message_size)
                .max(1),
            read_timeout: millis("READ_TIMEOUT_MS", defaults.read_timeout),
            shutdown_grace: millis("SHUTDOWN_GRACE_MS", defaults.shutdown_grace),
            log_format: parse_or(lookup("LOG_FORMAT"), defaults.log_format),
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config, Config::default());
        assert_eq!(config.listen_addr().to_string(), "0.0.0.0:8001");
    }

    #[test]
    fn variables_override_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "9100"),
            ("BIND_ADDR", "127.0.0.1"),
            ("LOG_FILE", "/var/log/scooper.log"),
            ("MAX_FILE_SIZE", "1024"),
            ("MAX_MESSAGE_SIZE", "65536"),
            ("READ_TIMEOUT_MS", "250"),
            ("SHUTDOWN_GRACE_MS", "0"),
            ("LOG_FORMAT", "JSON"),
        ]));

        assert_eq!(config.listen_addr().to_string(), "127.0.0.1:9100");
        assert_eq!(config.log_file, PathBuf::from("/var/log/scooper.log"));
        assert_eq!(config.max_file_size, 1024);
        assert_eq!(config.max_message_size, 65536);
        assert_eq!(config.read_timeout, Duration::from_millis(250));
        assert_eq!(config.shutdown_grace, Duration::ZERO);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn unparsable_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "http"),
            ("MAX_FILE_SIZE", "-5"),
            ("LOG_FORMAT", "xml"),
            ("LOG_FILE", ""),
        ]));
        assert_eq!(config, Config::default());
    }
}
