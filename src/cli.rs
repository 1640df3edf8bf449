//! Command-line interface.
//!
//! `scooper` with no arguments runs the server, which is what a container entry
//! point does. `scooper inspect` reads a log file back.

use crate::config::Config;
use crate::lifecycle::Scooper;
use crate::model::{parse_log, RecordSummary};
use crate::util::human_readable_size;
use crate::ScooperError;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::net::IpAddr;
use std::path::PathBuf;
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "scooper")]
#[command(version, about = "Log raw TCP messages to a single stamped file", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Port to listen on (overrides PORT)
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Address to bind (overrides BIND_ADDR)
    #[arg(long, global = true)]
    pub bind: Option<IpAddr>,

    /// Log file to append to (overrides LOG_FILE)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Maximum log file size in bytes (overrides MAX_FILE_SIZE)
    #[arg(long, global = true)]
    pub max_file_size: Option<u64>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the server (default)
    Serve,
    /// Summarize the records in a log file
    Inspect {
        /// Log file to read (defaults to the configured log file)
        file: Option<PathBuf>,
        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Applies command-line overrides on top of `config`.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(log_file) = &self.log_file {
            config.log_file = log_file.clone();
        }
        if let Some(max_file_size) = self.max_file_size {
            config.max_file_size = max_file_size;
        }
        config
    }
}

/// Runs the chosen command and returns the process exit code.
pub async fn run(command: Command, config: Config) -> u8 {
    let result = match command {
        Command::Serve => serve(config).await,
        Command::Inspect { file, json } => {
            let path = file.unwrap_or(config.log_file);
            inspect(path, json).await
        }
    };

    result.unwrap_or_else(|e| {
        error!(error = %e, "Exiting...");
        1
    })
}

async fn serve(config: Config) -> Result<u8, ScooperError> {
    let server = Scooper::bind(config).await?;
    let report = server.run().await?;
    Ok(report.exit_code())
}

/// A summary of a log file, as printed by `scooper inspect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    pub path: PathBuf,
    pub file_bytes: u64,
    pub payload_bytes: u64,
    pub records: Vec<RecordSummary>,
}

impl InspectReport {
    pub fn from_bytes(path: PathBuf, bytes: &[u8]) -> Result<Self, ScooperError> {
        let records: Vec<RecordSummary> = parse_log(bytes)?.iter().map(|r| r.summary()).collect();
        Ok(Self {
            path,
            file_bytes: bytes.len() as u64,
            payload_bytes: records.iter().map(|r| r.size).sum(),
            records,
        })
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&format!(
                "{}\t{}\t{}\n",
                record.received_at,
                record.peer,
                human_readable_size(record.size)
            ));
        }
        out.push_str(&format!(
            "{} records, {} of payload, {} on disk ({})\n",
            self.records.len(),
            human_readable_size(self.payload_bytes),
            human_readable_size(self.file_bytes),
            self.path.display()
        ));
        out
    }
}

async fn inspect(path: PathBuf, json: bool) -> Result<u8, ScooperError> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|source| ScooperError::Inspect {
            path: path.clone(),
            source,
        })?;
    let report = InspectReport::from_bytes(path, &bytes)?;

    if json {
        let rendered = serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
            error!(error = %e, "Failed to serialize report");
            String::from("{}")
        });
        println!("{rendered}");
    } else {
        print!("{}", report.render_text());
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;

    #[test]
    fn no_arguments_means_serve() {
        let cli = Cli::try_parse_from(["scooper"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.apply(Config::default()), Config::default());
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "scooper",
            "serve",
            "--port",
            "9000",
            "--log-file",
            "/tmp/x.log",
            "--max-file-size",
            "10",
        ])
        .unwrap();
        let config = cli.apply(Config::default());
        assert_eq!(cli.command, Some(Command::Serve));
        assert_eq!(config.port, 9000);
        assert_eq!(config.log_file, PathBuf::from("/tmp/x.log"));
        assert_eq!(config.max_file_size, 10);
    }

    #[test]
    fn inspect_takes_optional_file() {
        let cli = Cli::try_parse_from(["scooper", "inspect", "a.log", "--json"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Inspect {
                file: Some(PathBuf::from("a.log")),
                json: true
            })
        );
    }

    #[test]
    fn report_totals() {
        let record = Record {
            received_at: 42,
            peer: "127.0.0.1:9".parse().unwrap(),
            payload: b"abcdef".to_vec(),
        };
        let mut bytes = record.stamp().into_bytes();
        bytes.extend_from_slice(&record.payload);

        let report = InspectReport::from_bytes(PathBuf::from("m.log"), &bytes).unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.payload_bytes, 6);
        assert_eq!(report.file_bytes, bytes.len() as u64);
        assert!(report.render_text().starts_with("42\t127.0.0.1:9\t6 B\n"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["records"][0]["size"], 6);
    }

    #[test]
    fn corrupt_log_is_an_error() {
        let result = InspectReport::from_bytes(PathBuf::from("m.log"), b"junk");
        assert!(matches!(result, Err(ScooperError::Parse(_))));
    }

    #[tokio::test]
    async fn inspect_of_missing_file_exits_with_one() {
        let dir = tempfile::tempdir().unwrap();
        let command = Command::Inspect {
            file: Some(dir.path().join("absent.log")),
            json: false,
        };
        assert_eq!(run(command, Config::default()).await, 1);
    }

    #[tokio::test]
    async fn inspect_of_corrupt_file_exits_with_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.log");
        std::fs::write(&path, b"definitely not a log").unwrap();

        let command = Command::Inspect {
            file: Some(path),
            json: true,
        };
        assert_eq!(run(command, Config::default()).await, 1);
    }

    #[tokio::test]
    async fn inspect_of_valid_file_exits_with_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.log");
        std::fs::write(&path, b"").unwrap();

        let command = Command::Inspect {
            file: Some(path),
            json: false,
        };
        assert_eq!(run(command, Config::default()).await, 0);
    }
}
