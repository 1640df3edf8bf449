//! The log writer actor.
//!
//! [`LogWriter`] is the only owner of the open log file. Connection tasks reach
//! it through a [`LogClient`](crate::clients::LogClient); their requests are
//! handled one at a time, so a record's stamp and payload always land next to
//! each other in the file.

use crate::framework::{Actor, Response};
use crate::lifecycle::{Shutdown, ShutdownReason};
use crate::model::{Record, SessionStats};
use crate::util::human_readable_size;
use crate::writer::WriterError;
use async_trait::async_trait;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, warn};

/// Requests understood by [`LogWriter`].
#[derive(Debug)]
pub enum LogRequest {
    /// Append one record; answers with the new total file size.
    Append {
        record: Record,
        respond_to: Response<Result<u64, WriterError>>,
    },
    Flush {
        respond_to: Response<Result<(), WriterError>>,
    },
    Stats {
        respond_to: Response<SessionStats>,
    },
    /// Flush, refuse further appends, and stop the actor.
    Close {
        respond_to: Response<Result<SessionStats, WriterError>>,
    },
}

/// Owns the log file and its byte counters.
pub struct LogWriter {
    path: PathBuf,
    file: File,
    max_size: u64,
    initial_size: u64,
    total_size: u64,
    records: u64,
    closed: bool,
}

impl LogWriter {
    /// Opens (or creates) the log file in append mode.
    ///
    /// Fails with [`WriterError::LimitExceeded`] if the file is already larger
    /// than `max_size`.
    pub async fn open(path: impl AsRef<Path>, max_size: u64) -> Result<Self, WriterError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        let size = file.metadata().await?.len();
        if size > max_size {
            return Err(WriterError::LimitExceeded {
                size,
                limit: max_size,
            });
        }
        debug!(path = %path.display(), size, "Log file opened");

        Ok(Self {
            path,
            file,
            max_size,
            initial_size: size,
            total_size: size,
            records: 0,
            closed: false,
        })
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            total_bytes: self.total_size,
            session_bytes: self.total_size.saturating_sub(self.initial_size),
            records: self.records,
        }
    }

    async fn append(&mut self, record: &Record, shutdown: &Shutdown) -> Result<u64, WriterError> {
        if self.closed {
            return Err(WriterError::Closed);
        }
        if self.total_size > self.max_size {
            return Err(WriterError::LimitExceeded {
                size: self.total_size,
                limit: self.max_size,
            });
        }

        let mut encoded = record.stamp().into_bytes();
        encoded.extend_from_slice(&record.payload);

        let written = match self.file.write_all(&encoded).await {
            Ok(()) => self.file.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            self.restore_after_failed_write().await;
            return Err(e.into());
        }

        self.total_size += encoded.len() as u64;
        self.records += 1;

        if self.total_size > self.max_size {
            error!(
                limit = %human_readable_size(self.max_size),
                total = self.total_size,
                "File size exceeds the limit | Exiting..."
            );
            shutdown.trigger(ShutdownReason::SizeLimit);
        }
        Ok(self.total_size)
    }

    /// Cuts off whatever part of a failed record reached the file, so the
    /// counters and the framing both match the disk again.
    async fn restore_after_failed_write(&mut self) {
        if let Err(e) = self.file.set_len(self.total_size).await {
            warn!(path = %self.path.display(), error = %e, "Failed to truncate partial record");
            match self.file.metadata().await {
                Ok(meta) => self.total_size = meta.len(),
                Err(e) => error!(path = %self.path.display(), error = %e, "Failed to read log file size"),
            }
        }
    }
}

#[async_trait]
impl Actor for LogWriter {
    type Request = LogRequest;
    type Context = Shutdown;

    async fn handle(&mut self, request: LogRequest, shutdown: &Shutdown) -> ControlFlow<()> {
        match request {
            LogRequest::Append { record, respond_to } => {
                let result = self.append(&record, shutdown).await;
                if let Err(e) = &result {
                    warn!(peer = %record.peer, error = %e, "Append rejected");
                }
                let _ = respond_to.send(result);
            }
            LogRequest::Flush { respond_to } => {
                let result = self.file.flush().await.map_err(WriterError::from);
                let _ = respond_to.send(result);
            }
            LogRequest::Stats { respond_to } => {
                let _ = respond_to.send(self.stats());
            }
            LogRequest::Close { respond_to } => {
                self.closed = true;
                let result = self.file.flush().await.map(|()| self.stats());
                let _ = respond_to.send(result.map_err(WriterError::from));
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    async fn on_stop(&mut self, _shutdown: &Shutdown) {
        self.closed = true;
        if let Err(e) = self.file.flush().await {
            error!(path = %self.path.display(), error = %e, "Failed to flush log file");
        }
    }
}
