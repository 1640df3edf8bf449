//! Top-level error type.

use crate::model::ParseError;
use crate::writer::WriterError;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScooperError {
    #[error("failed to listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Writer(#[from] WriterError),

    #[error("failed to read from client: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to read {}: {source}", .path.display())]
    Inspect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid log file: {0}")]
    Parse(#[from] ParseError),
}
