//! Per-connection handling: read one message, hand it to the writer, hang up.

use crate::clients::LogClient;
use crate::config::Config;
use crate::model::Record;
use crate::util::human_readable_size;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

const READ_CHUNK: usize = 4096;

/// Bounds applied to each incoming message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadLimits {
    pub max_message_size: usize,
    /// Maximum silence between two reads.
    pub read_timeout: Duration,
}

impl From<&Config> for ReadLimits {
    fn from(config: &Config) -> Self {
        Self {
            max_message_size: config.max_message_size,
            read_timeout: config.read_timeout,
        }
    }
}

/// Reads one message from `stream` and logs it, then shuts the stream down.
///
/// Errors are reported here and never escape: one bad client must not stop the
/// accept loop.
pub async fn handle_connection<S>(mut stream: S, peer: SocketAddr, client: LogClient, limits: ReadLimits)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    if let Err(e) = log_message(&mut stream, peer, &client, limits).await {
        warn!(error = %e, "Failed to log message");
    }
    if let Err(e) = stream.shutdown().await {
        warn!(error = %e, "Failed to shutdown client socket");
    }
}

async fn log_message<S>(
    stream: &mut S,
    peer: SocketAddr,
    client: &LogClient,
    limits: ReadLimits,
) -> Result<(), crate::ScooperError>
where
    S: AsyncRead + Unpin,
{
    let payload = read_message(stream, limits)
        .await
        .map_err(crate::ScooperError::Read)?;

    if payload.is_empty() {
        // Nothing to stamp; make sure whatever is buffered reaches the disk.
        debug!("Empty message");
        client.flush().await?;
        return Ok(());
    }

    info!("Received {} from {peer}", human_readable_size(payload.len() as u64));
    let total = client.append(Record::new(peer, payload)).await?;
    debug!(total, "Message logged");
    Ok(())
}

/// Reads until end of stream, `max_message_size` bytes, or an idle timeout.
///
/// A timeout or a read error after some data arrived keeps what was read. An
/// error before the first byte is returned.
pub async fn read_message<R>(reader: &mut R, limits: ReadLimits) -> io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut message = Vec::new();
    let mut chunk = vec![0u8; READ_CHUNK.min(limits.max_message_size)];

    while message.len() < limits.max_message_size {
        let want = chunk.len().min(limits.max_message_size - message.len());
        match tokio::time::timeout(limits.read_timeout, reader.read(&mut chunk[..want])).await {
            Err(_) => {
                debug!(bytes = message.len(), "Read timed out");
                break;
            }
            Ok(Ok(0)) => break,
            Ok(Ok(n)) => message.extend_from_slice(&chunk[..n]),
            Ok(Err(e)) if message.is_empty() => return Err(e),
            Ok(Err(e)) => {
                debug!(error = %e, bytes = message.len(), "Read failed, keeping partial message");
                break;
            }
        }
    }

    Ok(message)
}
