//! # Log Records
//!
//! Every message lands in the log file as a stamp line followed by the raw payload:
//!
//! ```text
//! \n$$$<received_at_ms>$$$<peer>$$$<payload_len>$$$\n<payload bytes>
//! ```
//!
//! The payload is not escaped. Readers locate the next record from the declared
//! length, never by scanning for a marker inside the payload.

use crate::util::now_millis;
use serde::Serialize;
use std::fmt;
use std::net::SocketAddr;

const STAMP_OPEN: &[u8] = b"\n$$$";
const STAMP_CLOSE: &[u8] = b"$$$\n";
const FIELD_SEPARATOR: &str = "$$$";

/// One message received from one client.
#[derive(Clone, PartialEq, Eq)]
pub struct Record {
    /// Milliseconds since the Unix epoch at which the message was received.
    pub received_at: u128,
    pub peer: SocketAddr,
    pub payload: Vec<u8>,
}

impl Record {
    /// Stamps `payload` with the current time.
    pub fn new(peer: SocketAddr, payload: Vec<u8>) -> Self {
        Self {
            received_at: now_millis(),
            peer,
            payload,
        }
    }

    /// The header line written before the payload.
    pub fn stamp(&self) -> String {
        format!(
            "\n$$${}$$${}$$${}$$$\n",
            self.received_at,
            self.peer,
            self.payload.len()
        )
    }

    /// Bytes this record occupies in the log file.
    pub fn encoded_len(&self) -> u64 {
        (self.stamp().len() + self.payload.len()) as u64
    }

    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            received_at: self.received_at,
            peer: self.peer,
            size: self.payload.len() as u64,
        }
    }
}

// Payloads can be large and binary; keep Debug output to the metadata.
impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("received_at", &self.received_at)
            .field("peer", &self.peer)
            .field("len", &self.payload.len())
            .finish()
    }
}

/// Metadata of a record, without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecordSummary {
    pub received_at: u128,
    pub peer: SocketAddr,
    pub size: u64,
}

/// Errors produced while reading a log file back.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("malformed record at byte {offset}: {reason}")]
    Malformed { offset: usize, reason: &'static str },

    #[error("truncated record at byte {offset}: expected {expected} payload bytes, found {available}")]
    Truncated {
        offset: usize,
        expected: usize,
        available: usize,
    },
}

/// Parses every record in a log file.
pub fn parse_log(bytes: &[u8]) -> Result<Vec<Record>, ParseError> {
    let mut records = Vec::new();
    let mut offset = 0;

    while offset < bytes.len() {
        let (record, next) = parse_record(bytes, offset)?;
        records.push(record);
        offset = next;
    }

    Ok(records)
}

/// Parses the record starting at `offset` and returns it with the offset of the next one.
fn parse_record(bytes: &[u8], offset: usize) -> Result<(Record, usize), ParseError> {
    let malformed = |reason| ParseError::Malformed { offset, reason };

    let rest = &bytes[offset..];
    if !rest.starts_with(STAMP_OPEN) {
        return Err(malformed("missing stamp marker"));
    }

    let header_start = STAMP_OPEN.len();
    let header_len = rest[header_start..]
        .windows(STAMP_CLOSE.len())
        .position(|window| window == STAMP_CLOSE)
        .ok_or_else(|| malformed("unterminated stamp"))?;
    let header = std::str::from_utf8(&rest[header_start..header_start + header_len])
        .map_err(|_| malformed("stamp is not valid UTF-8"))?;

    let mut fields = header.split(FIELD_SEPARATOR);
    let (Some(received_at), Some(peer), Some(len), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(malformed("stamp must have exactly three fields"));
    };

    let received_at = received_at
        .parse::<u128>()
        .map_err(|_| malformed("invalid timestamp"))?;
    let peer = peer
        .parse::<SocketAddr>()
        .map_err(|_| malformed("invalid peer address"))?;
    let len = len
        .parse::<usize>()
        .map_err(|_| malformed("invalid payload length"))?;

    let payload_start = header_start + header_len + STAMP_CLOSE.len();
    let available = rest.len() - payload_start;
    if available < len {
        return Err(ParseError::Truncated {
            offset,
            expected: len,
            available,
        });
    }

    let record = Record {
        received_at,
        peer,
        payload: rest[payload_start..payload_start + len].to_vec(),
    };
    Ok((record, offset + payload_start + len))
}
