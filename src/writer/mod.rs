//! Log writer actor, its requests and its errors.

pub mod actor;
pub mod error;

pub use actor::*;
pub use error::*;

use crate::clients::LogClient;
use crate::framework::{mailbox, Mailbox};

/// Requests that may queue up before connection tasks wait on the writer.
pub const MAILBOX_CAPACITY: usize = 64;

/// Creates the writer's mailbox and the client that feeds it.
pub fn new() -> (Mailbox<LogWriter>, LogClient) {
    let (mailbox, address) = mailbox(MAILBOX_CAPACITY);
    (mailbox, LogClient::new(address))
}
