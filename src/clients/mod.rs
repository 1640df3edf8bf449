//! Typed clients that hide raw message passing from the rest of the crate.

pub mod log_client;

pub use log_client::LogClient;
