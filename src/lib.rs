//! # scooper
//!
//! > **A tiny TCP message logger.**
//!
//! Every client connection delivers one message. scooper stamps it with the
//! receive time, the client address and its size, then appends it to a single
//! log file. The file has a size ceiling. When a write pushes it past the
//! ceiling, the server shuts down instead of growing without bound.
//!
//! ## 🏗️ Design
//!
//! ### One owner for the file
//! All writes go through the [`LogWriter`](writer::LogWriter) actor, which owns
//! the open file and the byte counters. Connection tasks never touch the file.
//! They send requests through a [`LogClient`](clients::LogClient). Requests are
//! handled one at a time, so stamps and payloads never interleave and nothing
//! needs a lock.
//!
//! ### Shutdown is a value
//! Signals, the size limit and programmatic stops all record a
//! [`ShutdownReason`](lifecycle::ShutdownReason) on one shared handle. The
//! first reason recorded decides the exit code.
//!
//! ## 🗺️ Module Tour
//!
//! - [`framework`]: Mailbox, address and request/response plumbing for actors.
//! - [`writer`]: The log writer actor and its errors.
//! - [`clients`]: The typed client connection tasks use.
//! - [`model`]: Records, the on-disk stamp format, and session counters.
//! - [`lifecycle`]: The accept loop, per-connection handling, shutdown, tracing setup.
//! - [`config`]: Environment-driven configuration.
//! - [`cli`]: The `scooper` command line.
//! - [`util`]: Clock, environment parsing, size formatting.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! PORT=8001 LOG_FILE=messages.log scooper
//! printf 'hello' | nc -N localhost 8001
//! scooper inspect messages.log
//! ```

pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod util;
pub mod writer;

pub use error::ScooperError;
pub use util::{human_readable_size, now_millis, parsable_env_var};
