//! # Server Lifecycle & Orchestration
//!
//! This module owns everything that happens between "process started" and
//! "process exits":
//!
//! 1. **Startup** - Open the log file, check its size, bind the port, spawn the writer
//! 2. **Serving** - Accept connections and run one task per client
//! 3. **Shutdown** - Stop on a signal or on the size limit, drain, flush, report
//! 4. **Observability Setup** - Initialize tracing
//!
//! ## Shutdown Flow
//!
//! Three parties can end a session: the OS (Ctrl+C, SIGTERM), the log writer
//! (file grew past the limit) and the embedding program
//! ([`Shutdown::trigger`]). They all go through one [`Shutdown`] handle, and the
//! first reason recorded is the one reported.
//!
//! Once fired, the accept loop:
//!
//! 1. **Stops accepting** - The listener is dropped
//! 2. **Drains** - In-flight connections get the grace period, then are aborted
//! 3. **Closes the writer** - An explicit `Close` request flushes and returns the final stats
//! 4. **Awaits the writer task** - So no buffered bytes are lost
//!
//! An explicit close is used instead of relying on channel closure because the
//! server keeps a client of its own until the very end.
//!
//! **Usage:**
//! ```bash
//! RUST_LOG=info scooper     # Connections and totals
//! RUST_LOG=debug scooper    # Every writer request
//! ```

pub mod connection;
pub mod server;
pub mod shutdown;
pub mod tracing;

pub use self::connection::*;
pub use self::server::*;
pub use self::shutdown::*;
pub use self::tracing::*;
