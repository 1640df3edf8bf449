use crate::config::LogFormat;
use tracing_subscriber::EnvFilter;

/// Initializes the tracing/logging infrastructure for the application.
///
/// This sets up structured logging using the `tracing` crate with:
/// - **Environment-based filtering**: Controlled via `RUST_LOG`, `info` when unset
/// - **Selectable formatting**: Human-readable lines, or one JSON object per event
///
/// # Environment Variables
///
/// Set `RUST_LOG` to control log verbosity:
/// - `RUST_LOG=info` - Connections, totals, and shutdown (the default)
/// - `RUST_LOG=debug` - Also every request the writer handles
/// - `RUST_LOG=scooper=trace` - Everything, for this crate only
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn setup_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let _ = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
