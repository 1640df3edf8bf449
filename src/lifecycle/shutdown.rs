//! Shutdown coordination.
//!
//! A [`Shutdown`] handle is shared by the accept loop, the log writer and the
//! signal listener. Whoever triggers first decides the [`ShutdownReason`]; the
//! accept loop waits on it and tears the system down.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};

/// Why the server stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownReason {
    /// Ctrl+C.
    Interrupt,
    /// SIGTERM, e.g. `docker stop`.
    Terminate,
    /// The log file grew past its configured maximum.
    SizeLimit,
    /// A signal listener could not be installed.
    SignalError,
    /// Programmatic shutdown through [`Shutdown::trigger`].
    Requested,
}

impl ShutdownReason {
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Interrupt | Self::Terminate | Self::Requested => 0,
            Self::SizeLimit | Self::SignalError => 1,
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Interrupt => "Ctrl+C received",
            Self::Terminate => "SIGTERM received",
            Self::SizeLimit => "log file size limit exceeded",
            Self::SignalError => "failed to listen for shutdown signals",
            Self::Requested => "shutdown requested",
        };
        f.write_str(text)
    }
}

/// A cloneable, first-reason-wins shutdown trigger.
#[derive(Clone)]
pub struct Shutdown {
    sender: Arc<watch::Sender<Option<ShutdownReason>>>,
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Shutdown {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Records `reason` unless another one was recorded first.
    /// Returns whether this call decided the reason.
    pub fn trigger(&self, reason: ShutdownReason) -> bool {
        self.sender.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(reason);
            true
        })
    }

    pub fn reason(&self) -> Option<ShutdownReason> {
        *self.sender.borrow()
    }

    /// Resolves once a reason has been recorded.
    pub async fn wait(&self) -> ShutdownReason {
        let mut receiver = self.sender.subscribe();
        let reason = match receiver.wait_for(Option::is_some).await {
            Ok(reason) => *reason,
            // The sender lives as long as `self`, so this arm only guards the type.
            Err(_) => None,
        };
        reason.unwrap_or(ShutdownReason::Requested)
    }
}

/// Resolves on Ctrl+C, or on SIGTERM where available.
pub async fn os_signal() -> ShutdownReason {
    wait_for_signal().await
}

#[cfg(unix)]
async fn wait_for_signal() -> ShutdownReason {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(e) => {
            error!(error = %e, "Failed to listen for SIGTERM");
            return ShutdownReason::SignalError;
        }
    };

    tokio::select! {
        result = tokio::signal::ctrl_c() => interrupt_result(result),
        _ = terminate.recv() => {
            info!("SIGTERM received, shutting down server...");
            ShutdownReason::Terminate
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> ShutdownReason {
    interrupt_result(tokio::signal::ctrl_c().await)
}

fn interrupt_result(result: std::io::Result<()>) -> ShutdownReason {
    match result {
        Ok(()) => {
            info!("Ctrl+C received, shutting down server...");
            ShutdownReason::Interrupt
        }
        Err(e) => {
            error!(error = %e, "Failed to listen for Ctrl+C");
            ShutdownReason::SignalError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn first_reason_wins() {
        let shutdown = Shutdown::new();
        assert_eq!(shutdown.reason(), None);
        assert!(shutdown.trigger(ShutdownReason::SizeLimit));
        assert!(!shutdown.trigger(ShutdownReason::Interrupt));
        assert_eq!(shutdown.reason(), Some(ShutdownReason::SizeLimit));
    }

    #[tokio::test]
    async fn wait_sees_trigger_from_a_clone() {
        let shutdown = Shutdown::new();
        let remote = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            remote.trigger(ShutdownReason::Terminate);
        });

        let reason = tokio::time::timeout(Duration::from_secs(2), shutdown.wait())
            .await
            .expect("shutdown never fired");
        assert_eq!(reason, ShutdownReason::Terminate);
    }

    #[tokio::test]
    async fn wait_returns_immediately_when_already_triggered() {
        let shutdown = Shutdown::new();
        shutdown.trigger(ShutdownReason::Requested);
        assert_eq!(shutdown.wait().await, ShutdownReason::Requested);
    }

    #[test]
    fn exit_codes() {
        assert_eq!(ShutdownReason::Interrupt.exit_code(), 0);
        assert_eq!(ShutdownReason::Terminate.exit_code(), 0);
        assert_eq!(ShutdownReason::Requested.exit_code(), 0);
        assert_eq!(ShutdownReason::SizeLimit.exit_code(), 1);
        assert_eq!(ShutdownReason::SignalError.exit_code(), 1);
    }
}
