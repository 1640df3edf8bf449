use crate::clients::LogClient;
use crate::config::Config;
use crate::lifecycle::connection::{handle_connection, ReadLimits};
use crate::lifecycle::{os_signal, Shutdown, ShutdownReason};
use crate::model::SessionStats;
use crate::util::human_readable_size;
use crate::writer::{self, LogWriter};
use crate::ScooperError;
use serde::Serialize;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{info, info_span, warn, Instrument};

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// What a finished session looked like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    pub reason: ShutdownReason,
    pub stats: SessionStats,
}

impl SessionReport {
    pub fn exit_code(&self) -> u8 {
        self.reason.exit_code()
    }
}

/// The runtime orchestrator: one listener, one log writer, many connections.
///
/// `Scooper` is responsible for:
/// - **Lifecycle Management**: Opening the log, binding the port, spawning the writer
/// - **Dependency Wiring**: Handing the shutdown handle to the writer and a client to each connection
/// - **Graceful Shutdown**: Draining connections, closing the writer, reporting totals
///
/// # Example
///
/// ```ignore
/// let server = Scooper::bind(Config::from_env()).await?;
/// let report = server.run().await?;
/// std::process::exit(report.exit_code().into());
/// ```
pub struct Scooper {
    listener: TcpListener,
    local_addr: SocketAddr,
    client: LogClient,
    shutdown: Shutdown,
    limits: ReadLimits,
    shutdown_grace: Duration,
    writer_handle: JoinHandle<LogWriter>,
}

impl Scooper {
    /// Opens the log file, binds the listener and starts the writer.
    ///
    /// The size check happens before the port is bound, so a full log never
    /// accepts a connection.
    pub async fn bind(config: Config) -> Result<Self, ScooperError> {
        let log_writer = LogWriter::open(&config.log_file, config.max_file_size).await?;

        let addr = config.listen_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ScooperError::Bind { addr, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ScooperError::Bind { addr, source })?;

        let shutdown = Shutdown::new();
        let (mailbox, client) = writer::new();
        let writer_handle = tokio::spawn(mailbox.run(log_writer, shutdown.clone()));

        info!(
            "Server listening on {local_addr} and writing to {} (max file size: {})",
            config.log_file.display(),
            human_readable_size(config.max_file_size)
        );

        Ok(Self {
            listener,
            local_addr,
            client,
            shutdown,
            limits: ReadLimits::from(&config),
            shutdown_grace: config.shutdown_grace,
            writer_handle,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn log_client(&self) -> LogClient {
        self.client.clone()
    }

    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Serves until Ctrl+C, SIGTERM, or the size limit.
    pub async fn run(self) -> Result<SessionReport, ScooperError> {
        self.run_until(os_signal()).await
    }

    /// Serves until `signal` resolves or the shutdown handle fires, whichever is first.
    pub async fn run_until<F>(self, signal: F) -> Result<SessionReport, ScooperError>
    where
        F: Future<Output = ShutdownReason> + Send + 'static,
    {
        let trigger = self.shutdown.clone();
        let signal_task = tokio::spawn(async move {
            let reason = signal.await;
            trigger.trigger(reason);
        });

        let mut connections = JoinSet::new();
        let reason = loop {
            tokio::select! {
                reason = self.shutdown.wait() => break reason,
                accepted = self.listener.accept() => match accepted {
                    Ok((socket, peer)) => {
                        let span = info_span!("connection", %peer);
                        connections.spawn(
                            handle_connection(socket, peer, self.client.clone(), self.limits)
                                .instrument(span),
                        );
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to accept connection");
                        // Errors like EMFILE repeat until a descriptor frees up.
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                },
                Some(joined) = connections.join_next(), if !connections.is_empty() => {
                    if let Err(e) = joined {
                        warn!(error = %e, "Connection task failed");
                    }
                }
            }
        };
        signal_task.abort();
        info!(%reason, "Shutting down server...");

        drop(self.listener);
        drain(&mut connections, self.shutdown_grace).await;

        let stats = self.client.close().await?;
        drop(self.client);
        if let Err(e) = self.writer_handle.await {
            warn!(error = %e, "Log writer task failed");
        }

        info!("{stats}");
        Ok(SessionReport { reason, stats })
    }
}

/// Gives in-flight connections `grace` to finish, then aborts the rest.
async fn drain(connections: &mut JoinSet<()>, grace: Duration) {
    if connections.is_empty() {
        return;
    }
    let pending = connections.len();

    let drained = tokio::time::timeout(grace, async {
        while connections.join_next().await.is_some() {}
    })
    .await;

    if drained.is_err() {
        warn!(
            pending,
            remaining = connections.len(),
            "Grace period over, aborting open connections"
        );
        connections.abort_all();
        while connections.join_next().await.is_some() {}
    }
}
