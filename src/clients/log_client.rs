use crate::framework::Address;
use crate::model::{Record, SessionStats};
use crate::writer::{LogRequest, LogWriter, WriterError};
use tracing::{debug, instrument};

/// Client for interacting with the [`LogWriter`] actor.
///
/// Cheap to clone; every connection task gets its own copy.
#[derive(Clone)]
pub struct LogClient {
    inner: Address<LogWriter>,
}

impl LogClient {
    pub fn new(inner: Address<LogWriter>) -> Self {
        Self { inner }
    }

    /// Appends `record` and returns the log file's new total size.
    #[instrument(skip(self, record), fields(peer = %record.peer, bytes = record.payload.len()))]
    pub async fn append(&self, record: Record) -> Result<u64, WriterError> {
        debug!("Sending append to writer");
        self.inner
            .ask(|respond_to| LogRequest::Append { record, respond_to })
            .await?
    }

    pub async fn flush(&self) -> Result<(), WriterError> {
        self.inner
            .ask(|respond_to| LogRequest::Flush { respond_to })
            .await?
    }

    pub async fn stats(&self) -> Result<SessionStats, WriterError> {
        Ok(self
            .inner
            .ask(|respond_to| LogRequest::Stats { respond_to })
            .await?)
    }

    /// Flushes and stops the writer, returning its final counters.
    pub async fn close(&self) -> Result<SessionStats, WriterError> {
        self.inner
            .ask(|respond_to| LogRequest::Close { respond_to })
            .await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockAddress;
    use crate::framework::FrameworkError;

    #[tokio::test]
    async fn append_returns_the_writer_answer() {
        let mock = MockAddress::<LogWriter>::new(|request| {
            if let LogRequest::Append { record, respond_to } = request {
                let _ = respond_to.send(Ok(record.payload.len() as u64));
            }
        });
        let client = LogClient::new(mock.address());

        let total = client
            .append(Record::new("127.0.0.1:1".parse().unwrap(), b"four".to_vec()))
            .await
            .unwrap();
        assert_eq!(total, 4);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn dropped_response_maps_to_actor_error() {
        // Dropping the request drops its response channel unanswered.
        let mock = MockAddress::<LogWriter>::new(drop);
        let client = LogClient::new(mock.address());

        let result = client.flush().await;
        assert!(matches!(
            result,
            Err(WriterError::Actor(FrameworkError::ActorDropped))
        ));
    }
}
