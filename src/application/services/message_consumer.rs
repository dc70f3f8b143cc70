use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::application::ports::{MessageQueue, QueueError, ReceivedMessage, StorageError};
use crate::domain::{ArtifactKind, JobRequest, SupportedFormats, Transcript};

use super::{ArtifactStore, JobProcessor, ProcessError, ProcessOutcome};

pub const DEFAULT_MAX_MESSAGES: usize = 1;
pub const DEFAULT_PULL_TIMEOUT: Duration = Duration::from_secs(5);
pub const MAX_CONSECUTIVE_QUEUE_FAILURES: u32 = 3;

const IDLE_BACKOFF: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq)]
pub enum HandleOutcome {
    Processed(ProcessOutcome),
    UnsupportedFormat,
}

impl HandleOutcome {
    /// The transcript, when the job ran to completion.
    pub fn transcript(&self) -> Option<&Transcript> {
        match self {
            HandleOutcome::Processed(ProcessOutcome::Completed(transcript)) => Some(transcript),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConsumeOutcome {
    Idle,
    Handled(HandleOutcome),
    Rejected(String),
}

/// Pulls job requests one at a time, acknowledges them on receipt and hands them on.
///
/// Acknowledgement precedes processing, so a crash mid-job is never redelivered by the
/// queue. Recovery relies on the marker state and an external re-trigger.
pub struct MessageConsumer {
    queue: Arc<dyn MessageQueue>,
    processor: Arc<JobProcessor>,
    formats: SupportedFormats,
    max_messages: usize,
    pull_timeout: Duration,
}

impl MessageConsumer {
    pub fn new(
        queue: Arc<dyn MessageQueue>,
        processor: Arc<JobProcessor>,
        formats: SupportedFormats,
    ) -> Self {
        Self {
            queue,
            processor,
            formats,
            max_messages: DEFAULT_MAX_MESSAGES,
            pull_timeout: DEFAULT_PULL_TIMEOUT,
        }
    }

    pub fn with_pull_settings(mut self, max_messages: usize, pull_timeout: Duration) -> Self {
        self.max_messages = max_messages.max(1);
        self.pull_timeout = pull_timeout;
        self
    }

    pub fn formats(&self) -> &SupportedFormats {
        &self.formats
    }

    /// Pulls without blocking; when nothing is available and `wait_timeout` is non-zero,
    /// waits once and pulls one more time.
    pub async fn pull(
        &self,
        max_messages: usize,
        wait_timeout: Duration,
    ) -> Result<Vec<ReceivedMessage>, QueueError> {
        let messages = self.queue.pull(max_messages).await?;
        if !messages.is_empty() || wait_timeout.is_zero() {
            return Ok(messages);
        }

        tracing::debug!(
            wait_secs = wait_timeout.as_secs_f64(),
            "No messages available, waiting"
        );
        tokio::time::sleep(wait_timeout).await;
        self.queue.pull(max_messages).await
    }

    pub fn decode(raw: &[u8]) -> Result<JobRequest, DecodeError> {
        let request: JobRequest = serde_json::from_slice(raw)
            .map_err(|e| DecodeError::InvalidFormat(format!("invalid JSON: {}", e)))?;

        if request.file_name.trim().is_empty() || request.file_path.trim().is_empty() {
            return Err(DecodeError::InvalidFormat(
                "missing file_name or file_path".to_string(),
            ));
        }

        tracing::debug!(
            file_name = %request.file_name,
            file_path = %request.file_path,
            shared_by = %request.shared_by,
            operation = %request.operation,
            "Decoded job request"
        );
        Ok(request)
    }

    /// Applies the extension gate, then runs the processor.
    pub async fn handle_request(&self, request: JobRequest) -> Result<HandleOutcome, ConsumerError> {
        let location = request.path_reference();
        let backend = self
            .processor
            .registry()
            .resolve(&location)
            .map_err(ConsumerError::Config)?;

        if !self.formats.is_supported(&request.file_name) {
            let artifacts = ArtifactStore::new(
                backend,
                location,
                request.base_name(),
                self.processor.retry_policy(),
            );
            artifacts
                .write(ArtifactKind::Err, self.formats.unsupported_message())
                .await
                .map_err(ConsumerError::Artifact)?;
            tracing::warn!(
                file_name = %request.file_name,
                extension = request.extension().unwrap_or(""),
                artifact = %request.artifact_name(ArtifactKind::Err),
                "Unsupported file extension, wrote error artifact"
            );
            return Ok(HandleOutcome::UnsupportedFormat);
        }

        let outcome = self
            .processor
            .process(&request)
            .await
            .map_err(|ProcessError::Config(e)| ConsumerError::Config(e))?;
        Ok(HandleOutcome::Processed(outcome))
    }

    /// Handles at most one message. Only queue failures are returned as errors.
    pub async fn run_once(&self) -> Result<ConsumeOutcome, ConsumerError> {
        let messages = self
            .pull(self.max_messages, self.pull_timeout)
            .await
            .map_err(ConsumerError::Queue)?;

        let Some(message) = messages.into_iter().next() else {
            tracing::info!("No messages found in the subscription");
            return Ok(ConsumeOutcome::Idle);
        };

        self.queue
            .acknowledge(&message.ack_id)
            .await
            .map_err(ConsumerError::Queue)?;
        tracing::debug!(message_id = %message.message_id, "Message acknowledged");

        let request = match Self::decode(&message.data) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(message_id = %message.message_id, error = %e, "Rejected message");
                return Ok(ConsumeOutcome::Rejected(e.to_string()));
            }
        };

        match self.handle_request(request).await {
            Ok(outcome) => Ok(ConsumeOutcome::Handled(outcome)),
            Err(e @ (ConsumerError::Config(_) | ConsumerError::Artifact(_))) => {
                tracing::error!(message_id = %message.message_id, error = %e, "Failed to handle message");
                Ok(ConsumeOutcome::Rejected(e.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    /// Handles messages until `shutdown` is cancelled. Cancellation is observed between jobs.
    pub async fn run(&self, shutdown: CancellationToken) -> Result<(), ConsumerError> {
        tracing::info!("Message consumer started");
        let mut consecutive_failures = 0;

        while !shutdown.is_cancelled() {
            match self.run_once().await {
                Ok(ConsumeOutcome::Idle) => {
                    consecutive_failures = 0;
                    tokio::select! {
                        _ = shutdown.cancelled() => {}
                        _ = tokio::time::sleep(IDLE_BACKOFF) => {}
                    }
                }
                Ok(_) => consecutive_failures = 0,
                Err(ConsumerError::Queue(e)) => {
                    consecutive_failures += 1;
                    tracing::error!(
                        error = %e,
                        consecutive_failures,
                        "Queue operation failed"
                    );
                    if consecutive_failures >= MAX_CONSECUTIVE_QUEUE_FAILURES {
                        return Err(ConsumerError::RepeatedQueueFailures {
                            count: consecutive_failures,
                            last: e,
                        });
                    }
                    tokio::select! {
                        _ = shutdown.cancelled() => {}
                        _ = tokio::time::sleep(self.pull_timeout) => {}
                    }
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!("Message consumer stopped");
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid message format: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConsumerError {
    #[error("queue: {0}")]
    Queue(QueueError),
    #[error("configuration: {0}")]
    Config(StorageError),
    #[error("writing error artifact: {0}")]
    Artifact(StorageError),
    #[error("queue failed {count} times in a row, last error: {last}")]
    RepeatedQueueFailures { count: u32, last: QueueError },
}
