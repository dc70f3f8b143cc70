use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub ack_id: String,
    pub message_id: String,
    pub data: Vec<u8>,
}

/// Queue primitives consumed by the worker. `pull` never waits for messages.
#[async_trait]
pub trait MessageQueue: Send + Sync {
    async fn pull(&self, max_messages: usize) -> Result<Vec<ReceivedMessage>, QueueError>;

    async fn acknowledge(&self, ack_id: &str) -> Result<(), QueueError>;

    /// Publishes `data` and returns the queue-assigned message id.
    async fn publish(&self, data: &[u8]) -> Result<String, QueueError>;
}

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("queue configuration: {0}")]
    Config(String),
    #[error("queue request failed: {0}")]
    RequestFailed(String),
    #[error("invalid queue response: {0}")]
    InvalidResponse(String),
}
