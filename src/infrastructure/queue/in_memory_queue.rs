use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::application::ports::{MessageQueue, QueueError, ReceivedMessage};

/// Queue held in process memory. Pulled messages stay outstanding until acknowledged.
#[derive(Default)]
pub struct InMemoryQueue {
    pending: Mutex<VecDeque<(String, Vec<u8>)>>,
    outstanding: Mutex<HashMap<String, (String, Vec<u8>)>>,
    acknowledged: Mutex<Vec<String>>,
    pull_calls: AtomicUsize,
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pull_calls(&self) -> usize {
        self.pull_calls.load(Ordering::SeqCst)
    }

    pub async fn pending_len(&self) -> usize {
        self.pending.lock().await.len()
    }

    pub async fn outstanding_len(&self) -> usize {
        self.outstanding.lock().await.len()
    }

    /// Message ids acknowledged so far, in order.
    pub async fn acknowledged(&self) -> Vec<String> {
        self.acknowledged.lock().await.clone()
    }
}

#[async_trait]
impl MessageQueue for InMemoryQueue {
    async fn pull(&self, max_messages: usize) -> Result<Vec<ReceivedMessage>, QueueError> {
        self.pull_calls.fetch_add(1, Ordering::SeqCst);
        let mut pending = self.pending.lock().await;
        let mut outstanding = self.outstanding.lock().await;

        let take = max_messages.min(pending.len());
        let messages = pending
            .drain(..take)
            .map(|(message_id, data)| {
                let ack_id = Uuid::new_v4().to_string();
                outstanding.insert(ack_id.clone(), (message_id.clone(), data.clone()));
                ReceivedMessage {
                    ack_id,
                    message_id,
                    data,
                }
            })
            .collect();
        Ok(messages)
    }

    async fn acknowledge(&self, ack_id: &str) -> Result<(), QueueError> {
        let (message_id, _) = self
            .outstanding
            .lock()
            .await
            .remove(ack_id)
            .ok_or_else(|| QueueError::RequestFailed(format!("unknown ack id: {}", ack_id)))?;
        self.acknowledged.lock().await.push(message_id);
        Ok(())
    }

    async fn publish(&self, data: &[u8]) -> Result<String, QueueError> {
        let message_id = Uuid::new_v4().to_string();
        self.pending
            .lock()
            .await
            .push_back((message_id.clone(), data.to_vec()));
        Ok(message_id)
    }
}
