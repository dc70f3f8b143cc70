use std::sync::Arc;

use crate::application::ports::{MessageQueue, QueueError};
use crate::presentation::config::{QueueProviderSetting, QueueSettings};

use super::in_memory_queue::InMemoryQueue;
use super::pubsub_queue::PubSubQueue;

pub struct MessageQueueFactory;

impl MessageQueueFactory {
    pub fn create(settings: &QueueSettings) -> Result<Arc<dyn MessageQueue>, QueueError> {
        match settings.provider {
            QueueProviderSetting::PubSub => {
                let target = settings
                    .target()
                    .map_err(|e| QueueError::Config(e.to_string()))?;
                let queue = PubSubQueue::new(
                    &settings.endpoint,
                    &settings.project_id,
                    &target.topic,
                    &target.subscription,
                    settings.access_token.clone(),
                )?;
                tracing::debug!(
                    subscription = %queue.subscription_path(),
                    "Initialized Pub/Sub queue"
                );
                Ok(Arc::new(queue))
            }
            QueueProviderSetting::Memory => Ok(Arc::new(InMemoryQueue::new())),
        }
    }
}
