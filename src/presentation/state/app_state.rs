use std::sync::Arc;

use crate::application::ports::{MessageQueue, QueueError, TranscriptionError};
use crate::application::services::{JobProcessor, MessageConsumer};
use crate::infrastructure::audio::{FfprobeInspector, TranscriptionEngineFactory};
use crate::infrastructure::queue::MessageQueueFactory;
use crate::infrastructure::storage::StorageBackendFactory;
use crate::presentation::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub processor: Arc<JobProcessor>,
}

impl AppState {
    pub fn new(settings: Settings, processor: Arc<JobProcessor>) -> Self {
        Self {
            settings,
            processor,
        }
    }

    /// Wires the storage registry, transcription engine and media inspector from settings.
    pub fn from_settings(settings: Settings) -> Result<Self, StartupError> {
        let registry = StorageBackendFactory::registry(&settings.storage);
        let engine = TranscriptionEngineFactory::create(&settings.engine)?;
        let inspector = FfprobeInspector::new(settings.engine.ffprobe_path.clone());

        tracing::info!(
            schemes = ?registry.schemes(),
            engine = ?settings.engine.provider,
            work_dir = %settings.worker.work_dir,
            "Job processor configured"
        );

        let processor = JobProcessor::new(
            Arc::new(registry),
            engine,
            Arc::new(inspector),
            settings.retry.policy(),
            settings.worker.work_dir(),
        );
        Ok(Self::new(settings, Arc::new(processor)))
    }

    pub fn queue(&self) -> Result<Arc<dyn MessageQueue>, StartupError> {
        Ok(MessageQueueFactory::create(&self.settings.queue)?)
    }

    pub fn consumer(&self, queue: Arc<dyn MessageQueue>) -> MessageConsumer {
        MessageConsumer::new(
            queue,
            Arc::clone(&self.processor),
            self.settings.formats.supported_formats(),
        )
        .with_pull_settings(
            self.settings.worker.max_messages,
            self.settings.worker.pull_timeout(),
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("transcription engine: {0}")]
    Engine(#[from] TranscriptionError),
    #[error("message queue: {0}")]
    Queue(#[from] QueueError),
}
