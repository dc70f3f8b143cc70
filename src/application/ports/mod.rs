mod media_inspector;
mod message_queue;
mod storage_backend;
mod transcription_engine;

pub use media_inspector::MediaInspector;
pub use message_queue::{MessageQueue, QueueError, ReceivedMessage};
pub use storage_backend::{StorageBackend, StorageError};
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};
