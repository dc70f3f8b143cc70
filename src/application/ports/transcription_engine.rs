use std::path::Path;

use async_trait::async_trait;

use crate::domain::{MediaMetadata, Transcript};

#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    async fn transcribe(
        &self,
        audio_path: &Path,
        original_file_name: &str,
        metadata: &MediaMetadata,
    ) -> Result<Transcript, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("reading audio failed: {0}")]
    ReadFailed(String),
    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("invalid engine response: {0}")]
    InvalidResponse(String),
    #[error("engine configuration: {0}")]
    Configuration(String),
}
