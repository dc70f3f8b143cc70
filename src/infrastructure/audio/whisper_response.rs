use std::path::Path;

use reqwest::multipart;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::application::ports::TranscriptionError;
use crate::domain::{MediaMetadata, Transcript};

/// `verbose_json` body returned by Whisper-compatible transcription endpoints.
#[derive(Debug, Deserialize)]
pub(super) struct VerboseTranscription {
    text: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    segments: Vec<Value>,
}

impl VerboseTranscription {
    pub fn into_transcript(self, metadata: &MediaMetadata) -> Transcript {
        let duration = metadata
            .duration_secs
            .or_else(|| self.duration.map(|d| d.round() as u64));
        let json = json!({
            "segments": self.segments,
            "diarization": [],
            "language": self.language,
            "duration": duration,
            "file_size_mib": metadata.file_size_mib,
        });
        Transcript::new(self.text.trim(), json)
    }
}

pub(super) async fn audio_part(
    audio_path: &Path,
    original_file_name: &str,
) -> Result<multipart::Part, TranscriptionError> {
    let data = tokio::fs::read(audio_path)
        .await
        .map_err(|e| TranscriptionError::ReadFailed(format!("{}: {}", audio_path.display(), e)))?;

    multipart::Part::bytes(data)
        .file_name(original_file_name.to_string())
        .mime_str("application/octet-stream")
        .map_err(|e| TranscriptionError::ApiRequestFailed(format!("mime: {}", e)))
}

pub(super) async fn parse_response(
    response: reqwest::Response,
) -> Result<VerboseTranscription, TranscriptionError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        return Err(TranscriptionError::ApiRequestFailed(format!(
            "status {}: {}",
            status, body
        )));
    }

    response
        .json()
        .await
        .map_err(|e| TranscriptionError::InvalidResponse(format!("parse response: {}", e)))
}
