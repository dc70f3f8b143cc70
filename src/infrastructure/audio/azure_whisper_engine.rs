use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::domain::{MediaMetadata, Transcript};

use super::whisper_response::{audio_part, parse_response};

pub struct AzureWhisperEngine {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    language: Option<String>,
}

impl AzureWhisperEngine {
    pub fn new(
        base_url: &str,
        deployment: &str,
        api_key: &str,
        api_version: &str,
        language: Option<String>,
    ) -> Self {
        let endpoint = format!(
            "{}/openai/deployments/{}/audio/transcriptions?api-version={}",
            base_url.trim_end_matches('/'),
            deployment,
            api_version,
        );
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key: api_key.to_string(),
            language,
        }
    }
}

#[async_trait]
impl TranscriptionEngine for AzureWhisperEngine {
    async fn transcribe(
        &self,
        audio_path: &Path,
        original_file_name: &str,
        metadata: &MediaMetadata,
    ) -> Result<Transcript, TranscriptionError> {
        let mut form = multipart::Form::new()
            .text("response_format", "verbose_json")
            .part("file", audio_part(audio_path, original_file_name).await?);
        if let Some(language) = &self.language {
            form = form.text("language", language.clone());
        }

        tracing::debug!(endpoint = %self.endpoint, "Sending audio to Azure OpenAI Whisper");

        let response = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("request: {}", e)))?;

        let transcript = parse_response(response).await?.into_transcript(metadata);

        tracing::info!(
            chars = transcript.text.len(),
            "Azure OpenAI Whisper transcription completed"
        );

        Ok(transcript)
    }
}
