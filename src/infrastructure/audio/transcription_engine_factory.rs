use std::sync::Arc;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::presentation::config::{EngineProviderSetting, EngineSettings};

use super::azure_whisper_engine::AzureWhisperEngine;
use super::openai_whisper_engine::OpenAiWhisperEngine;

pub struct TranscriptionEngineFactory;

impl TranscriptionEngineFactory {
    pub fn create(
        settings: &EngineSettings,
    ) -> Result<Arc<dyn TranscriptionEngine>, TranscriptionError> {
        let api_key = settings.api_key.clone().ok_or_else(|| {
            TranscriptionError::Configuration("engine.api_key required".to_string())
        })?;

        match settings.provider {
            EngineProviderSetting::OpenAi => {
                let engine = OpenAiWhisperEngine::new(
                    api_key,
                    settings.base_url.clone(),
                    Some(settings.model.clone()),
                    settings.language.clone(),
                );
                Ok(Arc::new(engine))
            }
            EngineProviderSetting::Azure => {
                let base_url = settings.base_url.as_deref().ok_or_else(|| {
                    TranscriptionError::Configuration(
                        "engine.base_url required for Azure".to_string(),
                    )
                })?;
                let deployment = settings.deployment.as_deref().ok_or_else(|| {
                    TranscriptionError::Configuration(
                        "engine.deployment required for Azure".to_string(),
                    )
                })?;
                let engine = AzureWhisperEngine::new(
                    base_url,
                    deployment,
                    &api_key,
                    &settings.api_version,
                    settings.language.clone(),
                );
                Ok(Arc::new(engine))
            }
        }
    }
}
