use std::path::PathBuf;
use std::time::Duration;

use config::{Config, File};
use serde::Deserialize;

use crate::application::services::RetryPolicy;
use crate::domain::SupportedFormats;

use super::Environment;

const ENV_PREFIX: &str = "SONUS";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub worker: WorkerSettings,
    pub formats: FormatSettings,
    pub retry: RetrySettings,
    pub queue: QueueSettings,
    pub storage: StorageSettings,
    pub engine: EngineSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkerSettings {
    pub work_dir: String,
    pub pull_timeout_secs: u64,
    pub max_messages: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormatSettings {
    pub audio: Vec<String>,
    pub video: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub delay_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueProviderSetting {
    #[serde(rename = "pubsub")]
    PubSub,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueueSettings {
    pub provider: QueueProviderSetting,
    pub endpoint: String,
    pub project_id: String,
    pub topic: String,
    pub subscription: String,
    pub access_token: Option<String>,
    /// Legacy `topic|subscription` form. Overrides `topic` and `subscription` when set.
    pub pair: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueTarget {
    pub topic: String,
    pub subscription: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub drive: DriveSettings,
    #[serde(default)]
    pub azure: AzureSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DriveSettings {
    pub api_base: String,
    pub upload_base: String,
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AzureSettings {
    pub account: Option<String>,
    pub access_key: Option<String>,
    pub container: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineProviderSetting {
    #[serde(rename = "openai")]
    OpenAi,
    Azure,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    pub provider: EngineProviderSetting,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub deployment: Option<String>,
    pub api_version: String,
    pub language: Option<String>,
    pub ffprobe_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Settings {
    /// Defaults, then `sonus.<environment>.toml` if present, then `SONUS__*` variables.
    pub fn load(environment: Environment) -> Result<Self, SettingsError> {
        let file_name = format!("sonus.{}", environment.as_str().to_lowercase());
        let builder = Self::defaults()?.add_source(File::with_name(&file_name).required(false));
        Self::build(builder)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, SettingsError> {
        let builder =
            Self::defaults()?.add_source(File::from_str(contents, config::FileFormat::Toml));
        Self::build(builder)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, SettingsError> {
        let settings: Settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("formats.audio")
                    .with_list_parse_key("formats.video")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        settings.queue.target()?;
        Ok(settings)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, SettingsError> {
        Ok(Config::builder()
            .set_default("worker.work_dir", "/tmp/sonus/work")?
            .set_default("worker.pull_timeout_secs", 5)?
            .set_default("worker.max_messages", 1)?
            .set_default("formats.audio", vec!["mp3", "wav", "m4a", "flac"])?
            .set_default("formats.video", vec!["mp4", "mov", "avi", "mkv"])?
            .set_default("retry.max_attempts", 3)?
            .set_default("retry.delay_secs", 5)?
            .set_default("queue.provider", "pubsub")?
            .set_default("queue.endpoint", "https://pubsub.googleapis.com")?
            .set_default("queue.project_id", "")?
            .set_default("queue.topic", "sonus-pubsub-topic-test")?
            .set_default("queue.subscription", "sonus-transcriber-sub-test")?
            .set_default(
                "storage.drive.api_base",
                "https://www.googleapis.com/drive/v3",
            )?
            .set_default(
                "storage.drive.upload_base",
                "https://www.googleapis.com/upload/drive/v3",
            )?
            .set_default("engine.provider", "openai")?
            .set_default("engine.model", "whisper-1")?
            .set_default("engine.api_version", "2024-06-01")?
            .set_default("engine.ffprobe_path", "ffprobe")?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?)
    }
}

impl WorkerSettings {
    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir)
    }

    pub fn pull_timeout(&self) -> Duration {
        Duration::from_secs(self.pull_timeout_secs)
    }
}

impl FormatSettings {
    pub fn supported_formats(&self) -> SupportedFormats {
        SupportedFormats::new(&self.audio, &self.video)
    }
}

impl RetrySettings {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_secs(self.delay_secs))
    }
}

impl QueueSettings {
    pub fn target(&self) -> Result<QueueTarget, SettingsError> {
        match &self.pair {
            Some(pair) => QueueTarget::parse(pair),
            None => Ok(QueueTarget {
                topic: self.topic.clone(),
                subscription: self.subscription.clone(),
            }),
        }
    }
}

impl QueueTarget {
    /// Parses `topic|subscription`. Both parts must be non-empty.
    pub fn parse(raw: &str) -> Result<Self, SettingsError> {
        let (topic, subscription) = raw.split_once('|').ok_or_else(|| {
            SettingsError::Invalid(
                "invalid queue pair format, expected 'topic|subscription'".to_string(),
            )
        })?;

        if topic.is_empty() || subscription.is_empty() || subscription.contains('|') {
            return Err(SettingsError::Invalid(
                "empty topic or subscription in queue pair".to_string(),
            ));
        }

        Ok(Self {
            topic: topic.to_string(),
            subscription: subscription.to_string(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("loading settings: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid settings: {0}")]
    Invalid(String),
}
