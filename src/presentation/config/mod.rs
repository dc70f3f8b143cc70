mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    AzureSettings, DriveSettings, EngineProviderSetting, EngineSettings, FormatSettings,
    LoggingSettings, QueueProviderSetting, QueueSettings, QueueTarget, RetrySettings, Settings,
    SettingsError, StorageSettings, WorkerSettings,
};
