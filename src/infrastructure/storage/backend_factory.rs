use std::sync::Arc;

use crate::application::ports::{StorageBackend, StorageError};
use crate::application::services::BackendRegistry;
use crate::presentation::config::StorageSettings;

use super::azure_backend::{AZURE_SCHEME, AzureStorageBackend};
use super::drive_backend::{DRIVE_SCHEME, DriveStorageBackend};
use super::local_backend::{LOCAL_SCHEME, LocalStorageBackend};

pub struct StorageBackendFactory;

impl StorageBackendFactory {
    /// Registry with the `file`, `drive` and `azure` backends. Missing provider settings
    /// surface as a configuration error when a request for that scheme is resolved.
    pub fn registry(settings: &StorageSettings) -> BackendRegistry {
        let drive = settings.drive.clone();
        let azure = settings.azure.clone();

        BackendRegistry::new()
            .with_backend(LOCAL_SCHEME, || {
                Ok(Arc::new(LocalStorageBackend::new()) as Arc<dyn StorageBackend>)
            })
            .with_backend(DRIVE_SCHEME, move || {
                let token = drive.access_token.as_deref().ok_or_else(|| {
                    StorageError::Config("storage.drive.access_token required".into())
                })?;
                let backend = DriveStorageBackend::new(&drive.api_base, &drive.upload_base, token);
                Ok(Arc::new(backend) as Arc<dyn StorageBackend>)
            })
            .with_backend(AZURE_SCHEME, move || {
                let account = azure.account.as_deref().ok_or_else(|| {
                    StorageError::Config("storage.azure.account required".into())
                })?;
                let key = azure.access_key.as_deref().ok_or_else(|| {
                    StorageError::Config("storage.azure.access_key required".into())
                })?;
                let container = azure.container.as_deref().ok_or_else(|| {
                    StorageError::Config("storage.azure.container required".into())
                })?;
                let backend = AzureStorageBackend::new(account, key, container)?;
                Ok(Arc::new(backend) as Arc<dyn StorageBackend>)
            })
    }
}
