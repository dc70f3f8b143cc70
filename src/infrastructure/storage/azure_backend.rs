use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use object_store::ObjectStore;
use object_store::azure::MicrosoftAzureBuilder;
use tokio::sync::RwLock;

use crate::application::ports::{StorageBackend, StorageError};
use crate::domain::{FileRef, PathReference};

use super::object_folder::ObjectFolder;

pub const AZURE_SCHEME: &str = "azure";

type Connector = Box<dyn Fn() -> Result<Arc<dyn ObjectStore>, StorageError> + Send + Sync>;

/// `azure://<folder prefix>` backend bound to one blob container.
pub struct AzureStorageBackend {
    container: String,
    connector: Connector,
    inner: RwLock<Arc<dyn ObjectStore>>,
}

impl AzureStorageBackend {
    pub fn new(account: &str, access_key: &str, container: &str) -> Result<Self, StorageError> {
        let (account, access_key, container_name) = (
            account.to_string(),
            access_key.to_string(),
            container.to_string(),
        );
        Self::with_connector(container, move || {
            Self::connect(&account, &access_key, &container_name)
        })
    }

    /// Uses `connector` to build the client now and again on every `reconnect`.
    pub fn with_connector<F>(container: &str, connector: F) -> Result<Self, StorageError>
    where
        F: Fn() -> Result<Arc<dyn ObjectStore>, StorageError> + Send + Sync + 'static,
    {
        let store = connector()?;
        Ok(Self {
            container: container.to_string(),
            connector: Box::new(connector),
            inner: RwLock::new(store),
        })
    }

    fn connect(
        account: &str,
        access_key: &str,
        container: &str,
    ) -> Result<Arc<dyn ObjectStore>, StorageError> {
        let store = MicrosoftAzureBuilder::new()
            .with_account(account)
            .with_access_key(access_key)
            .with_container_name(container)
            .build()
            .map_err(|e| StorageError::Config(e.to_string()))?;
        Ok(Arc::new(store))
    }

    async fn folder(&self, location: &PathReference) -> ObjectFolder {
        let store = Arc::clone(&*self.inner.read().await);
        ObjectFolder::new(store, location.locator().trim_matches('/'))
    }
}

#[async_trait]
impl StorageBackend for AzureStorageBackend {
    async fn exists(&self, file: &FileRef) -> Result<bool, StorageError> {
        self.folder(&file.location).await.exists(&file.name).await
    }

    async fn download(&self, file: &FileRef, local_dest: &Path) -> Result<PathBuf, StorageError> {
        let bytes = self
            .folder(&file.location)
            .await
            .download_to(&file.name, local_dest)
            .await?;
        tracing::debug!(
            container = %self.container,
            name = %file.name,
            bytes,
            "Downloaded blob"
        );
        Ok(local_dest.to_path_buf())
    }

    async fn upload_text(
        &self,
        folder: &PathReference,
        name: &str,
        content: &str,
    ) -> Result<(), StorageError> {
        self.folder(folder).await.put_text(name, content).await?;
        tracing::debug!(container = %self.container, folder = %folder, name, "Uploaded blob");
        Ok(())
    }

    async fn delete(&self, folder: &PathReference, name: &str) -> Result<(), StorageError> {
        if !self.folder(folder).await.delete(name).await? {
            tracing::warn!(container = %self.container, folder = %folder, name, "Blob not found, nothing to delete");
        }
        Ok(())
    }

    async fn reconnect(&self) -> Result<(), StorageError> {
        let store = (self.connector)()?;
        *self.inner.write().await = store;
        tracing::debug!(container = %self.container, "Recreated Azure blob client");
        Ok(())
    }
}
