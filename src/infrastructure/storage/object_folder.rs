use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};
use tokio::io::AsyncWriteExt;

use crate::application::ports::StorageError;

/// One folder inside an object store. Shared by the object_store based backends.
pub(super) struct ObjectFolder {
    store: Arc<dyn ObjectStore>,
    prefix: String,
}

impl ObjectFolder {
    pub fn new(store: Arc<dyn ObjectStore>, prefix: &str) -> Self {
        Self {
            store,
            prefix: prefix.trim_matches('/').to_string(),
        }
    }

    /// Keeps `name` verbatim. `Path::child` percent-encodes non-ASCII and reserved characters.
    fn object_path(&self, name: &str) -> Result<StorePath, StorageError> {
        let raw = if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.prefix, name)
        };
        StorePath::parse(&raw).map_err(|e| StorageError::InvalidName(format!("{raw}: {e}")))
    }

    pub async fn exists(&self, name: &str) -> Result<bool, StorageError> {
        match self.store.head(&self.object_path(name)?).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::TransientIo(e.to_string())),
        }
    }

    /// Streams the object into `dest`, creating parent directories as needed.
    pub async fn download_to(&self, name: &str, dest: &Path) -> Result<u64, StorageError> {
        let result = self
            .store
            .get(&self.object_path(name)?)
            .await
            .map_err(|e| match e {
                object_store::Error::NotFound { .. } => StorageError::NotFound(name.to_string()),
                other => StorageError::TransientIo(other.to_string()),
            })?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = result.into_stream();
        let mut total_bytes: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let bytes = chunk.map_err(|e| StorageError::TransientIo(e.to_string()))?;
            total_bytes += bytes.len() as u64;
            file.write_all(&bytes).await?;
        }
        file.flush().await?;

        Ok(total_bytes)
    }

    pub async fn put_text(&self, name: &str, content: &str) -> Result<(), StorageError> {
        let payload = PutPayload::from(Bytes::from(content.to_owned()));
        self.store
            .put(&self.object_path(name)?, payload)
            .await
            .map_err(|e| StorageError::TransientIo(e.to_string()))?;
        Ok(())
    }

    /// Returns `false` when there was nothing to delete.
    pub async fn delete(&self, name: &str) -> Result<bool, StorageError> {
        match self.store.delete(&self.object_path(name)?).await {
            Ok(()) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::TransientIo(e.to_string())),
        }
    }
}
