use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use object_store::local::LocalFileSystem;

use crate::application::ports::{StorageBackend, StorageError};
use crate::domain::{FileRef, PathReference};

use super::object_folder::ObjectFolder;

pub const LOCAL_SCHEME: &str = "file";

/// `file://<directory>` backend over the local filesystem.
#[derive(Debug, Default)]
pub struct LocalStorageBackend;

impl LocalStorageBackend {
    pub fn new() -> Self {
        Self
    }

    fn directory(location: &PathReference) -> PathBuf {
        PathBuf::from(location.locator())
    }

    /// Opens the folder, or `None` when the directory does not exist.
    async fn open_existing(location: &PathReference) -> Result<Option<ObjectFolder>, StorageError> {
        let directory = Self::directory(location);
        if !tokio::fs::try_exists(&directory).await? {
            return Ok(None);
        }
        Self::open(&directory).map(Some)
    }

    async fn open_or_create(location: &PathReference) -> Result<ObjectFolder, StorageError> {
        let directory = Self::directory(location);
        tokio::fs::create_dir_all(&directory).await?;
        Self::open(&directory)
    }

    fn open(directory: &Path) -> Result<ObjectFolder, StorageError> {
        let fs = LocalFileSystem::new_with_prefix(directory)
            .map_err(|e| StorageError::Config(e.to_string()))?;
        Ok(ObjectFolder::new(Arc::new(fs), ""))
    }
}

#[async_trait]
impl StorageBackend for LocalStorageBackend {
    async fn exists(&self, file: &FileRef) -> Result<bool, StorageError> {
        match Self::open_existing(&file.location).await? {
            Some(folder) => folder.exists(&file.name).await,
            None => Ok(false),
        }
    }

    async fn download(&self, file: &FileRef, local_dest: &Path) -> Result<PathBuf, StorageError> {
        let source_path = Self::directory(&file.location).join(&file.name);
        if same_file(&source_path, local_dest).await {
            return Ok(local_dest.to_path_buf());
        }

        let folder = Self::open_existing(&file.location)
            .await?
            .ok_or_else(|| StorageError::NotFound(source_path.display().to_string()))?;
        let bytes = folder.download_to(&file.name, local_dest).await?;
        tracing::debug!(
            from = %source_path.display(),
            to = %local_dest.display(),
            bytes,
            "Copied local file"
        );
        Ok(local_dest.to_path_buf())
    }

    async fn upload_text(
        &self,
        folder: &PathReference,
        name: &str,
        content: &str,
    ) -> Result<(), StorageError> {
        Self::open_or_create(folder)
            .await?
            .put_text(name, content)
            .await?;
        tracing::debug!(folder = %folder, name, "Saved text file");
        Ok(())
    }

    async fn delete(&self, folder: &PathReference, name: &str) -> Result<(), StorageError> {
        let deleted = match Self::open_existing(folder).await? {
            Some(store) => store.delete(name).await?,
            None => false,
        };
        if deleted {
            tracing::debug!(folder = %folder, name, "Deleted file");
        } else {
            tracing::warn!(folder = %folder, name, "File not found, nothing to delete");
        }
        Ok(())
    }
}

async fn same_file(a: &Path, b: &Path) -> bool {
    match (
        tokio::fs::canonicalize(a).await,
        tokio::fs::canonicalize(b).await,
    ) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
