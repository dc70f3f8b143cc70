use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::{ArtifactKind, FileRef, MarkerProbe, PathReference};

/// Capability surface of a storage provider addressed by a URI scheme.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn exists(&self, file: &FileRef) -> Result<bool, StorageError>;

    /// Copies `file` to `local_dest` and returns the path the caller should read.
    async fn download(&self, file: &FileRef, local_dest: &Path) -> Result<PathBuf, StorageError>;

    async fn upload_text(
        &self,
        folder: &PathReference,
        name: &str,
        content: &str,
    ) -> Result<(), StorageError>;

    /// Removes `name` from `folder`. A missing file is logged and reported as success.
    async fn delete(&self, folder: &PathReference, name: &str) -> Result<(), StorageError>;

    /// Probes the source and its sentinel siblings. Providers that can list a folder in one
    /// call should override this.
    async fn probe_markers(&self, source: &FileRef) -> Result<MarkerProbe, StorageError> {
        Ok(MarkerProbe {
            source: self.exists(source).await?,
            tmp: self.exists(&source.artifact(ArtifactKind::Tmp)).await?,
            txt: self.exists(&source.artifact(ArtifactKind::Txt)).await?,
            err: self.exists(&source.artifact(ArtifactKind::Err)).await?,
        })
    }

    /// Tears down and recreates the provider connection.
    async fn reconnect(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("no storage backend registered for scheme '{0}'")]
    UnknownScheme(String),
    #[error("storage configuration: {0}")]
    Config(String),
    #[error("invalid object name: {0}")]
    InvalidName(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("transient io: {0}")]
    TransientIo(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl StorageError {
    pub fn is_config(&self) -> bool {
        matches!(self, StorageError::UnknownScheme(_) | StorageError::Config(_))
    }
}
