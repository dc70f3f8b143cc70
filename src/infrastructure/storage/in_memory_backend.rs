use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::application::ports::{StorageBackend, StorageError};
use crate::domain::{FileRef, PathReference};

pub const MEMORY_SCHEME: &str = "memory";

type FileKey = (String, String);

/// Process-local backend keeping files in a map. Clones share the same files and counters.
#[derive(Clone, Default)]
pub struct InMemoryStorageBackend {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    files: Mutex<BTreeMap<FileKey, Vec<u8>>>,
    upload_calls: AtomicUsize,
    download_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    reconnects: AtomicUsize,
    failing_uploads: AtomicUsize,
    fail_downloads: AtomicBool,
    fail_probes: AtomicBool,
}

impl InMemoryStorageBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(folder: &PathReference, name: &str) -> FileKey {
        (folder.to_string(), name.to_string())
    }

    pub async fn put_file(&self, folder: &PathReference, name: &str, data: impl Into<Vec<u8>>) {
        self.inner
            .files
            .lock()
            .await
            .insert(Self::key(folder, name), data.into());
    }

    pub async fn read_text(&self, folder: &PathReference, name: &str) -> Option<String> {
        self.inner
            .files
            .lock()
            .await
            .get(&Self::key(folder, name))
            .map(|data| String::from_utf8_lossy(data).into_owned())
    }

    /// Sorted names of all files in `folder`.
    pub async fn names(&self, folder: &PathReference) -> Vec<String> {
        let folder = folder.to_string();
        self.inner
            .files
            .lock()
            .await
            .keys()
            .filter(|(f, _)| *f == folder)
            .map(|(_, name)| name.clone())
            .collect()
    }

    /// The next `count` uploads fail with a transient error.
    pub fn fail_next_uploads(&self, count: usize) {
        self.inner.failing_uploads.store(count, Ordering::SeqCst);
    }

    pub fn fail_downloads(&self, fail: bool) {
        self.inner.fail_downloads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_probes(&self, fail: bool) {
        self.inner.fail_probes.store(fail, Ordering::SeqCst);
    }

    pub fn upload_calls(&self) -> usize {
        self.inner.upload_calls.load(Ordering::SeqCst)
    }

    pub fn download_calls(&self) -> usize {
        self.inner.download_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.inner.delete_calls.load(Ordering::SeqCst)
    }

    pub fn reconnects(&self) -> usize {
        self.inner.reconnects.load(Ordering::SeqCst)
    }

    /// Write-type calls seen so far: uploads plus deletes.
    pub fn write_calls(&self) -> usize {
        self.upload_calls() + self.delete_calls()
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorageBackend {
    async fn exists(&self, file: &FileRef) -> Result<bool, StorageError> {
        if self.inner.fail_probes.load(Ordering::SeqCst) {
            return Err(StorageError::TransientIo("listing unavailable".to_string()));
        }
        Ok(self
            .inner
            .files
            .lock()
            .await
            .contains_key(&Self::key(&file.location, &file.name)))
    }

    async fn download(&self, file: &FileRef, local_dest: &Path) -> Result<PathBuf, StorageError> {
        self.inner.download_calls.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_downloads.load(Ordering::SeqCst) {
            return Err(StorageError::TransientIo("connection reset".to_string()));
        }

        let data = self
            .inner
            .files
            .lock()
            .await
            .get(&Self::key(&file.location, &file.name))
            .cloned()
            .ok_or_else(|| StorageError::NotFound(file.name.clone()))?;

        if let Some(parent) = local_dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(local_dest, data).await?;
        Ok(local_dest.to_path_buf())
    }

    async fn upload_text(
        &self,
        folder: &PathReference,
        name: &str,
        content: &str,
    ) -> Result<(), StorageError> {
        self.inner.upload_calls.fetch_add(1, Ordering::SeqCst);
        let failing = self.inner.failing_uploads.load(Ordering::SeqCst);
        if failing > 0 {
            self.inner
                .failing_uploads
                .store(failing - 1, Ordering::SeqCst);
            return Err(StorageError::TransientIo("upload interrupted".to_string()));
        }

        self.put_file(folder, name, content.as_bytes()).await;
        Ok(())
    }

    async fn delete(&self, folder: &PathReference, name: &str) -> Result<(), StorageError> {
        self.inner.delete_calls.fetch_add(1, Ordering::SeqCst);
        let removed = self
            .inner
            .files
            .lock()
            .await
            .remove(&Self::key(folder, name));
        if removed.is_none() {
            tracing::warn!(folder = %folder, name, "File not found, nothing to delete");
        }
        Ok(())
    }

    async fn reconnect(&self) -> Result<(), StorageError> {
        self.inner.reconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
