use std::sync::Arc;

use crate::application::ports::{StorageBackend, StorageError};
use crate::domain::{ArtifactKind, GeneratedArtifact, PathReference};

use super::RetryPolicy;

/// Writes and removes the artifacts of one source file. Writes go through the retry policy.
pub struct ArtifactStore {
    backend: Arc<dyn StorageBackend>,
    location: PathReference,
    base_name: String,
    retry_policy: RetryPolicy,
}

impl ArtifactStore {
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        location: PathReference,
        base_name: impl Into<String>,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            backend,
            location,
            base_name: base_name.into(),
            retry_policy,
        }
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub async fn write(&self, kind: ArtifactKind, content: impl Into<String>) -> Result<(), StorageError> {
        self.write_artifact(&GeneratedArtifact::new(kind, self.base_name.as_str(), content))
            .await
    }

    pub async fn write_artifact(&self, artifact: &GeneratedArtifact) -> Result<(), StorageError> {
        let backend = self.backend.as_ref();
        let location = &self.location;
        let name = artifact.file_name();
        let name = name.as_str();
        let content = artifact.content.as_str();

        self.retry_policy
            .execute(
                move || backend.upload_text(location, name, content),
                move || backend.reconnect(),
            )
            .await?;

        tracing::debug!(artifact = %name, folder = %location, "Artifact written");
        Ok(())
    }

    /// Deletes the artifact of `kind`. Failures are logged, never returned.
    pub async fn remove(&self, kind: ArtifactKind) {
        let name = kind.file_name(&self.base_name);
        if let Err(e) = self.backend.delete(&self.location, &name).await {
            tracing::error!(error = %e, artifact = %name, "Failed to remove artifact");
        }
    }

    /// Records a job failure: writes `.err` with `reason` and removes `.tmp`.
    pub async fn record_failure(&self, reason: &str) {
        let artifact = GeneratedArtifact::error(self.base_name.as_str(), reason);
        if let Err(e) = self.write_artifact(&artifact).await {
            tracing::error!(error = %e, "Failed to write error artifact");
        }
        self.remove(ArtifactKind::Tmp).await;
    }
}
