use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use tracing::Instrument;
use uuid::Uuid;

use crate::application::ports::{
    MediaInspector, StorageBackend, StorageError, TranscriptionEngine, TranscriptionError,
};
use crate::domain::{ArtifactKind, FileRef, GeneratedArtifact, JobRequest, JobState, Transcript};

use super::{ArtifactStore, BackendRegistry, MarkerStateMachine, RetryPolicy};

#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
    Completed(Transcript),
    Skipped(JobState),
    Failed(String),
}

/// Drives one job through marker check, claim, download, transcription and result upload.
pub struct JobProcessor {
    registry: Arc<BackendRegistry>,
    engine: Arc<dyn TranscriptionEngine>,
    inspector: Arc<dyn MediaInspector>,
    retry_policy: RetryPolicy,
    work_dir: PathBuf,
}

impl JobProcessor {
    pub fn new(
        registry: Arc<BackendRegistry>,
        engine: Arc<dyn TranscriptionEngine>,
        inspector: Arc<dyn MediaInspector>,
        retry_policy: RetryPolicy,
        work_dir: PathBuf,
    ) -> Self {
        Self {
            registry,
            engine,
            inspector,
            retry_policy,
            work_dir,
        }
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }

    /// Per-job failures become an `.err` artifact and `ProcessOutcome::Failed`.
    /// Only an unresolvable storage scheme is returned as an error.
    pub async fn process(&self, request: &JobRequest) -> Result<ProcessOutcome, ProcessError> {
        let source = request.source();
        let backend = self
            .registry
            .resolve(&source.location)
            .map_err(ProcessError::Config)?;

        let span = tracing::info_span!(
            "transcription_job",
            job_id = %Uuid::new_v4(),
            file_name = %request.file_name,
            scheme = %source.location.scheme(),
        );

        self.process_with(request, &source, backend)
            .instrument(span)
            .await
    }

    async fn process_with(
        &self,
        request: &JobRequest,
        source: &FileRef,
        backend: Arc<dyn StorageBackend>,
    ) -> Result<ProcessOutcome, ProcessError> {
        let artifacts = ArtifactStore::new(
            Arc::clone(&backend),
            source.location.clone(),
            source.base_name(),
            self.retry_policy,
        );

        let state = match MarkerStateMachine::evaluate(backend.as_ref(), source).await {
            Ok(state) => state,
            Err(e) => {
                let reason = JobFailure::StatusCheck(e).to_string();
                tracing::error!(reason = %reason, "Job failed before claim");
                artifacts.record_failure(&reason).await;
                return Ok(ProcessOutcome::Failed(reason));
            }
        };

        match state {
            JobState::Ready => {}
            JobState::Missing => {
                let message = format!("File not found: {}", request.file_name);
                tracing::error!("{}", message);
                let artifact = GeneratedArtifact::error(artifacts.base_name(), message);
                if let Err(e) = artifacts.write_artifact(&artifact).await {
                    tracing::error!(error = %e, "Failed to write error artifact");
                }
                return Ok(ProcessOutcome::Skipped(JobState::Missing));
            }
            other => {
                tracing::debug!(state = %other, "Job not ready, skipping");
                return Ok(ProcessOutcome::Skipped(other));
            }
        }

        let marker = GeneratedArtifact::in_progress(artifacts.base_name(), Local::now());
        if let Err(e) = artifacts.write_artifact(&marker).await {
            let reason = JobFailure::Persist(e).to_string();
            tracing::error!(reason = %reason, "Failed to claim job");
            artifacts.record_failure(&reason).await;
            return Ok(ProcessOutcome::Failed(reason));
        }
        tracing::debug!("Job claimed");

        match self.run_claimed(request, source, backend.as_ref(), &artifacts).await {
            Ok(transcript) => {
                artifacts.remove(ArtifactKind::Tmp).await;
                tracing::info!(chars = transcript.text.len(), "Transcription job completed");
                Ok(ProcessOutcome::Completed(transcript))
            }
            Err(failure) => {
                let reason = failure.to_string();
                tracing::error!(reason = %reason, "Transcription job failed");
                artifacts.record_failure(&reason).await;
                Ok(ProcessOutcome::Failed(reason))
            }
        }
    }

    async fn run_claimed(
        &self,
        request: &JobRequest,
        source: &FileRef,
        backend: &dyn StorageBackend,
        artifacts: &ArtifactStore,
    ) -> Result<Transcript, JobFailure> {
        let local_dest = self.local_destination(&request.file_name)?;
        tokio::fs::create_dir_all(&self.work_dir)
            .await
            .map_err(|e| JobFailure::Download(StorageError::Io(e)))?;

        let local_path = backend
            .download(source, &local_dest)
            .await
            .map_err(JobFailure::Download)?;
        tracing::debug!(path = %local_path.display(), "Source downloaded");

        let metadata = self.inspector.inspect(&local_path).await;
        tracing::debug!(
            duration_secs = ?metadata.duration_secs,
            file_size_mib = ?metadata.file_size_mib,
            "Starting transcription"
        );

        let transcript = self
            .engine
            .transcribe(&local_path, &request.file_name, &metadata)
            .await
            .map_err(JobFailure::Engine)?;

        artifacts
            .write(ArtifactKind::Txt, transcript.text.as_str())
            .await
            .map_err(JobFailure::Persist)?;

        let json = serde_json::to_string_pretty(&transcript.json).map_err(JobFailure::Serialize)?;
        artifacts
            .write(ArtifactKind::Json, json)
            .await
            .map_err(JobFailure::Persist)?;

        Ok(transcript)
    }

    fn local_destination(&self, file_name: &str) -> Result<PathBuf, JobFailure> {
        Path::new(file_name)
            .file_name()
            .map(|name| self.work_dir.join(name))
            .ok_or_else(|| {
                JobFailure::Download(StorageError::NotFound(format!(
                    "invalid file name: {}",
                    file_name
                )))
            })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("configuration: {0}")]
    Config(StorageError),
}

#[derive(Debug, thiserror::Error)]
enum JobFailure {
    #[error("Error checking file status: {0}")]
    StatusCheck(StorageError),
    #[error("Error accessing file: {0}")]
    Download(StorageError),
    #[error("Processing error: {0}")]
    Engine(TranscriptionError),
    #[error("Processing error: {0}")]
    Persist(StorageError),
    #[error("Processing error: {0}")]
    Serialize(serde_json::Error),
}
