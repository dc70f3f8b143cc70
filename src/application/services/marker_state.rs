use crate::application::ports::{StorageBackend, StorageError};
use crate::domain::{FileRef, JobState};

/// Derives job state from sentinel artifacts next to the source.
///
/// Every evaluation probes storage afresh. Two workers evaluating the same source
/// concurrently can both observe `Ready`; there is no claim beyond the `.tmp` marker.
pub struct MarkerStateMachine;

impl MarkerStateMachine {
    pub async fn evaluate(
        backend: &dyn StorageBackend,
        source: &FileRef,
    ) -> Result<JobState, StorageError> {
        let probe = backend.probe_markers(source).await?;
        let state = JobState::from_probe(&probe);
        tracing::debug!(
            file_name = %source.name,
            source = probe.source,
            tmp = probe.tmp,
            txt = probe.txt,
            err = probe.err,
            state = %state,
            "Evaluated marker state"
        );
        Ok(state)
    }
}
