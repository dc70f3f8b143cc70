use std::path::Path;
use std::sync::Arc;

use crate::application::services::HandleOutcome;
use crate::domain::JobRequest;
use crate::infrastructure::queue::InMemoryQueue;
use crate::presentation::state::AppState;

use super::CommandError;

/// Runs the format gate and processor for one file on the local filesystem.
#[tracing::instrument(skip(state))]
pub async fn file_handler(state: &AppState, path: &Path) -> Result<HandleOutcome, CommandError> {
    let absolute = tokio::fs::canonicalize(path)
        .await
        .map_err(|e| CommandError::InvalidPath(format!("{}: {}", path.display(), e)))?;
    let request = JobRequest::for_local_file(&absolute)
        .ok_or_else(|| CommandError::InvalidPath(absolute.display().to_string()))?;

    tracing::info!(file_path = %request.file_path, file_name = %request.file_name, "Processing local file");

    // Direct requests never touch a remote queue.
    let consumer = state.consumer(Arc::new(InMemoryQueue::new()));
    let outcome = consumer.handle_request(request).await?;
    tracing::info!(outcome = ?outcome, "Local file handled");
    Ok(outcome)
}
