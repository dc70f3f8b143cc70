use crate::application::ports::MessageQueue;
use crate::domain::JobRequest;
use crate::presentation::cli::EnqueueArgs;

use super::CommandError;

/// Publishes a job request and returns the queue-assigned message id.
#[tracing::instrument(skip(queue))]
pub async fn enqueue_handler(
    queue: &dyn MessageQueue,
    args: &EnqueueArgs,
) -> Result<String, CommandError> {
    let mut request = JobRequest::new(
        args.file_id.clone(),
        args.file_name.clone(),
        args.file_path.clone(),
        args.shared_by.clone(),
    );
    request.operation = args.operation.clone();

    let payload = serde_json::to_vec(&request)
        .map_err(|e| CommandError::Encode(e.to_string()))?;
    let message_id = queue.publish(&payload).await?;

    tracing::info!(%message_id, file_name = %request.file_name, "Job request published");
    Ok(message_id)
}
