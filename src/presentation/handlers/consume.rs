use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::application::ports::MessageQueue;
use crate::application::services::ConsumeOutcome;
use crate::presentation::state::AppState;

use super::CommandError;

#[tracing::instrument(skip(state, queue, shutdown))]
pub async fn consume_handler(
    state: &AppState,
    queue: Arc<dyn MessageQueue>,
    once: bool,
    shutdown: CancellationToken,
) -> Result<(), CommandError> {
    let consumer = state.consumer(queue);

    if once {
        let outcome = consumer.run_once().await?;
        match &outcome {
            ConsumeOutcome::Idle => tracing::info!("Nothing to consume"),
            ConsumeOutcome::Handled(handled) => tracing::info!(outcome = ?handled, "Message handled"),
            ConsumeOutcome::Rejected(reason) => tracing::warn!(%reason, "Message rejected"),
        }
        return Ok(());
    }

    consumer.run(shutdown).await?;
    Ok(())
}
