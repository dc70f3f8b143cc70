use std::sync::Arc;

use crate::application::services::{HandleOutcome, MessageConsumer};
use crate::infrastructure::queue::InMemoryQueue;
use crate::presentation::state::AppState;

use super::CommandError;

#[tracing::instrument(skip(state, json))]
pub async fn message_handler(state: &AppState, json: &str) -> Result<HandleOutcome, CommandError> {
    let request = MessageConsumer::decode(json.as_bytes())?;
    let consumer = state.consumer(Arc::new(InMemoryQueue::new()));
    let outcome = consumer.handle_request(request).await?;
    tracing::info!(outcome = ?outcome, "Message handled");
    Ok(outcome)
}
