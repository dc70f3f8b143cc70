mod artifact_store;
mod backend_registry;
mod job_processor;
mod marker_state;
mod message_consumer;
mod retry_policy;

pub use artifact_store::ArtifactStore;
pub use backend_registry::BackendRegistry;
pub use job_processor::{JobProcessor, ProcessError, ProcessOutcome};
pub use marker_state::MarkerStateMachine;
pub use message_consumer::{
    ConsumeOutcome, ConsumerError, DEFAULT_MAX_MESSAGES, DEFAULT_PULL_TIMEOUT, DecodeError,
    HandleOutcome, MAX_CONSECUTIVE_QUEUE_FAILURES, MessageConsumer,
};
pub use retry_policy::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY, RetryPolicy};
