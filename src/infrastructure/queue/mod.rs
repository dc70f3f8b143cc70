mod in_memory_queue;
mod pubsub_queue;
mod queue_factory;

pub use in_memory_queue::InMemoryQueue;
pub use pubsub_queue::PubSubQueue;
pub use queue_factory::MessageQueueFactory;
