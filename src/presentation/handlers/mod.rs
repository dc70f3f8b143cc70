mod consume;
mod enqueue;
mod file;
mod message;

pub use consume::consume_handler;
pub use enqueue::enqueue_handler;
pub use file::file_handler;
pub use message::message_handler;

use crate::application::ports::QueueError;
use crate::application::services::{ConsumerError, DecodeError};

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("encoding request: {0}")]
    Encode(String),
    #[error(transparent)]
    Consumer(#[from] ConsumerError),
    #[error(transparent)]
    Queue(#[from] QueueError),
}
