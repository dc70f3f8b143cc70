pub mod audio;
pub mod observability;
pub mod queue;
pub mod storage;
