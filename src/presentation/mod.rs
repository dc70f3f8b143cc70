pub mod cli;
pub mod config;
pub mod handlers;
pub mod state;

pub use cli::{Cli, Command, EnqueueArgs};
pub use config::{Environment, Settings};
pub use state::{AppState, StartupError};
