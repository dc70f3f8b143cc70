use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::DEFAULT_OPERATION;

#[derive(Parser, Debug)]
#[command(
    name = "sonus",
    version,
    about = "Queue-driven media transcription worker",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Pull and process job requests from the configured queue
    Consume {
        /// Handle at most one message, then exit
        #[arg(long)]
        once: bool,
    },
    /// Process a single local media file
    File {
        path: PathBuf,
    },
    /// Decode and process one JSON job request
    Message {
        json: String,
    },
    /// Publish a job request to the configured queue
    Enqueue(EnqueueArgs),
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct EnqueueArgs {
    #[arg(long)]
    pub file_name: String,

    /// Folder reference, e.g. `drive://<folder id>` or `file:///data/in`
    #[arg(long)]
    pub file_path: String,

    #[arg(long)]
    pub file_id: Option<String>,

    #[arg(long, default_value = "cli")]
    pub shared_by: String,

    #[arg(long, default_value = DEFAULT_OPERATION)]
    pub operation: String,
}

impl Cli {
    /// The subcommand to run; `consume` when none was given.
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Consume { once: false })
    }
}
