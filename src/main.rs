use clap::Parser;
use tokio_util::sync::CancellationToken;

use sonus::infrastructure::observability::{TracingConfig, init_tracing};
use sonus::infrastructure::queue::MessageQueueFactory;
use sonus::presentation::handlers::{
    consume_handler, enqueue_handler, file_handler, message_handler,
};
use sonus::presentation::{AppState, Cli, Command, Environment, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment)?;

    init_tracing(TracingConfig::from_settings(&settings.logging, environment));

    let result = run(cli.command(), settings).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "Worker exited with error");
    }
    result
}

async fn run(command: Command, settings: Settings) -> anyhow::Result<()> {
    match command {
        Command::Consume { once } => {
            let state = AppState::from_settings(settings)?;
            let queue = state.queue()?;
            let shutdown = CancellationToken::new();
            spawn_shutdown_listener(shutdown.clone());
            consume_handler(&state, queue, once, shutdown).await?;
        }
        Command::File { path } => {
            let state = AppState::from_settings(settings)?;
            let outcome = file_handler(&state, &path).await?;
            if let Some(transcript) = outcome.transcript() {
                println!("{}", transcript.text);
            }
        }
        Command::Message { json } => {
            let state = AppState::from_settings(settings)?;
            message_handler(&state, &json).await?;
        }
        Command::Enqueue(args) => {
            let queue = MessageQueueFactory::create(&settings.queue)?;
            let message_id = enqueue_handler(queue.as_ref(), &args).await?;
            println!("{}", message_id);
        }
    }

    Ok(())
}

fn spawn_shutdown_listener(shutdown: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown signal received, finishing current job");
                shutdown.cancel();
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
        }
    });
}
