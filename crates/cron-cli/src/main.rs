//! cronctl: one subcommand per cron API endpoint, JSON on stdout.

use clap::Parser;
use cron_cli::{cli::Cli, commands};
use cron_client::{CancelableExt, HttpCronClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let client = HttpCronClient::new(cli.client_config());
    tracing::debug!(base_url = %client.config().base_url, "cronctl starting");

    let call = commands::run(&client, cli.command).cancelable();
    let handle = call.handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling request");
            handle.cancel();
        }
    });

    match call.await {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "request failed");
            Err(e.into())
        }
    }
}
