//! CLI entry point for the MinIO → Slack upload notifier.
//!
//! Provides subcommands for handling a single storage event, listing the
//! secrets visible to the process, and verifying both service connections.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use minio_slack_notifier::{
    config::Settings,
    context::bootstrap,
    event::StorageEvent,
    infra::kube::{FileSecretStore, KubeSecretStore},
    services::{chat_api::ChatApi, secret_store::SecretStore},
};
use std::ffi::OsStr;
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "minio_slack_notifier")]
#[command(about = "Posts a Slack message for every object uploaded to MinIO", long_about = None)]
struct Cli {
    /// Read secrets from a JSON list of Kubernetes secrets instead of the API
    #[arg(long, global = true, value_name = "PATH")]
    secrets_file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle one storage event and print the result
    Handle {
        /// Path to the event JSON, or "-" for stdin
        #[arg(short, long, default_value = "-")]
        event: String,
    },
    /// List the secrets visible to this process
    ListSecrets,
    /// Load credentials and check both services are reachable
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/minio_slack_notifier.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("minio_slack_notifier.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env()?;

    let secrets: Box<dyn SecretStore> = match &cli.secrets_file {
        Some(path) => {
            info!(path = %path, "Reading secrets from file");
            Box::new(FileSecretStore::new(path))
        }
        None => Box::new(KubeSecretStore::try_default().await?),
    };

    match cli.command {
        Commands::Handle { event } => {
            let ctx = bootstrap(&settings, secrets.as_ref()).await?;
            let raw = read_event(&event).await?;
            let event = StorageEvent::from_json(&raw).context("invalid event payload")?;

            let outcome = ctx.notifier.handle(&event).await?;
            println!("{outcome}");
        }
        Commands::ListSecrets => {
            let all = secrets.list_secrets().await?;

            info!(total = all.len(), "Secret list fetched");

            for secret in &all {
                info!(
                    name = %secret.name,
                    namespace = secret.namespace.as_deref().unwrap_or("-"),
                    fields = secret.data.len(),
                    "Secret"
                );
            }
        }
        Commands::Check => {
            let ctx = bootstrap(&settings, secrets.as_ref()).await?;

            let buckets = ctx.storage.list_buckets().await?;
            info!(endpoint = ctx.storage.endpoint(), buckets = buckets.len(), "MinIO reachable");

            let reply = ctx
                .notifier
                .chat()
                .api_call("auth.test", serde_json::json!({}))
                .await?;
            if reply.ok {
                info!("Slack token accepted");
            } else {
                warn!(error = ?reply.error, "Slack rejected the token");
                anyhow::bail!(
                    "Slack auth.test failed: {}",
                    reply.error.unwrap_or_default()
                );
            }
        }
    }

    Ok(())
}

/// Reads the event payload from a file path or, for `-`, from stdin.
async fn read_event(source: &str) -> Result<String> {
    if source == "-" {
        let mut raw = String::new();
        tokio::io::stdin()
            .read_to_string(&mut raw)
            .await
            .context("failed to read event from stdin")?;
        Ok(raw)
    } else {
        tokio::fs::read_to_string(source)
            .await
            .with_context(|| format!("failed to read event from {source}"))
    }
}
