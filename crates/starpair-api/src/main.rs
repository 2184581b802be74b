use anyhow::{Context, Result};
use clap::Parser;
use starpair_api::{AppState, Server};
use starpair_core::Settings;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "starpair-api")]
#[command(author, version, about = "StarPair zodiac compatibility API", long_about = None)]
struct Args {
    /// Directory holding default.toml, {env}.toml and local.toml
    #[arg(short, long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Environment name (defaults to APP_ENV / RUST_ENV, then "development")
    #[arg(short, long)]
    env: Option<String>,

    /// Listen host, overriding configuration
    #[arg(long)]
    host: Option<String>,

    /// Listen port, overriding configuration
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let args = Args::parse();

    let config_dir = args
        .config_dir
        .unwrap_or_else(Settings::default_config_dir);
    let env_name = args.env.unwrap_or_else(Settings::default_env);
    let mut settings =
        Settings::load(&config_dir, &env_name).context("Failed to load configuration")?;

    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    settings.validate()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "starpair_api={level},starpair_ai={level},starpair_core={level},tower_http={level}",
                    level = settings.logging.level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(env = %settings.env, config_dir = %config_dir.display(), "Starting StarPair API");

    let state = AppState::new(settings).await?;
    info!(
        ai = state.analyzer.provider_name().unwrap_or("none"),
        sheets_log = state.log_sink.is_some(),
        "Services ready"
    );

    Server::new(state)?.run().await
}
