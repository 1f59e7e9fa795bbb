//! Heart-failure survival prediction gateway

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use heartfail_gateway::{start_server, AppState, GatewayConfig};
use heartfail_model::ModelService;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "heartfail-gateway")]
#[command(about = "Web form for heart-failure survival prediction")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address
    #[arg(long)]
    host: Option<String>,

    /// Bind port
    #[arg(short, long)]
    port: Option<u16>,

    /// Model artifact path
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Log level, overridden by RUST_LOG
    #[arg(long)]
    log_level: Option<String>,

    /// Log format: json or pretty
    #[arg(long)]
    log_format: Option<String>,
}

impl Cli {
    fn apply(self, config: &mut GatewayConfig) {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(model) = self.model {
            config.model_path = model;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = GatewayConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    config.validate()?;

    init_logging(&config);
    info!("Starting heartfail-gateway v{}", env!("CARGO_PKG_VERSION"));

    let model = load_model(&config).map_err(|e| {
        error!("Model service failed to start: {:#}", e);
        e
    })?;

    let addr = config.bind_addr();
    start_server(AppState::new(model), &addr, shutdown_signal()).await?;

    info!("Gateway stopped");
    Ok(())
}

fn load_model(config: &GatewayConfig) -> Result<ModelService> {
    let model = ModelService::load(&config.model_path).with_context(|| {
        format!(
            "failed to load model artifact {}",
            config.model_path.display()
        )
    })?;

    if let Some(expected) = &config.expected_model_hash {
        model.verify_fingerprint(expected)?;
        info!("Model hash matches pinned value");
    }

    Ok(model)
}

fn init_logging(config: &GatewayConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
