//! WidgetGen Server - structured widget generation backed by Gemini.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use widgetgen_server::{build_state, CliArgs, ServerConfig};

fn init_tracing(args: &CliArgs) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "widgetgen_server={level},widgetgen_api={level},tower_http={level}",
            level = args.log_level
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if args.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(&args);

    info!("Starting WidgetGen Server v{}", env!("CARGO_PKG_VERSION"));

    let config = ServerConfig::load(&args).context("Failed to load configuration")?;
    info!(
        environment = ?config.environment,
        model = %config.model,
        project = %config.firebase_project_id,
        "Configuration loaded"
    );

    let state = build_state(&config).context("Failed to initialize providers")?;

    widgetgen_api::run_server_with_config(Arc::new(state), config.api_config(), shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("WidgetGen Server stopped");
    Ok(())
}
