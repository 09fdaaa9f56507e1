pub mod api;
pub mod cli;
pub mod clients;
pub mod config;
pub mod db;
pub mod entities;
pub mod models;
pub mod parser;
pub mod services;

use std::sync::Arc;
use tokio::signal;

use anyhow::Context;
use chrono::Local;
use cli::{Cli, Commands};
pub use config::Config;
use config::LogFormat;
use models::Period;
use services::Scheduler;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.general.log_format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    init_tracing(&config);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(config).await,
        Commands::Fetch { period, sign, day } => cmd_fetch(config, period, &sign, &day).await,
        Commands::Purge => cmd_purge(config).await,
        Commands::Init => cmd_init(),
    }
}

fn install_metrics(
    config: &Config,
) -> anyhow::Result<Option<metrics_exporter_prometheus::PrometheusHandle>> {
    if !config.observability.metrics_enabled {
        return Ok(None);
    }

    let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    info!("Prometheus metrics recorder initialized");
    Ok(Some(handle))
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    info!(
        "horoscope-api v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let prometheus_handle = install_metrics(&config)?;
    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let cache_config = config.cache.clone();

    let state = api::create_app_state_from_config(config, prometheus_handle).await?;

    let scheduler = Arc::new(Scheduler::new(state.horoscope().clone(), cache_config));
    let scheduler_handle = {
        let sched = Arc::clone(&scheduler);
        tokio::spawn(async move {
            if let Err(e) = sched.start().await {
                error!("Scheduler error: {}", e);
            }
        })
    };

    let app = api::router(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Web server running at http://{}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    scheduler.stop().await;
    scheduler_handle.abort();
    info!("Server stopped");

    served.context("Web server error")
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}

async fn cmd_fetch(config: Config, period: Period, sign: &str, day: &str) -> anyhow::Result<()> {
    let state = api::create_app_state_from_config(config, None).await?;
    let service = state.horoscope();
    let now = Local::now().naive_local();

    let json = match period {
        Period::Daily => serde_json::to_string_pretty(&service.daily(sign, day, now).await?)?,
        Period::Weekly => serde_json::to_string_pretty(&service.weekly(sign, now).await?)?,
        Period::Monthly => serde_json::to_string_pretty(&service.monthly(sign, now).await?)?,
    };

    println!("{json}");
    Ok(())
}

async fn cmd_purge(config: Config) -> anyhow::Result<()> {
    let cache_config = config.cache.clone();
    let state = api::create_app_state_from_config(config, None).await?;
    Scheduler::new(state.horoscope().clone(), cache_config)
        .run_once()
        .await
}

fn cmd_init() -> anyhow::Result<()> {
    if Config::create_default_if_missing()? {
        println!("Created config.toml");
    } else {
        println!("config.toml already exists");
    }
    Ok(())
}
