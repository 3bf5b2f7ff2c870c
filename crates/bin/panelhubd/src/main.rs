//! # panelhubd: panelhub daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (env vars, config file)
//! - Load user settings and put every device back under schedule control
//! - Construct the device client factory, effect registry and schedule timer
//! - Build the axum router, injecting application services
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (Ctrl-C)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use panelhub_adapter_http_axum::router;
use panelhub_adapter_http_axum::state::AppState;
use panelhub_adapter_settings_json::JsonSettingsStore;
use panelhub_adapter_virtual::{HueCycleSampler, VirtualClientFactory};
use panelhub_app::effects::EffectRegistry;
use panelhub_app::ports::LocalClock;
use panelhub_app::schedule_timer::ScheduleTimer;
use panelhub_app::services::settings_service::SettingsService;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Settings
    let store = JsonSettingsStore::new(&config.settings.path);
    let settings = SettingsService::load(store)
        .await
        .with_context(|| format!("failed to load {}", config.settings.path.display()))?;
    settings.reset_operation_modes().await?;

    // Effects
    let factory = VirtualClientFactory::new(config.virtual_devices.effects.iter().cloned());
    let sampler = Arc::new(HueCycleSampler::new(config.ambilight.hue_step));
    let registry = Arc::new(EffectRegistry::new(
        factory,
        sampler,
        config.ambilight_refresh(),
    ));

    // Timer
    let timer = Arc::new(ScheduleTimer::new(
        settings.clone(),
        Arc::clone(&registry),
        LocalClock,
        config.schedule_interval(),
    ));
    timer.start();

    // HTTP
    let app = router::build(AppState::new(settings, registry, Arc::clone(&timer)));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(%bind_addr, "panelhubd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    timer.stop();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
