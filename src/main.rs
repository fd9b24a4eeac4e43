use anyhow::Result;
use log::{error, info, warn};
use std::sync::Arc;
use vanet_command::alerts::AlertStore;
use vanet_command::api::rest::{AppState, RestApi};
use vanet_command::config;
use vanet_command::devices::DeviceRegistry;
use vanet_command::geocoding::NominatimClient;
use vanet_command::incidents::IncidentLogBook;
use vanet_command::messaging::bus::EventBus;
use vanet_command::messaging::event::EventType;
use vanet_command::security::auth::AuthService;
use vanet_command::security::SecurityService;
use vanet_command::simulation::{generator, AlertFeed, HealthMonitor, MetricsSampler};
use vanet_command::storage::LocalStore;

async fn run_app() -> Result<()> {
    // Initialize logging
    env_logger::init();
    info!("Starting VANET Command emergency response backend");

    // Load configuration
    let config_path = std::env::args().nth(1).map(std::path::PathBuf::from);
    let config = config::load_config(config_path.as_deref())?;
    info!("Configuration loaded");

    // Open the local store and seed the default administrator
    let store = Arc::new(LocalStore::open(&config.storage)?);
    let auth_service = Arc::new(AuthService::new(store.clone(), &config.security));
    auth_service.ensure_default_admin().await?;

    let security_service = Arc::new(SecurityService::new(config.security.clone()));

    // In-process event fan-out for notifications
    let event_bus = EventBus::default();

    // Publish system startup event
    if let Err(e) = event_bus.publish(
        EventType::SystemStartup,
        None,
        serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339()
        }),
    ) {
        warn!("Failed to publish system startup event: {}", e);
    }

    // Seed the simulated world
    let alert_store = Arc::new(AlertStore::with_alerts(generator::seed_alerts()));
    let device_registry = Arc::new(DeviceRegistry::new());
    let incident_logs = Arc::new(IncidentLogBook::new());
    let health_monitor = Arc::new(HealthMonitor::new());
    info!(
        "Simulated world seeded: {} alerts, {} RSUs, {} OBUs",
        alert_store.len().await,
        device_registry.rsu_count().await,
        device_registry.obus().await.len()
    );

    // Start the alert feed
    let alert_feed = Arc::new(AlertFeed::new(
        alert_store.clone(),
        health_monitor.clone(),
        event_bus.clone(),
        config.simulation.clone(),
    ));
    alert_feed.clone().start()?;
    info!("Alert feed started");

    // Start the network metrics sampler
    let metrics_sampler = Arc::new(MetricsSampler::new(
        health_monitor.clone(),
        event_bus.clone(),
        config.simulation.metrics_interval_secs,
    ));
    metrics_sampler.clone().start()?;
    info!("Metrics sampler started");

    // Reverse geocoding client
    let geocoder = Arc::new(NominatimClient::new(&config.geocoding)?);

    // Start the REST API
    let state = AppState {
        alerts: alert_store,
        devices: device_registry,
        incidents: incident_logs,
        health: health_monitor,
        auth: auth_service,
        security: security_service,
        bus: event_bus.clone(),
        geocoder,
        geocoding: config.geocoding.clone(),
    };
    let http_server = RestApi::new(&config.api, state)?;

    tokio::select! {
        result = http_server.run() => {
            if let Err(e) = result {
                error!("API server exited: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down...");
        }
    }

    // Stop the simulation tasks
    alert_feed.shutdown();
    metrics_sampler.shutdown();
    info!("Simulation tasks stopped");

    // Publish a system shutdown event
    if let Err(e) = event_bus.publish(
        EventType::SystemShutdown,
        None,
        serde_json::json!({"reason": "Normal shutdown"}),
    ) {
        error!("Failed to publish shutdown event: {}", e);
    }

    // Allow time for the message to reach stream subscribers
    tokio::time::sleep(tokio::time::Duration::from_secs(1)).await;

    Ok(())
}

fn main() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build tokio runtime");

    if let Err(e) = runtime.block_on(run_app()) {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}
