use crate::app_config::AppConfig;
use crate::history_listener::history_listener;
use crate::map_export::{MapExportError, export_map, map_refresher};
use crate::network::local_ip;
use crate::server::{LocationServer, ServerState};
use crate::store::LocationStore;
use tokio::{signal, task};
use tracing::{info, warn};

mod app_config;
mod domain;
mod extensions;
mod history_listener;
mod map_export;
mod network;
mod server;
mod store;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    info!("🪵 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load()?;
    info!("✅  Loaded configuration");

    let store = LocationStore::new();
    let notifier_rx = store.notifier();
    let listener_store = store.clone();

    task::spawn(async move {
        history_listener(listener_store, notifier_rx, |record| info!("🕘 {}", record)).await;
    });
    info!("✅  Initialized history listener");

    let refresher_store = store.clone();
    let refresher_rx = store.notifier();
    let output_path = config.map().output_path().to_path_buf();
    let zoom_start = config.map().zoom_start();
    task::spawn(async move {
        map_refresher(refresher_store, refresher_rx, output_path, zoom_start).await;
    });
    info!("✅  Initialized map refresher, map is written to '{}'", config.map().output_path().display());

    let server = LocationServer::new(store.clone(), config.server().handler_config());
    let address = server.start(config.server().host(), config.server().port()).await?;

    info!("🔥 {} is up and running at {}:{}", env!("CARGO_PKG_NAME"), local_ip(), address.port());
    info!("Press Ctrl-C to stop");

    signal::ctrl_c().await?;
    server.stop().await;
    if let ServerState::Running(address) = server.state().await {
        warn!("⚠️ Server is still listening on {}", address);
    }

    let devices = store.devices().await;
    info!("Received {} location report(s) from {} device(s)", store.len().await, devices.len());
    for latest in &devices {
        let reports = store.history(&latest.device_id).await.len();
        #[rustfmt::skip]
        info!(device_id = latest.device_id, "📱 {}: {} report(s), last seen {} at {:.6}, {:.6}", latest.device_id, reports, latest.timestamp, latest.latitude, latest.longitude);
    }
    if let Some(latest) = store.latest().await {
        info!("Last known location: {}", latest);
    }

    match export_map(&store.snapshot().await, config.map().output_path(), config.map().zoom_start()).await {
        Ok(path) => info!("🗺️ Map available at file://{}", path.canonicalize().unwrap_or(path).display()),
        Err(MapExportError::NoData) => info!("No location data available, skipping map export"),
        Err(e) => warn!("⚠️ {}", e),
    }

    Ok(())
}
