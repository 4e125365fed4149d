use std::net::SocketAddr;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use menu_layout::config::Config;
use menu_layout::presets::{init_catalog, PresetCatalog};
use menu_layout::routes::build_router;
use menu_layout::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("menu_layout={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting menu layout service v{}", env!("CARGO_PKG_VERSION"));

    // Build the preset catalog once; it is immutable afterwards
    let mut presets = PresetCatalog::builtin();
    if let Some(path) = &config.preset_catalog_path {
        presets
            .merge_file(path)
            .with_context(|| format!("Failed to load presets from {}", path.display()))?;
    }
    let catalog = init_catalog(presets)?;
    info!("Preset catalog ready ({} presets)", catalog.len());

    info!(
        "Export defaults: {:?} pages, {}pt margins",
        config.default_page_size, config.page_margin_pt
    );

    let state = AppState {
        config: config.clone(),
        catalog,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
