use crate::config::Config;
use crate::presets::PresetCatalog;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Process-wide preset catalog. Installed once at startup, read-only afterwards.
    pub catalog: &'static PresetCatalog,
}
