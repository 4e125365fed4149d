use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::layout::PageSize;

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Optional JSON file of presets merged over the built-in catalog.
    pub preset_catalog_path: Option<PathBuf>,
    pub default_page_size: PageSize,
    pub page_margin_pt: f32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            preset_catalog_path: optional_env("PRESET_CATALOG_PATH").map(PathBuf::from),
            default_page_size: env_or("DEFAULT_PAGE_SIZE", "letter")
                .parse::<PageSize>()
                .map_err(anyhow::Error::msg)
                .context("DEFAULT_PAGE_SIZE must be letter or a4")?,
            page_margin_pt: parse_margin(&env_or("PAGE_MARGIN_PT", "36"))?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            preset_catalog_path: None,
            default_page_size: PageSize::Letter,
            page_margin_pt: 36.0,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_margin(raw: &str) -> Result<f32> {
    let margin = raw
        .trim()
        .parse::<f32>()
        .with_context(|| format!("PAGE_MARGIN_PT must be a number, got '{raw}'"))?;
    if !margin.is_finite() || margin < 0.0 {
        anyhow::bail!("PAGE_MARGIN_PT must be a non-negative number, got '{raw}'");
    }
    Ok(margin)
}
