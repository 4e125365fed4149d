//! The preset catalog: built-in templates plus optional presets loaded from disk.
//!
//! The catalog is built once at startup, installed with `init_catalog`, and read from
//! everywhere through `catalog()`. It is never mutated after installation.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::info;

use crate::errors::LayoutError;
use crate::presets::grid::{
    FeaturedSlot, GridConfig, GridSpec, PackingPolicy, Preset, StaticBlock, StaticKind, DESKTOP,
    MOBILE, PRINT,
};
use crate::presets::style::{ColorPalette, ImageMode, ItemCardStyle, TemplateStyle};

#[derive(Debug, Clone, Default)]
pub struct PresetCatalog {
    presets: BTreeMap<String, Preset>,
}

/// Lightweight listing entry for the presets endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetSummary {
    pub id: String,
    pub name: String,
    pub contexts: Vec<String>,
    pub palettes: Vec<String>,
}

static CATALOG: OnceLock<PresetCatalog> = OnceLock::new();

/// Installs the process-wide catalog. Fails if a catalog is already installed,
/// including the built-in fallback installed by an earlier `catalog()` call.
pub fn init_catalog(catalog: PresetCatalog) -> Result<&'static PresetCatalog> {
    if CATALOG.set(catalog).is_err() {
        bail!("Preset catalog is already installed");
    }
    CATALOG.get().context("Preset catalog is not installed")
}

/// The process-wide catalog, falling back to the built-ins if none was installed.
pub fn catalog() -> &'static PresetCatalog {
    CATALOG.get_or_init(PresetCatalog::builtin)
}

impl PresetCatalog {
    pub fn from_presets(presets: impl IntoIterator<Item = Preset>) -> Self {
        let mut catalog = Self::default();
        for preset in presets {
            catalog.presets.insert(preset.id.clone(), preset);
        }
        catalog
    }

    pub fn get(&self, id: &str) -> Result<&Preset, LayoutError> {
        self.presets
            .get(id)
            .ok_or_else(|| LayoutError::UnknownPreset(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.values()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// True if any template offers a palette with this id.
    pub fn palette_exists(&self, id: &str) -> bool {
        self.presets.values().any(|p| p.style.palette(id).is_some())
    }

    pub fn summaries(&self) -> Vec<PresetSummary> {
        self.presets
            .values()
            .map(|p| PresetSummary {
                id: p.id.clone(),
                name: p.name.clone(),
                contexts: p.contexts().map(str::to_string).collect(),
                palettes: p.style.palette_ids().map(str::to_string).collect(),
            })
            .collect()
    }

    /// Merges presets from a JSON array file. A preset with an existing id replaces it.
    /// Returns the number of presets read.
    pub fn merge_file(&mut self, path: &Path) -> Result<usize> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read preset catalog '{}'", path.display()))?;
        let presets: Vec<Preset> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid preset catalog JSON in '{}'", path.display()))?;

        for preset in &presets {
            validate_preset(preset)?;
        }

        let count = presets.len();
        for preset in presets {
            info!(preset = %preset.id, "Loaded preset from {}", path.display());
            self.presets.insert(preset.id.clone(), preset);
        }
        Ok(count)
    }

    /// The templates shipped with the service.
    pub fn builtin() -> Self {
        Self::from_presets([classic(), bistro(), gallery()])
    }
}

fn validate_preset(preset: &Preset) -> Result<()> {
    if preset.grid_config.contexts.is_empty() {
        bail!("Preset '{}' defines no contexts", preset.id);
    }
    for (context, spec) in &preset.grid_config.contexts {
        if spec.columns == 0 {
            bail!("Preset '{}' context '{context}' has zero columns", preset.id);
        }
        if spec.row_height_pt.is_nan() || spec.row_height_pt <= 0.0 {
            bail!(
                "Preset '{}' context '{context}' needs a positive row height",
                preset.id
            );
        }
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Built-in templates
// ────────────────────────────────────────────────────────────────────────────

fn grid(columns: u16, gap_px: u16, section_spacing_px: u16, row_height_pt: f32) -> GridSpec {
    GridSpec {
        columns,
        gap_px,
        section_spacing_px,
        row_height_pt,
    }
}

fn palette(id: &str, name: &str, colors: [&str; 5]) -> ColorPalette {
    let [background, surface, text, accent, muted] = colors.map(str::to_string);
    ColorPalette {
        id: id.to_string(),
        name: name.to_string(),
        background,
        surface,
        text,
        accent,
        muted,
    }
}

fn block(kind: StaticKind) -> StaticBlock {
    StaticBlock {
        kind,
        col_span: None,
        content: None,
    }
}

/// Single-column-on-phone text menu with no photos.
fn classic() -> Preset {
    Preset {
        id: "classic".to_string(),
        name: "Classic".to_string(),
        grid_config: GridConfig::default()
            .with_context(MOBILE, grid(1, 12, 24, 48.0))
            .with_context(DESKTOP, grid(3, 16, 32, 48.0))
            .with_context(PRINT, grid(2, 10, 18, 54.0)),
        style: TemplateStyle {
            default_palette: palette(
                "ivory",
                "Ivory",
                ["#FBF8F1", "#FFFFFF", "#2B2118", "#8C3B2A", "#8A7F72"],
            ),
            alternates: vec![
                palette(
                    "charcoal",
                    "Charcoal",
                    ["#1E1E1E", "#2A2A2A", "#F2EFE9", "#D9A441", "#9A958C"],
                ),
                palette(
                    "sage",
                    "Sage",
                    ["#EEF2EA", "#FFFFFF", "#24311F", "#5B7F4A", "#7D8A76"],
                ),
            ],
            item_card: ItemCardStyle::Minimal,
            image_mode: ImageMode::None,
        },
        featured: vec![],
        masthead: vec![block(StaticKind::Title)],
        packing: PackingPolicy::default(),
    }
}

/// Bordered cards with thumbnails under a logo, title and house note.
fn bistro() -> Preset {
    Preset {
        id: "bistro".to_string(),
        name: "Bistro".to_string(),
        grid_config: GridConfig::default()
            .with_context(MOBILE, grid(2, 8, 20, 72.0))
            .with_context(DESKTOP, grid(4, 16, 28, 72.0))
            .with_context(PRINT, grid(3, 10, 18, 72.0)),
        style: TemplateStyle {
            default_palette: palette(
                "chalkboard",
                "Chalkboard",
                ["#22302B", "#2D3D37", "#F4F1E8", "#E8B04B", "#A7B3AC"],
            ),
            alternates: vec![
                palette(
                    "brick",
                    "Brick",
                    ["#F6EEE6", "#FFFFFF", "#3A1F17", "#A8432A", "#8F7A70"],
                ),
                palette(
                    "cream",
                    "Cream",
                    ["#FFF9EC", "#FFFFFF", "#2E2A24", "#6B8E23", "#9C9482"],
                ),
            ],
            item_card: ItemCardStyle::Bordered,
            image_mode: ImageMode::Thumbnail,
        },
        featured: vec![],
        masthead: vec![
            StaticBlock {
                kind: StaticKind::Logo,
                col_span: Some(1),
                content: None,
            },
            block(StaticKind::Title),
            block(StaticKind::TextBlock),
        ],
        packing: PackingPolicy::default(),
    }
}

/// Photo-led grid: the first item of every section is a 2×2 hero on wide layouts.
fn gallery() -> Preset {
    Preset {
        id: "gallery".to_string(),
        name: "Gallery".to_string(),
        grid_config: GridConfig::default()
            .with_context(MOBILE, grid(1, 8, 20, 96.0))
            .with_context(DESKTOP, grid(4, 12, 32, 96.0))
            .with_context(PRINT, grid(3, 8, 16, 96.0)),
        style: TemplateStyle {
            default_palette: palette(
                "gallery-white",
                "Gallery White",
                ["#FFFFFF", "#F5F5F5", "#151515", "#C2410C", "#737373"],
            ),
            alternates: vec![palette(
                "midnight",
                "Midnight",
                ["#0B1020", "#141B2D", "#E6E9F2", "#7DD3FC", "#8B93A7"],
            )],
            item_card: ItemCardStyle::PhotoCard,
            image_mode: ImageMode::Hero,
        },
        featured: vec![FeaturedSlot {
            section: None,
            slot: 0,
            col_span: 2,
            row_span: 2,
            contexts: vec![DESKTOP.to_string(), PRINT.to_string()],
        }],
        masthead: vec![block(StaticKind::Title), block(StaticKind::QrCode)],
        packing: PackingPolicy::default(),
    }
}
