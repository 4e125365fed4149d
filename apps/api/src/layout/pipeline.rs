//! Composition of the engine stages for the two consumer families.
//!
//! - Live preview: packer → style binder.
//! - Fixed-page export: packer → page capacity → paginator → page fill → style binder.
//!
//! Both are synchronous and pure. Callers on an async runtime wrap them in
//! `tokio::task::spawn_blocking`.

use serde::Serialize;
use tracing::debug;

use crate::errors::LayoutError;
use crate::layout::packer::{generate, generate_instance};
use crate::layout::page_fill::{analyze_pages, PageFillAnalysis};
use crate::layout::page_size::{default_page_config, Orientation, PageConfig, PageSize};
use crate::layout::paginator::{paginate_with_policy, PageCapacity, PageLayout, PaginationPolicy};
use crate::layout::tile::LayoutInstance;
use crate::menu::MenuDocument;
use crate::presets::{
    bind_style, resolve_palette, PaletteFallback, PresetCatalog, StyledLayout, PRINT,
};

/// Paginated output for one export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedLayout {
    pub preset: String,
    pub context: String,
    pub page: PageConfig,
    pub orientation: Orientation,
    pub rows_per_page: u32,
    pub pages: Vec<PageLayout>,
    pub fill: Vec<PageFillAnalysis>,
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub page: PageConfig,
    /// Grid context to pack for. Defaults to `print`.
    pub context: Option<String>,
    pub palette_id: Option<String>,
    pub palette_fallback: PaletteFallback,
    pub pagination: PaginationPolicy,
}

impl ExportOptions {
    pub fn new(size: PageSize, orientation: Orientation) -> Self {
        Self {
            page: default_page_config(size, orientation),
            context: None,
            palette_id: None,
            palette_fallback: PaletteFallback::UseDefault,
            pagination: PaginationPolicy::default(),
        }
    }
}

/// Styled live-preview layout for one context.
pub fn preview(
    document: &MenuDocument,
    catalog: &PresetCatalog,
    preset_id: &str,
    context: &str,
    palette_id: Option<&str>,
    fallback: PaletteFallback,
) -> Result<StyledLayout<LayoutInstance>, LayoutError> {
    let preset = catalog.get(preset_id)?;
    let palette = resolve_palette(catalog, &preset.style, palette_id, fallback)?;
    let instance = generate_instance(document, catalog, preset_id, context)?;
    Ok(bind_style(instance, &preset.style, palette))
}

/// Styled paginated layout for fixed-size output.
pub fn export(
    document: &MenuDocument,
    catalog: &PresetCatalog,
    preset_id: &str,
    options: &ExportOptions,
) -> Result<StyledLayout<PaginatedLayout>, LayoutError> {
    let preset = catalog.get(preset_id)?;
    let context = options.context.as_deref().unwrap_or(PRINT);
    let spec = preset.grid_spec(context)?;
    let palette = resolve_palette(
        catalog,
        &preset.style,
        options.palette_id.as_deref(),
        options.palette_fallback,
    )?;

    let sections = generate(document, preset, context)?;
    let capacity: PageCapacity = options.page.capacity(spec);
    let pages = paginate_with_policy(&sections, capacity, options.pagination)?;
    let fill = analyze_pages(&pages, capacity);

    debug!(
        preset = %preset.id,
        context,
        orientation = %capacity.orientation,
        rows_per_page = capacity.rows_per_page,
        pages = pages.len(),
        "Paginated export"
    );

    let layout = PaginatedLayout {
        preset: preset.id.clone(),
        context: context.to_string(),
        page: options.page,
        orientation: capacity.orientation,
        rows_per_page: capacity.rows_per_page,
        pages,
        fill,
    };
    Ok(bind_style(layout, &preset.style, palette))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{Category, Item};
    use crate::presets::DESKTOP;

    fn document(sizes: &[usize]) -> MenuDocument {
        let categories: Vec<Category> = sizes
            .iter()
            .enumerate()
            .map(|(i, n)| {
                Category::new(
                    format!("Section {i}"),
                    (0..*n)
                        .map(|j| Item::new(format!("Dish {i}.{j}"), 9.5))
                        .collect(),
                )
            })
            .collect();
        MenuDocument::from_categories(&categories)
    }

    // ── preview ─────────────────────────────────────────────────────────────

    #[test]
    fn test_preview_binds_alternate_palette() {
        let catalog = PresetCatalog::builtin();
        let styled = preview(
            &document(&[5]),
            &catalog,
            "classic",
            DESKTOP,
            Some("sage"),
            PaletteFallback::UseDefault,
        )
        .unwrap();
        assert_eq!(styled.palette.id, "sage");
        assert_eq!(styled.layout.context, DESKTOP);
        assert_eq!(styled.layout.sections.len(), 1);
    }

    #[test]
    fn test_preview_palette_from_other_template_uses_default() {
        let catalog = PresetCatalog::builtin();
        let styled = preview(
            &document(&[2]),
            &catalog,
            "classic",
            DESKTOP,
            Some("midnight"),
            PaletteFallback::Strict,
        )
        .unwrap();
        assert_eq!(styled.palette.id, "ivory");
    }

    #[test]
    fn test_preview_strict_unknown_palette_fails() {
        let catalog = PresetCatalog::builtin();
        let err = preview(
            &document(&[2]),
            &catalog,
            "classic",
            DESKTOP,
            Some("neon"),
            PaletteFallback::Strict,
        )
        .unwrap_err();
        assert_eq!(err, LayoutError::UnknownPalette("neon".to_string()));
    }

    #[test]
    fn test_preview_json_is_flat() {
        let catalog = PresetCatalog::builtin();
        let styled = preview(
            &document(&[1]),
            &catalog,
            "bistro",
            DESKTOP,
            None,
            PaletteFallback::UseDefault,
        )
        .unwrap();
        let json = serde_json::to_value(&styled).unwrap();
        assert_eq!(json["context"], DESKTOP);
        assert_eq!(json["preset"], "bistro");
        assert_eq!(json["palette"]["id"], "chalkboard");
        assert!(json["sections"].is_array());
    }

    // ── export ──────────────────────────────────────────────────────────────

    #[test]
    fn test_export_defaults_to_print_context() {
        let catalog = PresetCatalog::builtin();
        let options = ExportOptions::new(PageSize::Letter, Orientation::Portrait);
        let styled = export(&document(&[6, 4]), &catalog, "classic", &options).unwrap();

        let layout = &styled.layout;
        assert_eq!(layout.context, PRINT);
        assert_eq!(layout.orientation, Orientation::Portrait);
        assert!(layout.rows_per_page > 0);
        assert_eq!(layout.fill.len(), layout.pages.len());

        let items: usize = layout
            .pages
            .iter()
            .map(|p| p.tiles.iter().filter(|t| t.is_item()).count())
            .sum();
        assert_eq!(items, 10);
    }

    #[test]
    fn test_export_long_menu_spans_pages() {
        let catalog = PresetCatalog::builtin();
        let options = ExportOptions::new(PageSize::A4, Orientation::Landscape);
        let styled = export(&document(&[60]), &catalog, "classic", &options).unwrap();
        let layout = &styled.layout;
        assert!(layout.pages.len() > 1);
        for page in &layout.pages {
            assert!(page.rows_used() <= layout.rows_per_page);
        }
        for (i, page) in layout.pages.iter().enumerate() {
            assert_eq!(page.number as usize, i + 1);
        }
    }

    #[test]
    fn test_export_unknown_context() {
        let catalog = PresetCatalog::builtin();
        let mut options = ExportOptions::new(PageSize::Letter, Orientation::Portrait);
        options.context = Some("tv".to_string());
        assert!(matches!(
            export(&document(&[1]), &catalog, "classic", &options),
            Err(LayoutError::InvalidContext { .. })
        ));
    }

    #[test]
    fn test_export_margin_too_large_is_capacity_error() {
        let catalog = PresetCatalog::builtin();
        let mut options = ExportOptions::new(PageSize::Letter, Orientation::Landscape);
        options.page.margin_pt = 300.0;
        assert!(matches!(
            export(&document(&[3]), &catalog, "classic", &options),
            Err(LayoutError::PageCapacity { .. })
        ));
    }
}
