//! Template styles and the palette binder.
//!
//! Everything here is decided before rendering: the renderer receives a resolved
//! palette next to the placed tiles and only looks values up.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::LayoutError;
use crate::presets::catalog::PresetCatalog;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorPalette {
    pub id: String,
    pub name: String,
    pub background: String,
    pub surface: String,
    pub text: String,
    pub accent: String,
    pub muted: String,
}

/// Visual treatment of a menu item card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCardStyle {
    Bordered,
    Minimal,
    PhotoCard,
}

/// Where (and whether) item photos appear on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageMode {
    None,
    Thumbnail,
    Hero,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateStyle {
    pub default_palette: ColorPalette,
    #[serde(default)]
    pub alternates: Vec<ColorPalette>,
    pub item_card: ItemCardStyle,
    pub image_mode: ImageMode,
}

impl TemplateStyle {
    /// Palette with the given id if this template offers it (default included).
    pub fn palette(&self, id: &str) -> Option<&ColorPalette> {
        if self.default_palette.id == id {
            return Some(&self.default_palette);
        }
        self.alternates.iter().find(|p| p.id == id)
    }

    pub fn palette_ids(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.default_palette.id.as_str())
            .chain(self.alternates.iter().map(|p| p.id.as_str()))
    }
}

/// How to treat a requested palette id that this template does not offer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaletteFallback {
    /// Use the template's default palette.
    #[default]
    UseDefault,
    /// Fail with `UnknownPalette` if the id exists in no template at all.
    Strict,
}

/// Resolves the active palette for a template.
///
/// - No id requested: the default palette.
/// - Id offered by this template: that palette.
/// - Id known to another template: the default palette (the id is valid, just not here).
/// - Id known nowhere: the default palette, or `UnknownPalette` under `PaletteFallback::Strict`.
pub fn resolve_palette(
    catalog: &PresetCatalog,
    style: &TemplateStyle,
    palette_id: Option<&str>,
    fallback: PaletteFallback,
) -> Result<ColorPalette, LayoutError> {
    let Some(id) = palette_id else {
        return Ok(style.default_palette.clone());
    };

    if let Some(palette) = style.palette(id) {
        return Ok(palette.clone());
    }

    if catalog.palette_exists(id) {
        debug!(
            palette = id,
            default = %style.default_palette.id,
            "Palette belongs to another template, using default"
        );
        return Ok(style.default_palette.clone());
    }

    match fallback {
        PaletteFallback::Strict => Err(LayoutError::UnknownPalette(id.to_string())),
        PaletteFallback::UseDefault => {
            warn!(
                palette = id,
                default = %style.default_palette.id,
                "Unknown palette requested, using default"
            );
            Ok(style.default_palette.clone())
        }
    }
}

/// A layout (live instance or paginated pages) with its resolved style attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyledLayout<T> {
    pub palette: ColorPalette,
    pub item_card: ItemCardStyle,
    pub image_mode: ImageMode,
    #[serde(flatten)]
    pub layout: T,
}

pub fn bind_style<T>(layout: T, style: &TemplateStyle, palette: ColorPalette) -> StyledLayout<T> {
    StyledLayout {
        palette,
        item_card: style.item_card,
        image_mode: style.image_mode,
        layout,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn palette(id: &str) -> ColorPalette {
        ColorPalette {
            id: id.to_string(),
            name: id.to_uppercase(),
            background: "#ffffff".to_string(),
            surface: "#f4f4f4".to_string(),
            text: "#111111".to_string(),
            accent: "#aa3300".to_string(),
            muted: "#777777".to_string(),
        }
    }

    pub(crate) fn sample_style() -> TemplateStyle {
        TemplateStyle {
            default_palette: palette("paper"),
            alternates: vec![palette("ink")],
            item_card: ItemCardStyle::Bordered,
            image_mode: ImageMode::Thumbnail,
        }
    }

    #[test]
    fn test_no_palette_id_uses_default() {
        let catalog = PresetCatalog::builtin();
        let resolved =
            resolve_palette(&catalog, &sample_style(), None, PaletteFallback::Strict).unwrap();
        assert_eq!(resolved.id, "paper");
    }

    #[test]
    fn test_named_alternate_is_returned() {
        let catalog = PresetCatalog::builtin();
        let resolved = resolve_palette(
            &catalog,
            &sample_style(),
            Some("ink"),
            PaletteFallback::Strict,
        )
        .unwrap();
        assert_eq!(resolved.id, "ink");
    }

    #[test]
    fn test_palette_from_other_template_falls_back_even_when_strict() {
        let catalog = PresetCatalog::builtin();
        // "sage" is an alternate of the built-in classic template.
        let resolved = resolve_palette(
            &catalog,
            &sample_style(),
            Some("sage"),
            PaletteFallback::Strict,
        )
        .unwrap();
        assert_eq!(resolved.id, "paper");
    }

    #[test]
    fn test_unknown_palette_strict_errors() {
        let catalog = PresetCatalog::builtin();
        let err = resolve_palette(
            &catalog,
            &sample_style(),
            Some("neon"),
            PaletteFallback::Strict,
        )
        .unwrap_err();
        assert_eq!(err, LayoutError::UnknownPalette("neon".to_string()));
    }

    #[test]
    fn test_unknown_palette_lenient_uses_default() {
        let catalog = PresetCatalog::builtin();
        let resolved = resolve_palette(
            &catalog,
            &sample_style(),
            Some("neon"),
            PaletteFallback::UseDefault,
        )
        .unwrap();
        assert_eq!(resolved.id, "paper");
    }

    #[test]
    fn test_bind_style_flattens_layout() {
        #[derive(Serialize)]
        struct Dummy {
            context: &'static str,
        }
        let style = sample_style();
        let styled = bind_style(Dummy { context: "mobile" }, &style, palette("ink"));
        let json = serde_json::to_value(&styled).unwrap();
        assert_eq!(json["context"], "mobile");
        assert_eq!(json["palette"]["id"], "ink");
        assert_eq!(json["itemCard"], "bordered");
        assert_eq!(json["imageMode"], "thumbnail");
    }
}
