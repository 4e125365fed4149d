use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::LayoutError;
use crate::presets::style::TemplateStyle;

pub const MOBILE: &str = "mobile";
pub const DESKTOP: &str = "desktop";
pub const PRINT: &str = "print";

/// Grid parameters for one template in one rendering context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSpec {
    pub columns: u16,
    pub gap_px: u16,
    pub section_spacing_px: u16,
    /// Estimated printed height of one grid row, used to derive page capacity.
    pub row_height_pt: f32,
}

/// Per-context grid specs, keyed by context name ("mobile", "desktop", "print", ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GridConfig {
    pub contexts: BTreeMap<String, GridSpec>,
}

impl GridConfig {
    pub fn with_context(mut self, context: &str, spec: GridSpec) -> Self {
        self.contexts.insert(context.to_string(), spec);
        self
    }
}

/// Kinds of non-item decoration a template can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaticKind {
    Title,
    Logo,
    TextBlock,
    ImageDecoration,
    QrCode,
}

/// One block of the masthead that precedes the first category.
///
/// `content` overrides document-supplied content (title, logo, footer text, QR target).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticBlock {
    pub kind: StaticKind,
    /// `None` spans the full width of the context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col_span: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// An item slot the template renders wider and/or taller than a plain card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedSlot {
    /// Index of the category section this applies to; `None` applies to every section.
    #[serde(default)]
    pub section: Option<usize>,
    /// Position of the item among the section's visible items.
    pub slot: usize,
    pub col_span: u16,
    #[serde(default = "one")]
    pub row_span: u16,
    /// Contexts the slot is featured in; empty means all contexts.
    #[serde(default)]
    pub contexts: Vec<String>,
}

fn one() -> u16 {
    1
}

/// What the packer does when a wide tile does not fit the rest of the current row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanWrap {
    /// Move the tile down to the next row with room; the skipped cells become filler.
    #[default]
    NextRow,
    /// Narrow the tile to the free run left in the current row.
    ShrinkToFit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackingPolicy {
    #[serde(default)]
    pub span_wrap: SpanWrap,
}

/// A named template: grid geometry per context plus visual style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub id: String,
    pub name: String,
    pub grid_config: GridConfig,
    pub style: TemplateStyle,
    #[serde(default)]
    pub featured: Vec<FeaturedSlot>,
    #[serde(default)]
    pub masthead: Vec<StaticBlock>,
    #[serde(default)]
    pub packing: PackingPolicy,
}

impl Preset {
    /// Grid spec for a context, or `InvalidContext` if the template does not define it.
    pub fn grid_spec(&self, context: &str) -> Result<&GridSpec, LayoutError> {
        self.grid_config
            .contexts
            .get(context)
            .ok_or_else(|| LayoutError::InvalidContext {
                preset: self.id.clone(),
                context: context.to_string(),
            })
    }

    pub fn contexts(&self) -> impl Iterator<Item = &str> {
        self.grid_config.contexts.keys().map(String::as_str)
    }

    /// Requested `(col_span, row_span)` for an item slot. The first matching featured
    /// slot wins; unfeatured slots are 1×1.
    pub fn slot_span(&self, section: usize, slot: usize, context: &str) -> (u16, u16) {
        self.featured
            .iter()
            .find(|f| {
                f.slot == slot
                    && f.section.map_or(true, |s| s == section)
                    && (f.contexts.is_empty() || f.contexts.iter().any(|c| c == context))
            })
            .map(|f| (f.col_span, f.row_span.max(1)))
            .unwrap_or((1, 1))
    }
}
