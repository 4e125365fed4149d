// Preset catalog and style binding.
// The catalog is loaded once at startup and shared read-only across requests.

pub mod catalog;
pub mod grid;
pub mod handlers;
pub mod style;

pub use catalog::{catalog, init_catalog, PresetCatalog, PresetSummary};
pub use grid::{
    FeaturedSlot, GridConfig, GridSpec, PackingPolicy, Preset, SpanWrap, StaticBlock, StaticKind,
    DESKTOP, MOBILE, PRINT,
};
pub use style::{
    bind_style, resolve_palette, ColorPalette, ImageMode, ItemCardStyle, PaletteFallback,
    StyledLayout, TemplateStyle,
};
