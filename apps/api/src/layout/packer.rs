//! Layout Generator: packs a menu document into rectangular, non-overlapping sections.
//!
//! # Algorithm
//! 1. Optional masthead section built from the preset's static blocks.
//! 2. For each category in arena (pre-order) order: a full-width header on row 0, then each
//!    visible item placed greedily in row-major order at or after the running cursor.
//! 3. Every cell left empty inside the section's bounding rows becomes a `Filler` tile,
//!    so each section is a clean rectangle.
//! 4. Tiles are sorted row-major and the scope is re-validated before returning.
//!
//! The cursor only moves forward, so item order in the output always matches input order.

use tracing::debug;

use crate::errors::LayoutError;
use crate::layout::occupancy::{validate_scope, Occupancy};
use crate::layout::tile::{
    ImageSlot, LayoutInstance, Placement, Section, SectionKind, Tile, TileContent,
};
use crate::menu::{ItemEntry, MenuDocument};
use crate::presets::{
    ImageMode, Preset, PresetCatalog, SpanWrap, StaticBlock, StaticKind, TemplateStyle,
};

/// Number of distinct filler looks a template may style.
pub const FILLER_VARIANTS: u8 = 4;

/// Packs `document` for one context of `preset`.
pub fn generate(
    document: &MenuDocument,
    preset: &Preset,
    context: &str,
) -> Result<Vec<Section>, LayoutError> {
    let spec = preset.grid_spec(context)?;
    let columns = spec.columns;
    if columns == 0 {
        return Err(LayoutError::InvalidContext {
            preset: preset.id.clone(),
            context: context.to_string(),
        });
    }

    if document.categories().is_empty() || document.visible_item_count() == 0 {
        return Err(LayoutError::EmptyMenu);
    }

    let mut sections = Vec::with_capacity(document.categories().len() + 1);

    if let Some(masthead) = pack_masthead(document, preset, context, columns)? {
        sections.push(masthead);
    }

    for (section_index, category) in document.categories().iter().enumerate() {
        let items: Vec<&ItemEntry> = document.visible_items(category).collect();
        let mut packer = SectionPacker::new(columns, preset.packing.span_wrap);
        packer.place_header(&category.name);

        for (slot, entry) in items.iter().enumerate() {
            let (col_span, row_span) = preset.slot_span(section_index, slot, context);
            if col_span > columns {
                return Err(LayoutError::TileOverflow {
                    item: entry.item.name.clone(),
                    requested: col_span,
                    columns,
                    context: context.to_string(),
                });
            }
            let placement = packer.place(col_span.max(1), row_span.max(1) as u32);
            packer.push(Tile {
                placement,
                content: item_content(entry, &preset.style),
            });
        }

        let section = packer.finish(&category.name, SectionKind::Category, section_index);
        validate_scope(&section.name, &section.tiles, columns)?;
        debug!(
            section = %section.name,
            items = items.len(),
            rows = section.rows(),
            tiles = section.tiles.len(),
            "Packed section"
        );
        sections.push(section);
    }

    Ok(sections)
}

/// Looks up the preset and wraps the packed sections as a live-preview instance.
pub fn generate_instance(
    document: &MenuDocument,
    catalog: &PresetCatalog,
    preset_id: &str,
    context: &str,
) -> Result<LayoutInstance, LayoutError> {
    let preset = catalog.get(preset_id)?;
    let sections = generate(document, preset, context)?;
    Ok(LayoutInstance {
        context: context.to_string(),
        preset: preset.id.clone(),
        sections,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Section packer
// ────────────────────────────────────────────────────────────────────────────

struct SectionPacker {
    occupancy: Occupancy,
    span_wrap: SpanWrap,
    cursor_col: u16,
    cursor_row: u32,
    tiles: Vec<Tile>,
}

impl SectionPacker {
    fn new(columns: u16, span_wrap: SpanWrap) -> Self {
        Self {
            occupancy: Occupancy::new(columns),
            span_wrap,
            cursor_col: 0,
            cursor_row: 0,
            tiles: Vec::new(),
        }
    }

    fn place_header(&mut self, label: &str) {
        let header = Tile::section_header(label, self.occupancy.columns(), self.cursor_row);
        self.push(header);
        self.cursor_row += 1;
        self.cursor_col = 0;
    }

    /// Chooses a placement for a tile of the requested span. `col_span` must not exceed
    /// the grid width.
    fn place(&mut self, col_span: u16, row_span: u32) -> Placement {
        let mut width = col_span;

        if self.span_wrap == SpanWrap::ShrinkToFit && width > 1 {
            if let Some((col, row)) = self.occupancy.first_fit(self.cursor_col, self.cursor_row, 1, 1)
            {
                let run = self.occupancy.free_run(col, row, width);
                width = (1..=run.max(1))
                    .rev()
                    .find(|w| self.occupancy.is_free(col, row, *w, row_span))
                    .unwrap_or(1);
            }
        }

        let (col, row) = self
            .occupancy
            .first_fit(self.cursor_col, self.cursor_row, width, row_span)
            .unwrap_or((0, self.occupancy.rows()));

        let placement = Placement::new(col, row, width, row_span);
        self.cursor_row = row;
        self.cursor_col = col + width;
        if self.cursor_col >= self.occupancy.columns() {
            self.cursor_col = 0;
            self.cursor_row += 1;
        }
        placement
    }

    fn push(&mut self, tile: Tile) {
        self.occupancy.mark(&tile.placement);
        self.tiles.push(tile);
    }

    /// Fills every hole with filler tiles and returns the rectangular section.
    fn finish(mut self, name: &str, kind: SectionKind, section_index: usize) -> Section {
        let rows = self.occupancy.rows();
        for (col, row) in self.occupancy.holes(0, rows) {
            let variant = filler_variant(section_index, col, row);
            self.tiles.push(Tile::filler(col, row, variant));
        }
        self.tiles
            .sort_by_key(|t| (t.placement.row, t.placement.col));

        Section {
            name: name.to_string(),
            kind,
            tiles: self.tiles,
        }
    }
}

/// Position-derived filler style. Never random, so identical inputs give identical output.
pub fn filler_variant(section_index: usize, col: u16, row: u32) -> u8 {
    let mix = (section_index as u64)
        .wrapping_mul(7)
        .wrapping_add(row as u64 * 31)
        .wrapping_add(col as u64 * 17);
    (mix % FILLER_VARIANTS as u64) as u8
}

fn item_content(entry: &ItemEntry, style: &TemplateStyle) -> TileContent {
    let image = match style.image_mode {
        ImageMode::None => ImageSlot::Hidden,
        ImageMode::Thumbnail | ImageMode::Hero => match entry.item.image_ref.as_deref() {
            Some(image_ref) if !image_ref.trim().is_empty() => ImageSlot::Populated {
                image_ref: image_ref.to_string(),
            },
            _ => ImageSlot::Placeholder,
        },
    };

    TileContent::MenuItem {
        item_id: entry.id,
        name: entry.item.name.clone(),
        price: entry.item.price,
        description: entry.item.description.clone(),
        image,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Masthead
// ────────────────────────────────────────────────────────────────────────────

fn masthead_content(block: &StaticBlock, document: &MenuDocument) -> Option<String> {
    if let Some(content) = &block.content {
        return Some(content.clone());
    }
    match block.kind {
        StaticKind::Title => document.title.clone(),
        StaticKind::Logo => document.logo_ref.clone(),
        StaticKind::TextBlock => document.footer_text.clone(),
        StaticKind::QrCode => document.qr_target.clone(),
        StaticKind::ImageDecoration => None,
    }
}

/// Packs the preset's masthead blocks. Blocks without content are skipped; returns
/// `None` when nothing is left.
fn pack_masthead(
    document: &MenuDocument,
    preset: &Preset,
    context: &str,
    columns: u16,
) -> Result<Option<Section>, LayoutError> {
    let blocks: Vec<(&StaticBlock, String)> = preset
        .masthead
        .iter()
        .filter_map(|b| masthead_content(b, document).map(|c| (b, c)))
        .filter(|(_, c)| !c.trim().is_empty())
        .collect();

    if blocks.is_empty() {
        return Ok(None);
    }

    let mut packer = SectionPacker::new(columns, preset.packing.span_wrap);
    for (block, content) in blocks {
        let col_span = block.col_span.unwrap_or(columns).max(1);
        if col_span > columns {
            return Err(LayoutError::TileOverflow {
                item: format!("{:?}", block.kind),
                requested: col_span,
                columns,
                context: context.to_string(),
            });
        }
        let placement = packer.place(col_span, 1);
        packer.push(Tile {
            placement,
            content: TileContent::Static {
                kind: block.kind,
                content,
            },
        });
    }

    let name = document
        .title
        .clone()
        .unwrap_or_else(|| "masthead".to_string());
    let section = packer.finish(&name, SectionKind::Masthead, usize::MAX);
    validate_scope(&section.name, &section.tiles, columns)?;
    Ok(Some(section))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
