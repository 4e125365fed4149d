//! Tile vocabulary shared by the packer, the paginator and the renderers.
//!
//! Every tile carries the same `Placement`; the variant-specific payload is a tagged enum
//! so consumers dispatch with a single `match`. Serialized tiles look like
//! `{"type": "menu_item", "col": 0, "row": 1, "colSpan": 1, "rowSpan": 1, ...}`.

use serde::{Deserialize, Serialize};

use crate::menu::ItemId;
use crate::presets::StaticKind;

// ────────────────────────────────────────────────────────────────────────────
// Placement
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub col: u16,
    pub row: u32,
    pub col_span: u16,
    pub row_span: u32,
}

impl Placement {
    pub fn new(col: u16, row: u32, col_span: u16, row_span: u32) -> Self {
        Self {
            col,
            row,
            col_span,
            row_span,
        }
    }

    /// Exclusive end column.
    pub fn col_end(&self) -> u32 {
        self.col as u32 + self.col_span as u32
    }

    /// Exclusive end row.
    pub fn row_end(&self) -> u32 {
        self.row + self.row_span
    }

    /// Every `(col, row)` cell the placement covers.
    pub fn cells(&self) -> impl Iterator<Item = (u16, u32)> + '_ {
        (self.row..self.row_end())
            .flat_map(move |row| (self.col..self.col + self.col_span).map(move |col| (col, row)))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tile payloads
// ────────────────────────────────────────────────────────────────────────────

/// Whether the template's image slot on an item card has a real image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ImageSlot {
    /// The template shows no images.
    Hidden,
    /// The template wants an image but the item has none; the renderer draws a placeholder.
    Placeholder,
    Populated {
        #[serde(rename = "imageRef")]
        image_ref: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum TileContent {
    Static {
        kind: StaticKind,
        content: String,
    },
    SectionHeader {
        label: String,
        /// Set on the repeated header at the top of a continuation page.
        #[serde(default)]
        continued: bool,
    },
    MenuItem {
        item_id: ItemId,
        name: String,
        price: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        image: ImageSlot,
    },
    Filler {
        variant: u8,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    #[serde(flatten)]
    pub placement: Placement,
    #[serde(flatten)]
    pub content: TileContent,
}

impl Tile {
    pub fn section_header(label: impl Into<String>, columns: u16, row: u32) -> Self {
        Tile {
            placement: Placement::new(0, row, columns, 1),
            content: TileContent::SectionHeader {
                label: label.into(),
                continued: false,
            },
        }
    }

    pub fn filler(col: u16, row: u32, variant: u8) -> Self {
        Tile {
            placement: Placement::new(col, row, 1, 1),
            content: TileContent::Filler { variant },
        }
    }

    pub fn is_header(&self) -> bool {
        matches!(self.content, TileContent::SectionHeader { .. })
    }

    pub fn is_continued_header(&self) -> bool {
        matches!(
            self.content,
            TileContent::SectionHeader {
                continued: true,
                ..
            }
        )
    }

    pub fn is_item(&self) -> bool {
        matches!(self.content, TileContent::MenuItem { .. })
    }

    pub fn is_filler(&self) -> bool {
        matches!(self.content, TileContent::Filler { .. })
    }

    pub fn item_id(&self) -> Option<ItemId> {
        match &self.content {
            TileContent::MenuItem { item_id, .. } => Some(*item_id),
            _ => None,
        }
    }

    /// Human-readable label used in error messages.
    pub fn label(&self) -> String {
        match &self.content {
            TileContent::Static { kind, .. } => format!("{kind:?}"),
            TileContent::SectionHeader { label, .. } => label.clone(),
            TileContent::MenuItem { name, .. } => name.clone(),
            TileContent::Filler { .. } => "filler".to_string(),
        }
    }

    /// Copy of this tile moved vertically so that `from_row` lands on `to_row`.
    pub fn moved(&self, from_row: u32, to_row: u32) -> Self {
        debug_assert!(from_row <= self.placement.row, "from_row must not exceed the tile row");
        let mut tile = self.clone();
        tile.placement.row = self.placement.row.saturating_sub(from_row) + to_row;
        tile
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sections and layouts
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Static decorations ahead of the first category. Has no header.
    Masthead,
    Category,
}

/// One rectangular grid scope. Rows are local to the section (header on row 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub name: String,
    pub kind: SectionKind,
    pub tiles: Vec<Tile>,
}

impl Section {
    /// Rows the section occupies when laid out undivided.
    pub fn rows(&self) -> u32 {
        self.tiles
            .iter()
            .map(|t| t.placement.row_end())
            .max()
            .unwrap_or(0)
    }

    /// The section header, if the section starts with one.
    pub fn header(&self) -> Option<&Tile> {
        self.tiles.first().filter(|t| t.is_header())
    }

    /// True for a category with no visible items: the header is the only tile.
    pub fn is_header_only(&self) -> bool {
        self.header().is_some() && self.tiles.len() == 1
    }

    pub fn item_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_item()).count()
    }
}

/// Live preview output for one context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutInstance {
    pub context: String,
    pub preset: String,
    pub sections: Vec<Section>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_cells_cover_span() {
        let p = Placement::new(1, 2, 2, 2);
        let cells: Vec<(u16, u32)> = p.cells().collect();
        assert_eq!(cells, vec![(1, 2), (2, 2), (1, 3), (2, 3)]);
        assert_eq!(p.col_end(), 3);
        assert_eq!(p.row_end(), 4);
    }

    #[test]
    fn test_tile_json_shape() {
        let tile = Tile {
            placement: Placement::new(0, 1, 1, 1),
            content: TileContent::MenuItem {
                item_id: ItemId(3),
                name: "Soup".to_string(),
                price: 6.5,
                description: None,
                image: ImageSlot::Placeholder,
            },
        };
        let json = serde_json::to_value(&tile).unwrap();
        assert_eq!(json["type"], "menu_item");
        assert_eq!(json["col"], 0);
        assert_eq!(json["row"], 1);
        assert_eq!(json["colSpan"], 1);
        assert_eq!(json["rowSpan"], 1);
        assert_eq!(json["itemId"], 3);
        assert_eq!(json["image"]["state"], "placeholder");
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_tile_json_round_trips_header() {
        let tile = Tile::section_header("MAINS", 4, 0);
        let json = serde_json::to_string(&tile).unwrap();
        let back: Tile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tile);
        assert!(json.contains("\"type\":\"section_header\""));
    }

    #[test]
    fn test_moved_shifts_row_only() {
        let tile = Tile::filler(2, 5, 1);
        let moved = tile.moved(4, 10);
        assert_eq!(moved.placement, Placement::new(2, 11, 1, 1));
    }

    #[test]
    fn test_section_rows_and_header() {
        let section = Section {
            name: "MAINS".to_string(),
            kind: SectionKind::Category,
            tiles: vec![Tile::section_header("MAINS", 2, 0), Tile::filler(0, 1, 0)],
        };
        assert_eq!(section.rows(), 2);
        assert!(section.header().is_some());
        assert_eq!(section.item_count(), 0);
        assert!(!section.is_header_only());
    }

    #[test]
    fn test_header_only_section() {
        let section = Section {
            name: "Specials".to_string(),
            kind: SectionKind::Category,
            tiles: vec![Tile::section_header("Specials", 2, 0)],
        };
        assert!(section.is_header_only());
        assert_eq!(section.rows(), 1);
    }

    #[test]
    fn test_moved_to_page_top() {
        let tile = Tile::filler(1, 7, 0);
        assert_eq!(tile.moved(7, 0).placement.row, 0);
    }
}
