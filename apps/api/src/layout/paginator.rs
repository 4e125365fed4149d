//! Paginator: slices packed sections into capacity-bounded pages for fixed-size exports.
//!
//! # Policy
//! - A section that fits the rows left on the current page goes there whole.
//! - Otherwise, if it fits a fresh page whole, it starts a new page (sections are not
//!   fragmented needlessly).
//! - Otherwise it is split. Each chunk carries the section header (a copy flagged
//!   `continued` after the first chunk) plus at least one row band of items.
//!
//! Splits only happen on row boundaries that no tile crosses, so row-spanning featured
//! tiles are never cut. Rows on a page are page-relative.
//!
//! A header-only section (an empty category) is kept on the page where the next section
//! starts, so a page never ends on a header with nothing under it. Only trailing empty
//! categories are placed on their own.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::LayoutError;
use crate::layout::page_size::Orientation;
use crate::layout::tile::{Section, Tile, TileContent};

/// Rows available on one page. Derived from page geometry outside the paginator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCapacity {
    pub orientation: Orientation,
    pub rows_per_page: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationPolicy {
    /// Move a section that fits a fresh page to a new page rather than splitting it.
    pub keep_sections_whole: bool,
    /// Re-emit the section header, flagged `continued`, on continuation pages.
    pub repeat_header_on_continuation: bool,
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self {
            keep_sections_whole: true,
            repeat_header_on_continuation: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLayout {
    /// 1-based page number.
    pub number: u32,
    pub orientation: Orientation,
    pub tiles: Vec<Tile>,
}

impl PageLayout {
    pub fn rows_used(&self) -> u32 {
        self.tiles
            .iter()
            .map(|t| t.placement.row_end())
            .max()
            .unwrap_or(0)
    }
}

/// Paginates with the default policy.
pub fn paginate(
    sections: &[Section],
    capacity: PageCapacity,
) -> Result<Vec<PageLayout>, LayoutError> {
    paginate_with_policy(sections, capacity, PaginationPolicy::default())
}

pub fn paginate_with_policy(
    sections: &[Section],
    capacity: PageCapacity,
    policy: PaginationPolicy,
) -> Result<Vec<PageLayout>, LayoutError> {
    let mut pages = PageBuilder::new(capacity);
    // Header-only sections wait here so they land on the same page as the next
    // section's first items.
    let mut pending: Vec<&Section> = Vec::new();

    for section in sections {
        let total = section.rows();
        if total == 0 {
            continue;
        }
        if section.is_header_only() {
            pending.push(section);
            continue;
        }

        let lead = rows_of(&pending);
        if lead + total <= pages.remaining() {
            pages.place_sections(pending.drain(..));
            pages.place_band(section.tiles.iter(), 0, total);
            continue;
        }

        if policy.keep_sections_whole && lead + total <= capacity.rows_per_page {
            pages.break_page();
            pages.place_sections(pending.drain(..));
            pages.place_band(section.tiles.iter(), 0, total);
            continue;
        }

        split_section(section, &mut pages, policy, &mut pending)?;
    }

    // Empty categories at the end of the document have nothing left to precede.
    flush_pending(&mut pages, &mut pending)?;

    Ok(pages.finish())
}

fn rows_of(sections: &[&Section]) -> u32 {
    sections.iter().map(|s| s.rows()).sum()
}

/// Places held header-only sections on their own, breaking pages as needed.
fn flush_pending(pages: &mut PageBuilder, pending: &mut Vec<&Section>) -> Result<(), LayoutError> {
    for section in pending.drain(..) {
        let rows = section.rows();
        if rows > pages.capacity.rows_per_page {
            return Err(LayoutError::PageCapacity {
                section: section.name.clone(),
                rows_per_page: pages.capacity.rows_per_page,
            });
        }
        if rows > pages.remaining() {
            pages.break_page();
        }
        pages.place_band(section.tiles.iter(), 0, rows);
    }
    Ok(())
}

/// Places a section that cannot go whole onto the current page. Held header-only
/// sections are placed directly ahead of the first chunk.
fn split_section<'a>(
    section: &Section,
    pages: &mut PageBuilder,
    policy: PaginationPolicy,
    pending: &mut Vec<&'a Section>,
) -> Result<(), LayoutError> {
    let capacity = pages.capacity.rows_per_page;
    let header = section.header();
    let header_rows = header.map_or(0, |h| h.placement.row_span);
    let total = section.rows();
    let body: Vec<&Tile> = section
        .tiles
        .iter()
        .filter(|t| !t.is_header())
        .collect();

    let capacity_error = || LayoutError::PageCapacity {
        section: section.name.clone(),
        rows_per_page: capacity,
    };

    let breaks = safe_breaks(&body, header_rows, total);
    let Some(&first_break) = breaks.first() else {
        flush_pending(pages, pending)?;
        if total > capacity {
            return Err(capacity_error());
        }
        pages.break_page();
        pages.place_band(section.tiles.iter(), 0, total);
        return Ok(());
    };

    let mut start = header_rows;
    let mut chunk = 0u32;
    while start < total {
        let lead = if chunk == 0 { rows_of(pending) } else { 0 };
        let chunk_header_rows = if chunk == 0 || policy.repeat_header_on_continuation {
            header_rows
        } else {
            0
        };

        let min_end = if chunk == 0 {
            first_break
        } else {
            breaks.iter().copied().find(|b| *b > start).unwrap_or(total)
        };
        if lead + chunk_header_rows + (min_end - start) > pages.remaining() {
            if !pages.is_fresh() {
                pages.break_page();
                continue;
            }
            if lead == 0 {
                return Err(capacity_error());
            }
            // Too many held headers to share a page with this section's first band:
            // the earliest ones go on a page of their own.
            let need = chunk_header_rows + (min_end - start);
            let mut keep = pending.len();
            while keep > 0 && rows_of(&pending[pending.len() - keep..]) + need > capacity {
                keep -= 1;
            }
            let release = pending.len() - keep;
            let mut released: Vec<&Section> = pending.drain(..release).collect();
            flush_pending(pages, &mut released)?;
            pages.break_page();
            continue;
        }

        pages.place_sections(pending.drain(..));
        let budget = pages.remaining() - chunk_header_rows;
        let end = breaks
            .iter()
            .copied()
            .filter(|b| *b > start && *b - start <= budget)
            .max()
            .unwrap_or(min_end);

        if chunk_header_rows > 0 {
            if let Some(header) = header {
                let mut tile = header.clone();
                if chunk > 0 {
                    if let TileContent::SectionHeader { continued, .. } = &mut tile.content {
                        *continued = true;
                    }
                }
                pages.place_tile(&tile, 0);
            }
        }
        pages.skip(chunk_header_rows);
        pages.place_band(body.iter().copied(), start, end);

        debug!(
            section = %section.name,
            chunk,
            rows = end - start,
            page = pages.page_number(),
            "Placed section chunk"
        );

        start = end;
        chunk += 1;
        if start < total {
            pages.break_page();
        }
    }

    Ok(())
}

/// Row boundaries (section-relative, exclusive ends) after the header where the body can
/// be cut without splitting a tile. Always ends with `total` when the body is non-empty.
fn safe_breaks(body: &[&Tile], header_rows: u32, total: u32) -> Vec<u32> {
    ((header_rows + 1)..=total)
        .filter(|r| {
            body.iter()
                .all(|t| !(t.placement.row < *r && t.placement.row_end() > *r))
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Page builder
// ────────────────────────────────────────────────────────────────────────────

struct PageBuilder {
    capacity: PageCapacity,
    pages: Vec<PageLayout>,
    tiles: Vec<Tile>,
    cursor: u32,
}

impl PageBuilder {
    fn new(capacity: PageCapacity) -> Self {
        Self {
            capacity,
            pages: Vec::new(),
            tiles: Vec::new(),
            cursor: 0,
        }
    }

    fn remaining(&self) -> u32 {
        self.capacity.rows_per_page.saturating_sub(self.cursor)
    }

    fn is_fresh(&self) -> bool {
        self.cursor == 0
    }

    fn page_number(&self) -> u32 {
        self.pages.len() as u32 + 1
    }

    /// Copies the tiles whose rows lie in `[from, to)` onto the page at the cursor.
    fn place_band<'a>(&mut self, tiles: impl Iterator<Item = &'a Tile>, from: u32, to: u32) {
        for tile in tiles.filter(|t| t.placement.row >= from && t.placement.row < to) {
            self.tiles.push(tile.moved(from, self.cursor));
        }
        self.cursor += to - from;
    }

    fn place_sections<'a>(&mut self, sections: impl Iterator<Item = &'a Section>) {
        for section in sections {
            let rows = section.rows();
            self.place_band(section.tiles.iter(), 0, rows);
        }
    }

    fn place_tile(&mut self, tile: &Tile, from: u32) {
        self.tiles.push(tile.moved(from, self.cursor));
    }

    fn skip(&mut self, rows: u32) {
        self.cursor += rows;
    }

    /// Closes the current page if it has content.
    fn break_page(&mut self) {
        if self.tiles.is_empty() {
            return;
        }
        let number = self.page_number();
        debug!(page = number, rows = self.cursor, "Page break");
        self.pages.push(PageLayout {
            number,
            orientation: self.capacity.orientation,
            tiles: std::mem::take(&mut self.tiles),
        });
        self.cursor = 0;
    }

    fn finish(mut self) -> Vec<PageLayout> {
        self.break_page();
        self.pages
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
