//! Cell occupancy for one grid scope (a section or a page).

use std::collections::HashSet;

use crate::errors::LayoutError;
use crate::layout::tile::{Placement, Tile};

/// Row-major occupancy bitmap that grows downward as tiles are placed.
#[derive(Debug, Clone)]
pub struct Occupancy {
    columns: u16,
    cells: Vec<bool>,
}

impl Occupancy {
    pub fn new(columns: u16) -> Self {
        Self {
            columns,
            cells: Vec::new(),
        }
    }

    pub fn columns(&self) -> u16 {
        self.columns
    }

    /// Number of rows touched so far.
    pub fn rows(&self) -> u32 {
        (self.cells.len() / self.columns.max(1) as usize) as u32
    }

    pub fn is_occupied(&self, col: u16, row: u32) -> bool {
        self.index(col, row)
            .and_then(|i| self.cells.get(i))
            .copied()
            .unwrap_or(false)
    }

    /// True if every cell of the rectangle is inside the grid width and unoccupied.
    pub fn is_free(&self, col: u16, row: u32, col_span: u16, row_span: u32) -> bool {
        if col as u32 + col_span as u32 > self.columns as u32 {
            return false;
        }
        Placement::new(col, row, col_span, row_span)
            .cells()
            .all(|(c, r)| !self.is_occupied(c, r))
    }

    pub fn mark(&mut self, placement: &Placement) {
        self.grow_to(placement.row_end());
        for (col, row) in placement.cells() {
            if let Some(i) = self.index(col, row) {
                self.cells[i] = true;
            }
        }
    }

    /// First position at or after `(col, row)` in row-major order where the rectangle fits.
    ///
    /// Only positions that keep row-major order are considered, so a tile never lands
    /// before one placed earlier. Returns `None` if `col_span` exceeds the grid width.
    pub fn first_fit(
        &self,
        col: u16,
        row: u32,
        col_span: u16,
        row_span: u32,
    ) -> Option<(u16, u32)> {
        if col_span == 0 || col_span > self.columns {
            return None;
        }
        let last_col = self.columns - col_span;
        let mut r = row;
        let mut start = col;
        loop {
            for c in start..=last_col {
                if self.is_free(c, r, col_span, row_span) {
                    return Some((c, r));
                }
            }
            // Beyond the rows touched so far everything is free, so this terminates.
            r += 1;
            start = 0;
        }
    }

    /// Length of the free run starting at `(col, row)`, capped at `max`.
    pub fn free_run(&self, col: u16, row: u32, max: u16) -> u16 {
        (col..self.columns)
            .take(max as usize)
            .take_while(|c| !self.is_occupied(*c, row))
            .count() as u16
    }

    /// Unoccupied cells in rows `[from_row, to_row)`, row-major.
    pub fn holes(&self, from_row: u32, to_row: u32) -> Vec<(u16, u32)> {
        (from_row..to_row)
            .flat_map(|row| (0..self.columns).map(move |col| (col, row)))
            .filter(|(col, row)| !self.is_occupied(*col, *row))
            .collect()
    }

    fn grow_to(&mut self, rows: u32) {
        let needed = rows as usize * self.columns as usize;
        if self.cells.len() < needed {
            self.cells.resize(needed, false);
        }
    }

    fn index(&self, col: u16, row: u32) -> Option<usize> {
        if col >= self.columns {
            return None;
        }
        Some(row as usize * self.columns as usize + col as usize)
    }
}

/// Checks the column bound and no-overlap invariants for one grid scope.
pub fn validate_scope(scope: &str, tiles: &[Tile], columns: u16) -> Result<(), LayoutError> {
    let mut seen: HashSet<(u16, u32)> = HashSet::new();
    for tile in tiles {
        let p = &tile.placement;
        if p.col_span == 0 || p.col_end() > columns as u32 {
            return Err(LayoutError::TileOverflow {
                item: tile.label(),
                requested: p.col_span,
                columns,
                context: scope.to_string(),
            });
        }
        for (col, row) in p.cells() {
            if !seen.insert((col, row)) {
                return Err(LayoutError::TileOverlap {
                    scope: scope.to_string(),
                    col,
                    row,
                });
            }
        }
    }
    Ok(())
}
