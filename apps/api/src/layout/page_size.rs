//! Physical page table used to derive page capacity for fixed-page exports.
//!
//! Dimensions are in PostScript points (1/72 in). Grid gaps are specified in CSS pixels
//! and converted at 0.75 pt/px.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::layout::paginator::PageCapacity;
use crate::presets::GridSpec;

const PT_PER_PX: f32 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSize {
    Letter,
    A4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl PageSize {
    /// `(width, height)` in portrait orientation.
    pub fn portrait_dimensions_pt(self) -> (f32, f32) {
        match self {
            PageSize::Letter => (612.0, 792.0),
            PageSize::A4 => (595.28, 841.89),
        }
    }

    pub fn dimensions_pt(self, orientation: Orientation) -> (f32, f32) {
        let (w, h) = self.portrait_dimensions_pt();
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "letter" | "us-letter" => Ok(PageSize::Letter),
            "a4" => Ok(PageSize::A4),
            other => Err(format!("unknown page size '{other}' (expected letter or a4)")),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Portrait => write!(f, "portrait"),
            Orientation::Landscape => write!(f, "landscape"),
        }
    }
}

/// Page geometry for one export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    pub size: PageSize,
    pub orientation: Orientation,
    /// Margin applied on all four sides.
    pub margin_pt: f32,
}

/// Default page config: 0.5" margins all sides.
pub fn default_page_config(size: PageSize, orientation: Orientation) -> PageConfig {
    PageConfig {
        size,
        orientation,
        margin_pt: 36.0,
    }
}

impl PageConfig {
    pub fn usable_height_pt(&self) -> f32 {
        let (_, height) = self.size.dimensions_pt(self.orientation);
        (height - 2.0 * self.margin_pt).max(0.0)
    }

    /// Whole grid rows that fit on one page for the given grid spec.
    ///
    /// `n` rows need `n * row_height + (n - 1) * gap`, so
    /// `n = floor((usable + gap) / (row_height + gap))`.
    pub fn capacity(&self, spec: &GridSpec) -> PageCapacity {
        let gap_pt = spec.gap_px as f32 * PT_PER_PX;
        let pitch = spec.row_height_pt + gap_pt;
        let usable = self.usable_height_pt();
        let rows_per_page = if pitch > 0.0 && usable > 0.0 {
            ((usable + gap_pt) / pitch).floor() as u32
        } else {
            0
        };
        PageCapacity {
            orientation: self.orientation,
            rows_per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(row_height_pt: f32, gap_px: u16) -> GridSpec {
        GridSpec {
            columns: 3,
            gap_px,
            section_spacing_px: 16,
            row_height_pt,
        }
    }

    #[test]
    fn test_landscape_swaps_dimensions() {
        assert_eq!(
            PageSize::Letter.dimensions_pt(Orientation::Landscape),
            (792.0, 612.0)
        );
    }

    #[test]
    fn test_usable_height_subtracts_margins() {
        let config = default_page_config(PageSize::Letter, Orientation::Portrait);
        assert!((config.usable_height_pt() - 720.0).abs() < 1e-3);
    }

    #[test]
    fn test_capacity_counts_whole_rows() {
        // Letter portrait: 720pt usable. 54pt rows + 7.5pt gaps → (727.5 / 61.5) = 11.8 → 11.
        let config = default_page_config(PageSize::Letter, Orientation::Portrait);
        let capacity = config.capacity(&spec(54.0, 10));
        assert_eq!(capacity.rows_per_page, 11);
        assert_eq!(capacity.orientation, Orientation::Portrait);
    }

    #[test]
    fn test_landscape_has_fewer_rows() {
        let portrait = default_page_config(PageSize::A4, Orientation::Portrait);
        let landscape = default_page_config(PageSize::A4, Orientation::Landscape);
        let s = spec(72.0, 8);
        assert!(landscape.capacity(&s).rows_per_page < portrait.capacity(&s).rows_per_page);
    }

    #[test]
    fn test_huge_margin_gives_zero_rows() {
        let config = PageConfig {
            size: PageSize::Letter,
            orientation: Orientation::Landscape,
            margin_pt: 400.0,
        };
        assert_eq!(config.capacity(&spec(54.0, 10)).rows_per_page, 0);
    }

    #[test]
    fn test_page_size_from_str() {
        assert_eq!("A4".parse::<PageSize>().unwrap(), PageSize::A4);
        assert_eq!(" letter ".parse::<PageSize>().unwrap(), PageSize::Letter);
        assert!("tabloid".parse::<PageSize>().is_err());
    }
}
