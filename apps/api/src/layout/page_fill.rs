//! Page Fill Analysis: reports how well each exported page uses its rows.
//!
//! Pagination never overflows a page, so the only failure mode left is whitespace.
//! A sparse page mid-document usually means a large section was pushed to a fresh page;
//! the verdict lets the export consumer surface that to the menu owner.
//!
//! # Page fill rules
//! - Whitespace ≤ 8%   → `Full`
//! - Whitespace ≤ 50%  → `Acceptable`
//! - Whitespace > 50%  → `Sparse` (expected on the last page, logged elsewhere)

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::layout::paginator::{PageCapacity, PageLayout};

const FULL_WHITESPACE: f32 = 0.08;
const SPARSE_WHITESPACE: f32 = 0.50;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageFillVerdict {
    Full,
    Acceptable,
    Sparse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFillAnalysis {
    pub page: u32,
    pub rows_used: u32,
    pub rows_available: u32,
    pub whitespace_fraction: f32,
    pub verdict: PageFillVerdict,
}

// ────────────────────────────────────────────────────────────────────────────
// Core functions
// ────────────────────────────────────────────────────────────────────────────

/// Analyzes one page against the capacity it was paginated with.
pub fn analyze_page_fill(page: &PageLayout, capacity: PageCapacity) -> PageFillAnalysis {
    let rows_used = page.rows_used();
    let rows_available = capacity.rows_per_page;

    let whitespace_fraction = if rows_available == 0 {
        0.0
    } else {
        (1.0_f32 - rows_used as f32 / rows_available as f32).max(0.0)
    };

    let verdict = if whitespace_fraction <= FULL_WHITESPACE {
        PageFillVerdict::Full
    } else if whitespace_fraction <= SPARSE_WHITESPACE {
        PageFillVerdict::Acceptable
    } else {
        PageFillVerdict::Sparse
    };

    PageFillAnalysis {
        page: page.number,
        rows_used,
        rows_available,
        whitespace_fraction,
        verdict,
    }
}

/// Analyzes every page. Sparse pages other than the last are logged.
pub fn analyze_pages(pages: &[PageLayout], capacity: PageCapacity) -> Vec<PageFillAnalysis> {
    let last = pages.len().saturating_sub(1);
    pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            let analysis = analyze_page_fill(page, capacity);
            if analysis.verdict == PageFillVerdict::Sparse && i != last {
                warn!(
                    page = analysis.page,
                    rows_used = analysis.rows_used,
                    rows_available = analysis.rows_available,
                    "Sparse page before end of document"
                );
            }
            analysis
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::page_size::Orientation;
    use crate::layout::tile::Tile;

    fn capacity(rows_per_page: u32) -> PageCapacity {
        PageCapacity {
            orientation: Orientation::Portrait,
            rows_per_page,
        }
    }

    fn page(number: u32, rows: u32) -> PageLayout {
        PageLayout {
            number,
            orientation: Orientation::Portrait,
            tiles: (0..rows).map(|r| Tile::filler(0, r, 0)).collect(),
        }
    }

    // ── analyze_page_fill verdicts ──────────────────────────────────────────

    #[test]
    fn test_full_page_verdict() {
        let analysis = analyze_page_fill(&page(1, 12), capacity(12));
        assert_eq!(analysis.verdict, PageFillVerdict::Full);
        assert_eq!(analysis.rows_used, 12);
        assert!(analysis.whitespace_fraction.abs() < 1e-6);
    }

    #[test]
    fn test_acceptable_page_verdict() {
        // 8/12 used → 33% whitespace.
        let analysis = analyze_page_fill(&page(1, 8), capacity(12));
        assert_eq!(analysis.verdict, PageFillVerdict::Acceptable);
        assert!((analysis.whitespace_fraction - 1.0 / 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_sparse_page_verdict() {
        let analysis = analyze_page_fill(&page(2, 2), capacity(12));
        assert_eq!(analysis.verdict, PageFillVerdict::Sparse);
        assert_eq!(analysis.page, 2);
        assert_eq!(analysis.rows_available, 12);
    }

    #[test]
    fn test_empty_page_is_sparse() {
        let analysis = analyze_page_fill(&page(1, 0), capacity(10));
        assert_eq!(analysis.verdict, PageFillVerdict::Sparse);
        assert!((analysis.whitespace_fraction - 1.0).abs() < 1e-6);
    }

    // ── analyze_pages ───────────────────────────────────────────────────────

    #[test]
    fn test_analyze_pages_keeps_page_order() {
        let pages = vec![page(1, 10), page(2, 3)];
        let analyses = analyze_pages(&pages, capacity(10));
        let verdicts: Vec<PageFillVerdict> = analyses.iter().map(|a| a.verdict).collect();
        assert_eq!(verdicts, vec![PageFillVerdict::Full, PageFillVerdict::Sparse]);
        assert_eq!(analyses[1].page, 2);
    }

    #[test]
    fn test_analyze_pages_empty() {
        assert!(analyze_pages(&[], capacity(10)).is_empty());
    }
}
