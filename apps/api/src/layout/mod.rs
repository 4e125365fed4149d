// Layout engine: packer, paginator and page geometry.
// Everything here is synchronous and pure. Handlers run it inside
// tokio::task::spawn_blocking.

pub mod handlers;
pub mod occupancy;
pub mod packer;
pub mod page_fill;
pub mod page_size;
pub mod paginator;
pub mod pipeline;
pub mod tile;

// Re-export the public API consumed by handlers and integration tests.
pub use occupancy::validate_scope;
pub use packer::{generate, generate_instance};
pub use page_fill::{analyze_page_fill, analyze_pages, PageFillAnalysis, PageFillVerdict};
pub use page_size::{default_page_config, Orientation, PageConfig, PageSize};
pub use paginator::{paginate, paginate_with_policy, PageCapacity, PageLayout, PaginationPolicy};
pub use pipeline::{export, preview, ExportOptions, PaginatedLayout};
pub use tile::{ImageSlot, LayoutInstance, Placement, Section, SectionKind, Tile, TileContent};
