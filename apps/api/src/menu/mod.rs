// Menu document model: wire types and the flat arena the layout engine walks.

pub mod document;
pub mod models;

pub use document::{CategoryId, CategoryNode, ItemEntry, ItemId, MenuDocument};
pub use models::{Category, Item, MenuSource};
