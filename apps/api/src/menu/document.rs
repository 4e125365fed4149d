//! Flat arena representation of a menu document.
//!
//! Categories are stored in pre-order (a parent is followed by its subcategories), which is
//! exactly the section order the packer emits. Items live in a separate arena indexed by
//! `ItemId`; each category holds the ordered list of its item ids. Ids are assigned in
//! document order and never reused, so edits never invalidate ids held by callers.

use std::fmt;

use blake3::Hasher;
use serde::{Deserialize, Serialize};

use crate::errors::LayoutError;
use crate::menu::models::{Category, Item, MenuSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "category#{}", self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
    pub id: CategoryId,
    pub name: String,
    /// Back-reference to the owning category; `None` for top-level categories.
    pub parent: Option<CategoryId>,
    pub depth: u16,
    pub items: Vec<ItemId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemEntry {
    pub id: ItemId,
    pub category: CategoryId,
    pub item: Item,
    /// Excluded items are skipped by the packer and do not count toward completeness.
    pub excluded: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuDocument {
    pub title: Option<String>,
    pub logo_ref: Option<String>,
    pub footer_text: Option<String>,
    pub qr_target: Option<String>,
    categories: Vec<CategoryNode>,
    items: Vec<ItemEntry>,
}

impl MenuDocument {
    /// Builds the arena from a nested source document.
    pub fn from_source(source: &MenuSource) -> Self {
        let mut doc = Self::from_categories(&source.categories);
        doc.title = source.title.clone();
        doc.logo_ref = source.logo_ref.clone();
        doc.footer_text = source.footer_text.clone();
        doc.qr_target = source.qr_target.clone();
        doc
    }

    /// Flattens nested categories in pre-order without recursion.
    pub fn from_categories(categories: &[Category]) -> Self {
        let mut doc = MenuDocument::default();
        let mut stack: Vec<(&Category, Option<CategoryId>, u16)> =
            categories.iter().rev().map(|c| (c, None, 0)).collect();

        while let Some((category, parent, depth)) = stack.pop() {
            let id = CategoryId(doc.categories.len() as u32);
            let mut item_ids = Vec::with_capacity(category.items.len());
            for item in &category.items {
                let item_id = ItemId(doc.items.len() as u32);
                doc.items.push(ItemEntry {
                    id: item_id,
                    category: id,
                    item: item.clone(),
                    excluded: false,
                });
                item_ids.push(item_id);
            }
            doc.categories.push(CategoryNode {
                id,
                name: category.name.clone(),
                parent,
                depth,
                items: item_ids,
            });
            for sub in category.subcategories.iter().rev() {
                stack.push((sub, Some(id), depth.saturating_add(1)));
            }
        }

        doc
    }

    /// Categories in section order.
    pub fn categories(&self) -> &[CategoryNode] {
        &self.categories
    }

    pub fn category(&self, id: CategoryId) -> Result<&CategoryNode, LayoutError> {
        self.categories
            .get(id.0 as usize)
            .ok_or(LayoutError::UnknownCategory(id))
    }

    pub fn item(&self, id: ItemId) -> Result<&ItemEntry, LayoutError> {
        self.items
            .get(id.0 as usize)
            .ok_or(LayoutError::UnknownItem(id))
    }

    /// Non-excluded items of a category, in order.
    pub fn visible_items<'a>(
        &'a self,
        category: &'a CategoryNode,
    ) -> impl Iterator<Item = &'a ItemEntry> + 'a {
        category
            .items
            .iter()
            .filter_map(|id| self.items.get(id.0 as usize))
            .filter(|entry| !entry.excluded)
    }

    pub fn visible_item_count(&self) -> usize {
        self.categories
            .iter()
            .map(|c| self.visible_items(c).count())
            .sum()
    }

    // ────────────────────────────────────────────────────────────────────────
    // Edit helpers
    // ────────────────────────────────────────────────────────────────────────

    pub fn exclude_item(&mut self, id: ItemId) -> Result<(), LayoutError> {
        self.item_mut(id)?.excluded = true;
        Ok(())
    }

    pub fn include_item(&mut self, id: ItemId) -> Result<(), LayoutError> {
        self.item_mut(id)?.excluded = false;
        Ok(())
    }

    pub fn set_item_price(&mut self, id: ItemId, price: f64) -> Result<(), LayoutError> {
        self.item_mut(id)?.item.price = price;
        Ok(())
    }

    pub fn set_item_image(
        &mut self,
        id: ItemId,
        image_ref: Option<String>,
    ) -> Result<(), LayoutError> {
        self.item_mut(id)?.item.image_ref = image_ref;
        Ok(())
    }

    pub fn rename_category(
        &mut self,
        id: CategoryId,
        name: impl Into<String>,
    ) -> Result<(), LayoutError> {
        self.category_mut(id)?.name = name.into();
        Ok(())
    }

    /// Appends a new item to the end of a category and returns its id.
    pub fn add_item(&mut self, category: CategoryId, item: Item) -> Result<ItemId, LayoutError> {
        self.category(category)?;
        let id = ItemId(self.items.len() as u32);
        self.items.push(ItemEntry {
            id,
            category,
            item,
            excluded: false,
        });
        self.category_mut(category)?.items.push(id);
        Ok(id)
    }

    /// Moves an item into `target` at `position` (clamped to the end of the list).
    pub fn move_item(
        &mut self,
        id: ItemId,
        target: CategoryId,
        position: usize,
    ) -> Result<(), LayoutError> {
        let source = self.item(id)?.category;
        self.category(target)?;

        self.category_mut(source)?.items.retain(|i| *i != id);
        let target_items = &mut self.category_mut(target)?.items;
        let at = position.min(target_items.len());
        target_items.insert(at, id);
        self.item_mut(id)?.category = target;
        Ok(())
    }

    fn item_mut(&mut self, id: ItemId) -> Result<&mut ItemEntry, LayoutError> {
        self.items
            .get_mut(id.0 as usize)
            .ok_or(LayoutError::UnknownItem(id))
    }

    fn category_mut(&mut self, id: CategoryId) -> Result<&mut CategoryNode, LayoutError> {
        self.categories
            .get_mut(id.0 as usize)
            .ok_or(LayoutError::UnknownCategory(id))
    }

    // ────────────────────────────────────────────────────────────────────────
    // Content hash
    // ────────────────────────────────────────────────────────────────────────

    /// Hex BLAKE3 digest over everything that can influence layout output.
    ///
    /// Callers memoize layouts on `(content_hash, preset_id, context)`.
    pub fn content_hash(&self) -> String {
        let mut hasher = Hasher::new();
        hasher.update(b"menu");
        for field in [&self.title, &self.logo_ref, &self.footer_text, &self.qr_target] {
            update_opt_str(&mut hasher, field.as_deref());
        }

        hasher.update(&(self.categories.len() as u64).to_be_bytes());
        for category in &self.categories {
            hasher.update(b"category");
            update_str(&mut hasher, &category.name);
            hasher.update(&category.depth.to_be_bytes());
            let visible: Vec<&ItemEntry> = self.visible_items(category).collect();
            hasher.update(&(visible.len() as u64).to_be_bytes());
            for entry in visible {
                hasher.update(&entry.id.0.to_be_bytes());
                update_str(&mut hasher, &entry.item.name);
                hasher.update(&entry.item.price.to_bits().to_be_bytes());
                update_opt_str(&mut hasher, entry.item.description.as_deref());
                update_opt_str(&mut hasher, entry.item.image_ref.as_deref());
            }
        }

        hex::encode(hasher.finalize().as_bytes())
    }
}

fn update_str(hasher: &mut Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_be_bytes());
    hasher.update(s.as_bytes());
}

fn update_opt_str(hasher: &mut Hasher, s: Option<&str>) {
    match s {
        Some(s) => {
            hasher.update(&[1]);
            update_str(hasher, s);
        }
        None => {
            hasher.update(&[0]);
        }
    }
}
