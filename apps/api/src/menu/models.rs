use serde::{Deserialize, Serialize};

/// A single dish or drink as supplied by the editing/extraction subsystem.
///
/// `price` is currency-agnostic; the engine copies it verbatim and never rounds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

/// Nested category as it arrives on the wire. Converted into the flat
/// `MenuDocument` arena before layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcategories: Vec<Category>,
}

/// Normalized menu document: ordered categories plus optional masthead content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_target: Option<String>,
    pub categories: Vec<Category>,
}

impl Item {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            description: None,
            image_ref: None,
        }
    }

    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Category {
    pub fn new(name: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            name: name.into(),
            items,
            subcategories: Vec::new(),
        }
    }

    pub fn with_subcategory(mut self, sub: Category) -> Self {
        self.subcategories.push(sub);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_deserializes_without_optional_fields() {
        let raw = r#"{"name": "Drinks", "items": [{"name": "Tea", "price": 2.5}]}"#;
        let cat: Category = serde_json::from_str(raw).unwrap();
        assert_eq!(cat.name, "Drinks");
        assert_eq!(cat.items.len(), 1);
        assert!(cat.items[0].image_ref.is_none());
        assert!(cat.subcategories.is_empty());
    }

    #[test]
    fn test_item_uses_camel_case_image_ref() {
        let raw = r#"{"name": "Soup", "price": 7, "imageRef": "img/soup.jpg"}"#;
        let item: Item = serde_json::from_str(raw).unwrap();
        assert_eq!(item.image_ref.as_deref(), Some("img/soup.jpg"));
        assert_eq!(item.price, 7.0);
    }
}
