//! # Catalog Seed
//!
//! Categories and products loaded from `config/catalog.toml`.
//!
//! ```toml
//! [[categories]]
//! name = "Phones"
//! slug = "phones"
//!
//! [[products]]
//! name = "Red Phone"
//! slug = "red-phone"
//! price = "199.99"
//! category = "phones"
//! stock = 3
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A category to insert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySeed {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
}

impl CategorySeed {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            description: String::new(),
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }
}

/// A product to insert. `category` is the slug of an existing category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSeed {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub category: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl ProductSeed {
    pub fn new(
        name: impl Into<String>,
        slug: impl Into<String>,
        price: Decimal,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            description: String::new(),
            price,
            category: category.into(),
            image: None,
            stock: 0,
            active: true,
        }
    }

    /// Builder: set stock count
    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Builder: set image reference
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Builder: hide from public endpoints
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Seed catalog (loaded from config)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub categories: Vec<CategorySeed>,
    #[serde(default)]
    pub products: Vec<ProductSeed>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a category
    pub fn with_category(mut self, category: CategorySeed) -> Self {
        self.categories.push(category);
        self
    }

    /// Builder: add a product
    pub fn with_product(mut self, product: ProductSeed) -> Self {
        self.products.push(product);
        self
    }

    /// Load catalog from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_from_toml() {
        let catalog = Catalog::from_toml(
            r#"
            [[categories]]
            name = "Phones"
            slug = "phones"
            description = "Handsets"

            [[products]]
            name = "Red Phone"
            slug = "red-phone"
            price = "199.99"
            category = "phones"
            stock = 3

            [[products]]
            name = "Old Phone"
            slug = "old-phone"
            price = "5.00"
            category = "phones"
            active = false
            "#,
        )
        .unwrap();

        assert_eq!(catalog.categories.len(), 1);
        assert_eq!(catalog.products.len(), 2);
        assert_eq!(catalog.products[0].price, Decimal::new(19999, 2));
        assert!(catalog.products[0].active);
        assert!(!catalog.products[1].active);
        assert_eq!(catalog.products[1].stock, 0);
    }

    #[test]
    fn test_empty_catalog() {
        assert!(Catalog::from_toml("").unwrap().is_empty());
    }
}
