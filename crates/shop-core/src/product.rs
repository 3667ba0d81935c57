//! # Catalog Types
//!
//! Categories, products and the filter used by product listing.
//! Seed catalogs are loaded from `config/catalog.toml`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product category (static reference data)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,

    pub name: String,

    /// Unique URL-safe identifier (e.g., "phones")
    pub slug: String,

    #[serde(default)]
    pub description: String,
}

impl Category {
    pub fn new(id: i64, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id,
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

/// A product in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,

    /// Display name
    pub name: String,

    /// Unique URL-safe identifier (e.g., "red-phone")
    pub slug: String,

    #[serde(default)]
    pub description: String,

    /// Unit price, never negative
    pub price: Decimal,

    /// Owning category
    pub category_id: i64,

    /// Optional image reference (URL or media path)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Units on hand
    #[serde(default)]
    pub stock: u32,

    /// Whether this product is visible on public endpoints
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Create an active product with no stock
    pub fn new(
        id: i64,
        name: impl Into<String>,
        slug: impl Into<String>,
        price: Decimal,
        category_id: i64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            slug: slug.into(),
            description: String::new(),
            price,
            category_id,
            image: None,
            stock: 0,
            is_active: true,
        }
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

    /// Builder: set stock count
    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    /// Builder: hide from public endpoints
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// A product joined with its category, as the listing and detail
/// operations read it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductWithCategory {
    pub product: Product,
    pub category: Category,
}

/// Query parameters accepted by product listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    /// Exact category slug
    #[serde(default)]
    pub category: Option<String>,

    /// Case-insensitive substring of the product name
    #[serde(default)]
    pub search: Option<String>,
}

impl ProductQuery {
    /// Build the listing filter. Empty parameters are ignored.
    pub fn to_filter(&self) -> ProductFilter {
        let mut filter = ProductFilter::active();
        if let Some(slug) = non_empty(self.category.as_deref()) {
            filter = filter.in_category(slug);
        }
        if let Some(term) = non_empty(self.search.as_deref()) {
            filter = filter.name_contains(term);
        }
        filter
    }
}

/// Collect from raw query pairs. Unknown keys are ignored and a repeated
/// key keeps its last value.
impl FromIterator<(String, String)> for ProductQuery {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "category" => query.category = Some(value),
                "search" => query.search = Some(value),
                _ => {}
            }
        }
        query
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Predicate over `ProductWithCategory`. Every set criterion must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Only active products
    pub active_only: bool,

    /// Category slug, exact match
    pub category_slug: Option<String>,

    /// Lowercased name fragment
    pub name_fragment: Option<String>,
}

impl ProductFilter {
    /// Matches every product, active or not
    pub fn any() -> Self {
        Self::default()
    }

    /// Matches active products
    pub fn active() -> Self {
        Self {
            active_only: true,
            ..Self::default()
        }
    }

    /// Builder: restrict to a category slug
    pub fn in_category(mut self, slug: impl Into<String>) -> Self {
        self.category_slug = Some(slug.into());
        self
    }

    /// Builder: restrict to names containing `term`, ignoring case
    pub fn name_contains(mut self, term: &str) -> Self {
        self.name_fragment = Some(term.to_lowercase());
        self
    }

    pub fn matches(&self, entry: &ProductWithCategory) -> bool {
        let active = !self.active_only || entry.product.is_active;
        let category = self
            .category_slug
            .as_deref()
            .map_or(true, |slug| entry.category.slug == slug);
        let name = self
            .name_fragment
            .as_deref()
            .map_or(true, |term| entry.product.name.to_lowercase().contains(term));
        active && category && name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, slug: &str, category: &str) -> ProductWithCategory {
        ProductWithCategory {
            product: Product::new(1, name, slug, Decimal::new(1000, 2), 1).with_stock(3),
            category: Category::new(1, category, category),
        }
    }

    #[test]
    fn test_is_in_stock() {
        let product = Product::new(1, "Red Phone", "red-phone", Decimal::new(1000, 2), 1);
        assert!(!product.is_in_stock());
        assert!(product.with_stock(5).is_in_stock());
    }

    #[test]
    fn test_filter_category_exact() {
        let filter = ProductFilter::active().in_category("c1");
        assert!(filter.matches(&entry("Red Phone", "red-phone", "c1")));
        assert!(!filter.matches(&entry("Red Phone", "red-phone", "c10")));
    }

    #[test]
    fn test_filter_search_ignores_case() {
        let filter = ProductFilter::active().name_contains("PHONE");
        assert!(filter.matches(&entry("Red Phone", "red-phone", "phones")));
        assert!(filter.matches(&entry("smartphone", "smartphone", "phones")));
        assert!(!filter.matches(&entry("Laptop", "laptop", "computers")));
    }

    #[test]
    fn test_filter_excludes_inactive() {
        let mut hidden = entry("Red Phone", "red-phone", "phones");
        hidden.product.is_active = false;

        assert!(!ProductFilter::active().matches(&hidden));
        assert!(ProductFilter::any().matches(&hidden));
    }

    #[test]
    fn test_query_combines_with_and() {
        let query = ProductQuery {
            category: Some("phones".into()),
            search: Some("red".into()),
        };
        let filter = query.to_filter();

        assert!(filter.matches(&entry("Red Phone", "red-phone", "phones")));
        assert!(!filter.matches(&entry("Blue Phone", "blue-phone", "phones")));
        assert!(!filter.matches(&entry("Red Laptop", "red-laptop", "computers")));
    }

    #[test]
    fn test_query_ignores_empty_parameters() {
        let query = ProductQuery {
            category: Some(String::new()),
            search: Some(String::new()),
        };
        assert_eq!(query.to_filter(), ProductFilter::active());
    }

    #[test]
    fn test_query_from_pairs_last_value_wins() {
        let query: ProductQuery = [
            ("category", "laptops"),
            ("page", "2"),
            ("category", "phones"),
            ("search", "Red"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        assert_eq!(query.category.as_deref(), Some("phones"));
        assert_eq!(query.search.as_deref(), Some("Red"));
        assert_eq!(
            query.to_filter(),
            ProductFilter::active().in_category("phones").name_contains("red")
        );
    }
}
