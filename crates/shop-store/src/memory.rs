//! # In-Process Store
//!
//! `Store` implementation holding every table in memory behind a single
//! `RwLock`. Each trait call takes the lock once, so every operation is
//! atomic with respect to the others.

use crate::seed::{Catalog, CategorySeed, ProductSeed};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use shop_core::{
    Category, FieldErrors, NewOrder, NewUser, Order, OrderItem, OrderLine, OrderWithItems,
    Product, ProductFilter, ProductWithCategory, ShopError, ShopResult, Store, User,
};
use shop_core::payload::{EMAIL_TAKEN, USERNAME_TAKEN};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Monotonic id sequences, one per table
#[derive(Debug, Default)]
struct Sequences {
    user: i64,
    category: i64,
    product: i64,
    order: i64,
    order_item: i64,
}

fn next(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    categories: BTreeMap<i64, Category>,
    products: BTreeMap<i64, Product>,
    orders: BTreeMap<i64, Order>,
    order_items: BTreeMap<i64, OrderItem>,
    seq: Sequences,
}

impl Tables {
    fn email_taken(&self, email: &str) -> bool {
        self.users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(email))
    }

    fn username_taken(&self, username: &str) -> bool {
        self.users.values().any(|u| u.username == username)
    }

    fn category_by_slug(&self, slug: &str) -> Option<&Category> {
        self.categories.values().find(|c| c.slug == slug)
    }

    fn join_category(&self, product: &Product) -> ShopResult<ProductWithCategory> {
        let category = self.categories.get(&product.category_id).ok_or_else(|| {
            ShopError::Storage(format!(
                "product {} references missing category {}",
                product.id, product.category_id
            ))
        })?;
        Ok(ProductWithCategory {
            product: product.clone(),
            category: category.clone(),
        })
    }

    fn join_order(&self, order: &Order) -> ShopResult<OrderWithItems> {
        let user = self.users.get(&order.user_id).ok_or_else(|| {
            ShopError::Storage(format!(
                "order {} references missing user {}",
                order.id, order.user_id
            ))
        })?;

        let lines = self
            .order_items
            .values()
            .filter(|item| item.order_id == order.id)
            .map(|item| {
                let product = self.products.get(&item.product_id).ok_or_else(|| {
                    ShopError::Storage(format!(
                        "order item {} references missing product {}",
                        item.id, item.product_id
                    ))
                })?;
                Ok(OrderLine {
                    item: item.clone(),
                    product: self.join_category(product)?,
                })
            })
            .collect::<ShopResult<Vec<_>>>()?;

        Ok(OrderWithItems {
            order: order.clone(),
            user: user.clone(),
            lines,
        })
    }
}

/// In-memory storefront data store
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated from a catalog
    pub async fn with_catalog(catalog: &Catalog) -> ShopResult<Self> {
        let store = Self::new();
        store.load_catalog(catalog).await?;
        Ok(store)
    }

    /// Insert every category, then every product, of a catalog
    pub async fn load_catalog(&self, catalog: &Catalog) -> ShopResult<()> {
        for category in &catalog.categories {
            self.create_category(category.clone()).await?;
        }
        for product in &catalog.products {
            self.create_product(product.clone()).await?;
        }
        info!(
            "Loaded {} categories and {} products",
            catalog.categories.len(),
            catalog.products.len()
        );
        Ok(())
    }

    /// Insert a category. Slugs are unique.
    pub async fn create_category(&self, seed: CategorySeed) -> ShopResult<Category> {
        let mut tables = self.tables.write().await;
        if tables.category_by_slug(&seed.slug).is_some() {
            return Err(ShopError::invalid_field(
                "slug",
                "A category with this slug already exists.",
            ));
        }

        let id = next(&mut tables.seq.category);
        let category = Category::new(id, seed.name, seed.slug).with_description(seed.description);
        tables.categories.insert(id, category.clone());
        debug!("Created category {} ({})", category.slug, id);
        Ok(category)
    }

    /// Insert a product under an existing category (by slug)
    pub async fn create_product(&self, seed: ProductSeed) -> ShopResult<Product> {
        let mut tables = self.tables.write().await;

        let mut errors = FieldErrors::new();
        if seed.price < Decimal::ZERO {
            errors.add("price", "Ensure this value is greater than or equal to 0.");
        }
        if tables.products.values().any(|p| p.slug == seed.slug) {
            errors.add("slug", "A product with this slug already exists.");
        }
        let category_id = match tables.category_by_slug(&seed.category) {
            Some(category) => category.id,
            None => {
                errors.add("category", format!("Unknown category: {}", seed.category));
                0
            }
        };
        errors.into_result()?;

        let id = next(&mut tables.seq.product);
        let mut product = Product::new(id, seed.name, seed.slug, seed.price, category_id)
            .with_description(seed.description)
            .with_stock(seed.stock);
        if let Some(image) = seed.image {
            product = product.with_image(image);
        }
        product.is_active = seed.active;

        tables.products.insert(id, product.clone());
        debug!("Created product {} ({})", product.slug, id);
        Ok(product)
    }

    /// Insert an order and its items. The total is the sum of line totals.
    pub async fn create_order(&self, new_order: NewOrder) -> ShopResult<Order> {
        let mut tables = self.tables.write().await;

        let mut errors = FieldErrors::new();
        if !tables.users.contains_key(&new_order.user_id) {
            errors.add("user", format!("Unknown user: {}", new_order.user_id));
        }
        for item in &new_order.items {
            if item.quantity == 0 {
                errors.add("quantity", "Ensure this value is greater than 0.");
            }
            if !tables.products.contains_key(&item.product_id) {
                errors.add("product", format!("Unknown product: {}", item.product_id));
            }
        }
        errors.into_result()?;

        let id = next(&mut tables.seq.order);
        let order = Order {
            id,
            user_id: new_order.user_id,
            status: new_order.status,
            total_amount: new_order.total_amount(),
            shipping_address: new_order.shipping_address.clone(),
            created_at: Utc::now(),
        };

        for item in new_order.items {
            let item_id = next(&mut tables.seq.order_item);
            tables.order_items.insert(
                item_id,
                OrderItem {
                    id: item_id,
                    order_id: id,
                    product_id: item.product_id,
                    quantity: item.quantity,
                    price: item.price,
                },
            );
        }
        tables.orders.insert(id, order.clone());
        debug!("Created order {} for user {}", id, order.user_id);
        Ok(order)
    }

    /// Delete an order together with its items
    pub async fn delete_order(&self, order_id: i64) -> ShopResult<()> {
        let mut tables = self.tables.write().await;
        if tables.orders.remove(&order_id).is_none() {
            return Err(ShopError::not_found("Order", order_id.to_string()));
        }
        tables.order_items.retain(|_, item| item.order_id != order_id);
        debug!("Deleted order {}", order_id);
        Ok(())
    }

    /// Flip a user's active flag
    pub async fn set_user_active(&self, user_id: i64, active: bool) -> ShopResult<()> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| ShopError::not_found("User", user_id.to_string()))?;
        user.is_active = active;
        Ok(())
    }

    /// Number of stored order items (all orders)
    pub async fn order_item_count(&self) -> usize {
        self.tables.read().await.order_items.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, user: NewUser) -> ShopResult<User> {
        let mut tables = self.tables.write().await;

        // Rechecked under the write lock; the caller's earlier check may be stale.
        let mut errors = FieldErrors::new();
        if tables.username_taken(&user.username) {
            errors.add("username", USERNAME_TAKEN);
        }
        if tables.email_taken(&user.email) {
            errors.add("email", EMAIL_TAKEN);
        }
        errors.into_result()?;

        let id = next(&mut tables.seq.user);
        let user = user.into_user(id);
        tables.users.insert(id, user.clone());
        debug!("Created user {} ({})", user.username, id);
        Ok(user)
    }

    async fn user_by_id(&self, id: i64) -> ShopResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn user_by_username(&self, username: &str) -> ShopResult<Option<User>> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn username_taken(&self, username: &str) -> ShopResult<bool> {
        Ok(self.tables.read().await.username_taken(username))
    }

    async fn email_taken(&self, email: &str) -> ShopResult<bool> {
        Ok(self.tables.read().await.email_taken(email))
    }

    async fn categories(&self) -> ShopResult<Vec<Category>> {
        Ok(self.tables.read().await.categories.values().cloned().collect())
    }

    async fn products(&self, filter: &ProductFilter) -> ShopResult<Vec<ProductWithCategory>> {
        let tables = self.tables.read().await;
        let mut matched = Vec::new();
        for product in tables.products.values() {
            let entry = tables.join_category(product)?;
            if filter.matches(&entry) {
                matched.push(entry);
            }
        }
        Ok(matched)
    }

    async fn active_product_by_slug(&self, slug: &str) -> ShopResult<Option<ProductWithCategory>> {
        let tables = self.tables.read().await;
        tables
            .products
            .values()
            .find(|p| p.slug == slug && p.is_active)
            .map(|p| tables.join_category(p))
            .transpose()
    }

    async fn orders_for_user(&self, user_id: i64) -> ShopResult<Vec<OrderWithItems>> {
        let tables = self.tables.read().await;
        let mut orders: Vec<&Order> = tables
            .orders
            .values()
            .filter(|o| o.user_id == user_id)
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        orders.into_iter().map(|o| tables.join_order(o)).collect()
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
