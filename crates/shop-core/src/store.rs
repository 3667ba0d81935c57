//! # Store Trait
//!
//! The data-store seam. Handlers only ever talk to a `Store`; concrete
//! backends decide how rows are kept and how the filters are executed.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               Store (trait)                  │
//! │  ├── create_user() / user_by_*()             │
//! │  ├── categories()                            │
//! │  ├── products() / active_product_by_slug()   │
//! │  └── orders_for_user()                       │
//! └──────────────────────────────────────────────┘
//!                      ▲
//!          ┌───────────┴───────────┐
//!  ┌───────┴───────┐       ┌───────┴───────┐
//!  │  MemoryStore  │       │  SQL backend  │
//!  │               │       │   (future)    │
//!  └───────────────┘       └───────────────┘
//! ```

use crate::error::ShopResult;
use crate::order::OrderWithItems;
use crate::product::{Category, ProductFilter, ProductWithCategory};
use crate::user::{NewUser, User};
use async_trait::async_trait;
use std::sync::Arc;

/// Read/write access to the five storefront entities.
///
/// Each method is a single unit of work; isolation between concurrent
/// calls is the backend's responsibility.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a user.
    ///
    /// Fails with a validation error on `username` or `email` when either
    /// is already taken (email compared case-insensitively).
    async fn create_user(&self, user: NewUser) -> ShopResult<User>;

    async fn user_by_id(&self, id: i64) -> ShopResult<Option<User>>;

    async fn user_by_username(&self, username: &str) -> ShopResult<Option<User>>;

    async fn username_taken(&self, username: &str) -> ShopResult<bool>;

    async fn email_taken(&self, email: &str) -> ShopResult<bool>;

    /// All categories, in id order
    async fn categories(&self) -> ShopResult<Vec<Category>>;

    /// Products matching `filter`, in id order
    async fn products(&self, filter: &ProductFilter) -> ShopResult<Vec<ProductWithCategory>>;

    /// An active product by slug. Inactive products read as absent.
    async fn active_product_by_slug(&self, slug: &str) -> ShopResult<Option<ProductWithCategory>>;

    /// Orders owned by `user_id`, newest first
    async fn orders_for_user(&self, user_id: i64) -> ShopResult<Vec<OrderWithItems>>;

    /// Backend name (for logging)
    fn backend_name(&self) -> &'static str;
}

/// Type alias for a shared store (dynamic dispatch)
pub type SharedStore = Arc<dyn Store>;
