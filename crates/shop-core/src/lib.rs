//! # shop-core
//!
//! Core types and traits for the storefront backend.
//!
//! This crate provides:
//! - `User`, `Category`, `Product`, `Order` and `OrderItem` entities
//! - Transport records (`UserRecord`, `ProductRecord`, ...) with fixed field lists
//! - `ProductQuery` / `ProductFilter` for product listing
//! - `Registration` and `Credentials` payload validation
//! - `Store` trait for data-store backends
//! - `ShopError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use shop_core::{ProductQuery, ProductRecord, Store};
//!
//! let query = ProductQuery { category: Some("phones".into()), search: Some("red".into()) };
//! let products = store.products(&query.to_filter()).await?;
//! let records: Vec<ProductRecord> = products.iter().map(ProductRecord::from).collect();
//! ```

pub mod error;
pub mod order;
pub mod payload;
pub mod product;
pub mod record;
pub mod store;
pub mod user;

// Re-exports for convenience
pub use error::{FieldErrors, ShopError, ShopResult};
pub use order::{
    NewOrder, NewOrderItem, Order, OrderItem, OrderLine, OrderStatus, OrderWithItems,
};
pub use payload::{Credentials, PayloadReader, Registration};
pub use product::{Category, Product, ProductFilter, ProductQuery, ProductWithCategory};
pub use record::{
    project_all, CategoryRecord, OrderItemRecord, OrderRecord, ProductRecord, Record, UserRecord,
};
pub use store::{SharedStore, Store};
pub use user::{NewUser, User};
