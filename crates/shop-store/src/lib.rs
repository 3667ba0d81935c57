//! # shop-store
//!
//! Data-store backends for storefront-rs.
//!
//! - **MemoryStore** - every table in process memory, seeded from a
//!   TOML catalog. Suitable for development, demos and tests.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shop_store::{Catalog, MemoryStore};
//!
//! let catalog = Catalog::from_toml(&std::fs::read_to_string("config/catalog.toml")?)?;
//! let store = MemoryStore::with_catalog(&catalog).await?;
//! ```

pub mod memory;
pub mod seed;

// Re-exports
pub use memory::MemoryStore;
pub use seed::{Catalog, CategorySeed, ProductSeed};
