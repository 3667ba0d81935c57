//! # shop-api
//!
//! HTTP API layer for storefront-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - JWT-authenticated account endpoints
//! - Read-only catalog and order endpoints
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/auth/register/` | Register, returns tokens |
//! | POST | `/auth/login/` | Log in, returns tokens |
//! | POST | `/auth/refresh/` | New access token |
//! | GET | `/auth/profile/` | Caller's profile |
//! | GET | `/products/` | List products |
//! | GET | `/products/{slug}/` | Get product |
//! | GET | `/categories/` | List categories |
//! | GET | `/orders/` | Caller's orders |

pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;

pub use extract::Caller;
pub use routes::create_router;
pub use state::{AppConfig, AppState};
