//! # Routes
//!
//! Axum router configuration for the storefront API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post, MethodRouter},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Serve `path` with and without its trailing slash
fn slashed(
    router: Router<AppState>,
    path: &str,
    method: MethodRouter<AppState>,
) -> Router<AppState> {
    let bare = path.trim_end_matches('/');
    router.route(path, method.clone()).route(bare, method)
}

/// Create the main application router
///
/// Routes:
/// - Accounts:
///   - POST /auth/register/ - Create a customer, returns a token pair
///   - POST /auth/login/ - Exchange credentials for a token pair
///   - POST /auth/refresh/ - Exchange a refresh token for an access token
///   - GET  /auth/profile/ - Caller's own record (authenticated)
///
/// - Catalog:
///   - GET /products/ - Active products, `?category=<slug>&search=<text>`
///   - GET /products/{slug}/ - One active product
///   - GET /categories/ - All categories
///
/// - Orders:
///   - GET /orders/ - Caller's orders, newest first (authenticated)
///
/// Every route also answers without its trailing slash.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut auth_routes = Router::new();
    auth_routes = slashed(auth_routes, "/register/", post(handlers::register));
    auth_routes = slashed(auth_routes, "/login/", post(handlers::login));
    auth_routes = slashed(auth_routes, "/refresh/", post(handlers::refresh));
    auth_routes = slashed(auth_routes, "/profile/", get(handlers::profile));

    let mut api_routes = Router::new();
    api_routes = slashed(api_routes, "/products/", get(handlers::list_products));
    api_routes = slashed(api_routes, "/products/{slug}/", get(handlers::get_product));
    api_routes = slashed(api_routes, "/categories/", get(handlers::list_categories));
    api_routes = slashed(api_routes, "/orders/", get(handlers::list_orders));

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/auth", auth_routes)
        .merge(api_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
