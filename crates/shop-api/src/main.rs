//! # Storefront RS
//!
//! E-commerce REST backend.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export JWT_SECRET=$(openssl rand -hex 32)
//! export CATALOG_PATH=config/catalog.toml
//!
//! # Run the server
//! storefront
//! ```

use shop_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let state = AppState::new().await?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Store backend: {}", state.store.backend_name());

    let app = routes::create_router(state);

    info!("Storefront starting on http://{}", addr);

    if !is_prod {
        info!("Health: http://{}/health", addr);
        info!("Products: GET http://{}/products/", addr);
        info!("Register: POST http://{}/auth/register/", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  Storefront RS
  ━━━━━━━━━━━━━━━━━━━━━━━
  E-commerce REST backend
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
