//! HTTP application wiring (Axum router + storefront state).
//!
//! - `services.rs`: in-memory products, carts and wishlists
//! - `routes/`: one `RouteHandler` per endpoint, one file per area
//! - `dto.rs`: request/response bodies
//! - `errors.rs`: `ApiError` and the failure body

use std::sync::Arc;

use axum::Router;

use solestore_catalog::Product;

use crate::config::AppConfig;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &AppConfig, products: Vec<Product>) -> Router {
    tracing::info!(
        products = products.len(),
        price_ceiling = config.price_ceiling,
        "building storefront router"
    );
    let store = Arc::new(services::StoreState::new(products, config.price_ceiling));
    routes::router(store, config.body_limit)
}
