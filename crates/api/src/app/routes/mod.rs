use std::sync::Arc;

use axum::Router;

use crate::app::services::StoreState;
use crate::route_handler::RouteHandler;

pub mod cart;
pub mod products;
pub mod search;
pub mod system;
pub mod wishlist;

/// Router for every storefront endpoint.
pub fn router(store: Arc<StoreState>, body_limit: usize) -> Router {
    let mount = |handler: RouteHandler| handler.with_body_limit(body_limit).into_method_router();

    Router::new()
        .route("/health", mount(system::route()))
        .route("/api/products", mount(products::route(store.clone())))
        .route("/api/products/:slug", mount(products::detail_route(store.clone())))
        .route("/api/search", mount(search::route(store.clone())))
        .route("/api/cart", mount(cart::route(store.clone())))
        .route("/api/wishlist", mount(wishlist::route(store)))
}
