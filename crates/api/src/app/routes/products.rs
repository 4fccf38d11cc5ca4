use std::sync::Arc;

use url::form_urlencoded;

use solestore_catalog::{
    find_by_slug, query, related_products, CurrentLocation, FilterPatch, ListingConfig,
    ListingEngine, SortKey, RELATED_LIMIT,
};

use crate::app::dto::{ProductDetail, ProductListing, Success};
use crate::app::errors::ApiError;
use crate::app::services::StoreState;
use crate::context::{RequestContext, ResponseWriter};
use crate::route_handler::{step, Next, RouteHandler, Step, StepResult};

pub fn route(store: Arc<StoreState>) -> RouteHandler {
    RouteHandler::new().get([step(ListProducts { store })])
}

/// Mounted on `/api/products/:slug`.
pub fn detail_route(store: Arc<StoreState>) -> RouteHandler {
    RouteHandler::new().get([step(ShowProduct { store })])
}

/// Category listing: the same filters and sort keys the category page puts in
/// its URL, evaluated server-side.
pub struct ListProducts {
    store: Arc<StoreState>,
}

#[async_trait::async_trait]
impl Step for ListProducts {
    async fn call(&self, req: &mut RequestContext, res: &mut ResponseWriter) -> StepResult {
        let (gender, sort) = listing_params(req.query());
        let config = ListingConfig {
            price_ceiling: self.store.price_ceiling(),
            ..ListingConfig::default()
        };

        let mut engine = ListingEngine::with_config(
            self.store.products_for_gender(&gender),
            FilterPatch::new().gender(gender),
            config,
            CurrentLocation::default(),
        );
        engine.filter_listings(query::decode(req.query(), config.price_ceiling));
        engine.sort_listings(sort);

        let listing = ProductListing {
            products: engine.products().to_vec(),
            filters: engine.filter_state().clone(),
            location: engine
                .sink()
                .current()
                .map(ToString::to_string)
                .unwrap_or_default(),
        };
        tracing::debug!(
            count = listing.products.len(),
            location = %listing.location,
            "listing built"
        );

        res.json(&Success::new(
            format!("Found {} products", listing.products.len()),
            listing,
        ))?;
        Ok(Next::Halt)
    }
}

/// A single product by slug, plus a few of its siblings.
pub struct ShowProduct {
    store: Arc<StoreState>,
}

#[async_trait::async_trait]
impl Step for ShowProduct {
    async fn call(&self, req: &mut RequestContext, res: &mut ResponseWriter) -> StepResult {
        let slug = last_segment(req.uri().path());
        let products = self.store.products();
        let product = find_by_slug(products, slug)
            .ok_or_else(|| ApiError::not_found(format!("Cannot find product {slug}")))?;

        let detail = ProductDetail {
            related_products: related_products(products, product, RELATED_LIMIT),
            product: product.clone(),
        };
        res.json(&Success::new(format!("Found {}", detail.product.name), detail))?;
        Ok(Next::Halt)
    }
}

fn last_segment(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or_default()
}

fn listing_params(query: &str) -> (String, SortKey) {
    let mut gender = String::new();
    let mut sort = SortKey::Unsorted;
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "gender" => gender = value.trim().to_string(),
            "sort" => sort = SortKey::parse(&value),
            _ => {}
        }
    }
    (gender, sort)
}
