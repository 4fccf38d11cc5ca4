//! Listing engine: the product list a shopper sees on a category page.
//!
//! The engine owns the full (already gender-scoped) collection, the current
//! [`FilterState`] and the derived listing. Every filter change recomputes the
//! listing from scratch and rewrites the shareable location.

use chrono::Datelike;

use crate::filter::{FilterPatch, FilterState, HIGHEST_PRICE};
use crate::predicate::Predicate;
use crate::product::Product;
use crate::sort::{sort_products, SortKey};

/// Path plus optional query string, e.g. `/category/men?color=Black`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: String,
    query: Option<String>,
}

impl Location {
    pub fn category(gender: &str, query: Option<String>) -> Self {
        Self {
            path: format!("/category/{}", gender.to_lowercase()),
            query,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }
}

impl core::fmt::Display for Location {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.query {
            Some(query) => write!(f, "{}?{}", self.path, query),
            None => f.write_str(&self.path),
        }
    }
}

/// Where the engine publishes its location.
///
/// `replace` swaps the current entry in place: no history entry is added and
/// nothing is reloaded.
pub trait LocationSink {
    fn replace(&mut self, location: Location);
}

/// Sink that only remembers the latest location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentLocation {
    current: Option<Location>,
}

impl CurrentLocation {
    pub fn current(&self) -> Option<&Location> {
        self.current.as_ref()
    }
}

impl LocationSink for CurrentLocation {
    fn replace(&mut self, location: Location) {
        self.current = Some(location);
    }
}

/// Engine parameters fixed for its lifetime.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ListingConfig {
    /// Max price at or above this value means "no upper bound".
    pub price_ceiling: f64,
    /// Year assumed for products that carry none.
    pub current_year: i32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            price_ceiling: HIGHEST_PRICE,
            current_year: chrono::Utc::now().year(),
        }
    }
}

pub struct ListingEngine<S = CurrentLocation> {
    products: Vec<Product>,
    state: FilterState,
    listing: Vec<Product>,
    config: ListingConfig,
    sink: S,
}

impl<S: LocationSink> ListingEngine<S> {
    pub fn new(products: Vec<Product>, pre_filter: FilterPatch, sink: S) -> Self {
        Self::with_config(products, pre_filter, ListingConfig::default(), sink)
    }

    /// Build the engine and compute the initial listing. The location is not
    /// touched until the first filter change.
    pub fn with_config(
        products: Vec<Product>,
        pre_filter: FilterPatch,
        config: ListingConfig,
        sink: S,
    ) -> Self {
        let mut state = FilterState::new(config.price_ceiling);
        state.apply(pre_filter);

        let mut engine = Self {
            products,
            state,
            listing: Vec::new(),
            config,
            sink,
        };
        engine.listing = engine.compute();
        engine
    }

    /// Current derived listing.
    pub fn products(&self) -> &[Product] {
        &self.listing
    }

    /// Full collection the listing is derived from.
    pub fn catalog(&self) -> &[Product] {
        &self.products
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.state
    }

    pub fn config(&self) -> &ListingConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Merge `patch` into the filter state, recompute the listing and replace
    /// the location with `/category/<gender>?<filters>`.
    pub fn filter_listings(&mut self, patch: FilterPatch) -> &[Product] {
        self.state.apply(patch);
        self.listing = self.compute();

        let location = Location::category(self.state.gender(), Some(self.state.to_query()));
        self.sink.replace(location);
        &self.listing
    }

    /// Drop every filter except the gender scope and show the whole collection.
    pub fn clear_filters(&mut self) -> &[Product] {
        self.state = self.state.cleared(self.config.price_ceiling);
        self.listing = self.products.clone();

        self.sink
            .replace(Location::category(self.state.gender(), None));
        &self.listing
    }

    /// Stable re-order of the current listing. Filters and location are untouched.
    pub fn sort_listings(&mut self, key: impl Into<SortKey>) -> &[Product] {
        sort_products(&mut self.listing, key.into());
        &self.listing
    }

    fn compute(&self) -> Vec<Product> {
        Predicate::from_state(
            &self.state,
            self.config.price_ceiling,
            self.config.current_year,
        )
        .select(&self.products)
    }
}
