//! Listing order.

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::product::Product;

/// Sort keys offered by the listing page.
///
/// Anything the page sends that is not one of the four known keys parses as
/// [`SortKey::Unsorted`] and leaves the order alone.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[serde(rename = "asc_price")]
    PriceAscending,
    #[serde(rename = "price")]
    PriceDescending,
    #[serde(rename = "asc_ratings")]
    RatingsAscending,
    #[serde(rename = "ratings")]
    RatingsDescending,
    #[default]
    #[serde(other)]
    Unsorted,
}

impl SortKey {
    pub fn parse(key: &str) -> Self {
        match key.trim() {
            "asc_price" => SortKey::PriceAscending,
            "price" => SortKey::PriceDescending,
            "asc_ratings" => SortKey::RatingsAscending,
            "ratings" => SortKey::RatingsDescending,
            _ => SortKey::Unsorted,
        }
    }

    pub fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortKey::PriceAscending => a.price.total_cmp(&b.price),
            SortKey::PriceDescending => b.price.total_cmp(&a.price),
            SortKey::RatingsAscending => a.rating().total_cmp(&b.rating()),
            SortKey::RatingsDescending => b.rating().total_cmp(&a.rating()),
            SortKey::Unsorted => Ordering::Equal,
        }
    }
}

impl From<&str> for SortKey {
    fn from(key: &str) -> Self {
        SortKey::parse(key)
    }
}

/// Stable in-place sort; ties keep their current relative order.
pub fn sort_products(products: &mut [Product], key: SortKey) {
    if key == SortKey::Unsorted {
        return;
    }
    products.sort_by(|a, b| key.compare(a, b));
}
