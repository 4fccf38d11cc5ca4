//! Title search and single-product lookup.

use std::cmp::Reverse;

use serde::Serialize;
use url::form_urlencoded;

use crate::product::Product;

/// Query keys accepted for the search term, in priority order.
pub const SEARCH_KEYS: [&str; 2] = ["search", "q"];

/// How many related products a product page shows.
pub const RELATED_LIMIT: usize = 4;

/// Trailing slug characters that carry the sku.
const SKU_SLUG_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub products: Vec<Product>,
    pub count: usize,
}

/// The search term of a query string: `search` wins over `q`; neither means "".
pub fn search_term(query: &str) -> String {
    let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.trim().to_string()))
        .collect();

    SEARCH_KEYS
        .iter()
        .find_map(|key| {
            pairs
                .iter()
                .find(|(k, v)| k == key && !v.is_empty())
                .map(|(_, v)| v.clone())
        })
        .unwrap_or_default()
}

/// Products whose name contains `term` (case-insensitive), newest first.
/// Undated products come last; ties keep catalog order.
pub fn search(products: &[Product], term: &str) -> SearchResults {
    let mut found: Vec<Product> = products
        .iter()
        .filter(|p| p.name_contains(term))
        .cloned()
        .map(Product::aggregate_reviews)
        .collect();
    found.sort_by_key(|p| Reverse(p.date_added));

    SearchResults {
        query: term.to_string(),
        count: found.len(),
        products: found,
    }
}

/// Sku encoded in the tail of a product slug, e.g. `air-max-cw2288-111`
/// gives `cw2288 111`.
pub fn sku_from_slug(slug: &str) -> String {
    let chars: Vec<char> = slug.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(SKU_SLUG_LEN)..]
        .iter()
        .collect();
    tail.replacen('-', " ", 1)
}

/// Product whose sku matches the slug tail, ignoring case.
pub fn find_by_slug<'a>(products: &'a [Product], slug: &str) -> Option<&'a Product> {
    let sku = sku_from_slug(slug);
    if sku.trim().is_empty() {
        return None;
    }
    products.iter().find(|p| p.sku.eq_ignore_ascii_case(&sku))
}

/// Up to `limit` other products of the same gender and shaft height.
pub fn related_products(products: &[Product], product: &Product, limit: usize) -> Vec<Product> {
    products
        .iter()
        .filter(|p| p.id != product.id && p.gender == product.gender && p.height == product.height)
        .take(limit)
        .cloned()
        .map(Product::aggregate_reviews)
        .collect()
}
