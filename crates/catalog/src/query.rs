//! Query-string form of a [`FilterState`].
//!
//! `color`, `size`, `height` and `year` repeat once per value, the price range
//! becomes `min_price` / `max_price`. Gender travels in the path instead.

use url::form_urlencoded;

use crate::filter::{FilterField, FilterPatch, FilterState, PriceRange};

pub const MIN_PRICE: &str = "min_price";
pub const MAX_PRICE: &str = "max_price";

/// Serialize every non-gender field of `state`.
pub fn encode(state: &FilterState) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    for field in FilterField::ALL {
        match field {
            FilterField::Gender => {}
            FilterField::Color => {
                for color in state.color() {
                    query.append_pair(field.as_str(), color);
                }
            }
            FilterField::Size => {
                for size in state.size() {
                    query.append_pair(field.as_str(), &size.to_string());
                }
            }
            FilterField::Height => {
                for height in state.height() {
                    query.append_pair(field.as_str(), height);
                }
            }
            FilterField::Price => {
                let price = state.price();
                query.append_pair(MIN_PRICE, &price.min().to_string());
                query.append_pair(MAX_PRICE, &price.max().to_string());
            }
            FilterField::Year => {
                for year in state.year() {
                    query.append_pair(field.as_str(), &year.to_string());
                }
            }
        }
    }
    query.finish()
}

/// Parse a query string back into a patch.
///
/// Unknown keys and unparsable values are skipped, so a hand-edited URL
/// degrades to a wider listing instead of an error. A missing or oversized
/// `max_price` leaves the range open-ended above `min_price`.
pub fn decode(query: &str, ceiling: f64) -> FilterPatch {
    let mut color = Vec::new();
    let mut size = Vec::new();
    let mut height = Vec::new();
    let mut year = Vec::new();
    let mut min_price = None;
    let mut max_price = None;

    for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key.as_ref() {
            "color" => color.push(value.to_string()),
            "size" => {
                if let Some(v) = parse_amount(value) {
                    size.push(v);
                }
            }
            "height" => height.push(value.to_string()),
            "year" => {
                if let Ok(v) = value.parse::<i32>() {
                    year.push(v);
                }
            }
            MIN_PRICE => min_price = parse_amount(value).or(min_price),
            MAX_PRICE => max_price = parse_amount(value).or(max_price),
            _ => {}
        }
    }

    let price = match (min_price, max_price) {
        (None, None) => None,
        (min, max) => {
            let min = min.unwrap_or(0.0);
            Some(match max {
                Some(max) if max < ceiling => PriceRange::new(min, max),
                // Open-ended: the upper bound never drops below `min`.
                _ => PriceRange::new(min, min.max(ceiling)),
            })
        }
    };

    FilterPatch {
        gender: None,
        color: (!color.is_empty()).then_some(color),
        size: (!size.is_empty()).then_some(size),
        height: (!height.is_empty()).then_some(height),
        price,
        year: (!year.is_empty()).then_some(year),
    }
}

impl FilterState {
    /// Rebuild a state from a category path segment and its query string.
    pub fn from_query(gender: &str, query: &str, ceiling: f64) -> Self {
        let mut state = FilterState::new(ceiling);
        state.apply(decode(query, ceiling).gender(gender));
        state
    }

    pub fn to_query(&self) -> String {
        encode(self)
    }
}

fn parse_amount(value: &str) -> Option<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}
