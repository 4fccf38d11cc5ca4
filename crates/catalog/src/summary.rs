//! Rating aggregates and cart/wishlist totals.

use std::collections::BTreeMap;

use serde::Serialize;

use solestore_core::ProductId;

use crate::product::Product;

/// Mean of review ratings; no reviews averages to 0.
pub fn aggregate_ratings<I>(ratings: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = ratings
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), rating| (sum + rating, count + 1));
    sum / count.max(1) as f64
}

/// A line in a shopper's cart or wishlist.
pub trait UserProductLine {
    fn product(&self) -> &Product;

    /// Amount the line contributes to the running total.
    fn line_total(&self) -> f64;

    fn product_id(&self) -> &ProductId {
        &self.product().id
    }
}

/// Cart or wishlist lines indexed by product, with running totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProducts<T> {
    pub product_ids: Vec<ProductId>,
    pub items: BTreeMap<ProductId, T>,
    pub count: usize,
    pub total: f64,
    pub shipping_total: f64,
}

impl<T> Default for UserProducts<T> {
    fn default() -> Self {
        Self {
            product_ids: Vec::new(),
            items: BTreeMap::new(),
            count: 0,
            total: 0.0,
            shipping_total: 0.0,
        }
    }
}

impl<T: UserProductLine> UserProducts<T> {
    pub fn normalize<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        lines.into_iter().fold(Self::default(), |mut acc, line| {
            acc.product_ids.push(line.product_id().clone());
            acc.count += 1;
            acc.total += line.line_total();
            acc.shipping_total += line.product().shipping_cost;
            acc.items.insert(line.product_id().clone(), line);
            acc
        })
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items.contains_key(product_id)
    }
}
