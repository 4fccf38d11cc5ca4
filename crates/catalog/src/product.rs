use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use solestore_core::ProductId;

use crate::summary::aggregate_ratings;

/// One shopper review; only the rating feeds the catalog.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub rating: f64,
}

/// A catalog product as supplied by the persistence layer.
///
/// Read-only from the catalog's point of view: nothing in this crate creates,
/// mutates or deletes a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    /// Stock keeping unit, e.g. `CW2288 111`. The tail of the product slug.
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub color: String,
    /// US sizes, half sizes allowed.
    #[serde(default)]
    pub sizes: Vec<f64>,
    /// Shaft height (`LOW`, `MID`, `HIGH`).
    #[serde(rename = "type", default)]
    pub height: String,
    pub price: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub year: Option<i32>,
    /// Average review rating, absent until the first review.
    #[serde(default)]
    pub ratings: Option<f64>,
    #[serde(default)]
    pub stock_qty: u32,
    #[serde(default)]
    pub shipping_cost: f64,
    #[serde(default)]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reviews: Vec<Review>,
}

impl Product {
    pub fn new(id: impl Into<ProductId>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            sku: String::new(),
            gender: String::new(),
            color: String::new(),
            sizes: Vec::new(),
            height: String::new(),
            price,
            discount: 0.0,
            year: None,
            ratings: None,
            stock_qty: 0,
            shipping_cost: 0.0,
            date_added: None,
            reviews: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = sku.into();
        self
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = gender.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_sizes(mut self, sizes: impl IntoIterator<Item = f64>) -> Self {
        self.sizes = sizes.into_iter().collect();
        self
    }

    pub fn with_height(mut self, height: impl Into<String>) -> Self {
        self.height = height.into();
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_ratings(mut self, ratings: f64) -> Self {
        self.ratings = Some(ratings);
        self
    }

    pub fn with_reviews(mut self, ratings: impl IntoIterator<Item = f64>) -> Self {
        self.reviews = ratings.into_iter().map(|rating| Review { rating }).collect();
        self
    }

    pub fn with_date_added(mut self, date_added: DateTime<Utc>) -> Self {
        self.date_added = Some(date_added);
        self
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_stock(mut self, stock_qty: u32) -> Self {
        self.stock_qty = stock_qty;
        self
    }

    pub fn with_shipping_cost(mut self, shipping_cost: f64) -> Self {
        self.shipping_cost = shipping_cost;
        self
    }

    /// Recompute `ratings` as the mean of `reviews`. A product without
    /// reviews keeps whatever rating it was loaded with.
    pub fn aggregate_reviews(mut self) -> Self {
        if !self.reviews.is_empty() {
            self.ratings = Some(aggregate_ratings(self.reviews.iter().map(|r| r.rating)));
        }
        self
    }

    /// URL slug: the lowercased name in kebab case, then the sku with its
    /// space turned into a dash.
    pub fn slug(&self) -> String {
        let name = self
            .name
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("-");
        let sku = self.sku.trim().replace(' ', "-");
        match (name.is_empty(), sku.is_empty()) {
            (_, true) => name,
            (true, false) => sku,
            (false, false) => format!("{name}-{sku}"),
        }
    }

    /// Case-insensitive substring match on the product name.
    pub fn name_contains(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(&term.to_lowercase())
    }

    /// Rating used for ordering; unrated products count as 0.
    pub fn rating(&self) -> f64 {
        self.ratings.unwrap_or(0.0)
    }

    /// Price after discount.
    pub fn unit_price(&self) -> f64 {
        self.price - self.discount
    }

    /// Release year, falling back to `current_year` for undated products.
    pub fn release_year(&self, current_year: i32) -> i32 {
        self.year.unwrap_or(current_year)
    }

    pub fn has_any_size(&self, sizes: &[f64]) -> bool {
        sizes.iter().any(|size| self.sizes.contains(size))
    }

    pub fn in_stock(&self) -> bool {
        self.stock_qty > 0
    }
}
