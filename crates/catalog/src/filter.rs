//! Filter state built up while browsing a category.

use serde::{Deserialize, Serialize};

/// Default price ceiling. A max price at or above the ceiling means "no upper bound".
pub const HIGHEST_PRICE: f64 = 10_000.0;

/// The filterable fields, in serialization order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FilterField {
    Gender,
    Color,
    Size,
    Height,
    Price,
    Year,
}

impl FilterField {
    pub const ALL: [FilterField; 6] = [
        FilterField::Gender,
        FilterField::Color,
        FilterField::Size,
        FilterField::Height,
        FilterField::Price,
        FilterField::Year,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterField::Gender => "gender",
            FilterField::Color => "color",
            FilterField::Size => "size",
            FilterField::Height => "height",
            FilterField::Price => "price",
            FilterField::Year => "year",
        }
    }
}

/// Inclusive price bounds. Always `min <= max`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    min: f64,
    max: f64,
}

impl PriceRange {
    /// Build a range; an inverted pair is swapped rather than rejected.
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// `0..=ceiling`, i.e. no price restriction at all.
    pub fn full(ceiling: f64) -> Self {
        Self::new(0.0, ceiling)
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn is_open_ended(&self, ceiling: f64) -> bool {
        self.max >= ceiling
    }

    pub fn contains(&self, price: f64, ceiling: f64) -> bool {
        if self.is_open_ended(ceiling) {
            return price >= self.min;
        }
        price >= self.min && price <= self.max
    }
}

impl From<(f64, f64)> for PriceRange {
    fn from((min, max): (f64, f64)) -> Self {
        Self::new(min, max)
    }
}

/// Current set of active filter values.
///
/// Sequence fields hold unique values; an empty sequence means the field is
/// inactive. Only [`FilterState::apply`] and the constructors change it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    gender: String,
    color: Vec<String>,
    size: Vec<f64>,
    height: Vec<String>,
    price: PriceRange,
    year: Vec<i32>,
}

impl FilterState {
    /// Empty filter with the full `0..=ceiling` price range.
    pub fn new(ceiling: f64) -> Self {
        Self {
            gender: String::new(),
            color: Vec::new(),
            size: Vec::new(),
            height: Vec::new(),
            price: PriceRange::full(ceiling),
            year: Vec::new(),
        }
    }

    pub fn gender(&self) -> &str {
        &self.gender
    }

    pub fn color(&self) -> &[String] {
        &self.color
    }

    pub fn size(&self) -> &[f64] {
        &self.size
    }

    pub fn height(&self) -> &[String] {
        &self.height
    }

    pub fn price(&self) -> PriceRange {
        self.price
    }

    pub fn year(&self) -> &[i32] {
        &self.year
    }

    /// Overwrite every field present in `patch`; absent fields are kept.
    pub fn apply(&mut self, patch: FilterPatch) {
        let FilterPatch {
            gender,
            color,
            size,
            height,
            price,
            year,
        } = patch;

        if let Some(gender) = gender {
            self.gender = gender;
        }
        if let Some(color) = color {
            self.color = unique(color);
        }
        if let Some(size) = size {
            self.size = unique(size);
        }
        if let Some(height) = height {
            self.height = unique(height);
        }
        if let Some(price) = price {
            self.price = price;
        }
        if let Some(year) = year {
            self.year = unique(year);
        }
    }

    /// Reset everything but the gender scope.
    pub fn cleared(&self, ceiling: f64) -> Self {
        Self {
            gender: self.gender.clone(),
            ..Self::new(ceiling)
        }
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(HIGHEST_PRICE)
    }
}

/// Partial [`FilterState`]: each present field replaces the current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<Vec<i32>>,
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn color<I, T>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.color = Some(colors.into_iter().map(Into::into).collect());
        self
    }

    pub fn size(mut self, sizes: impl IntoIterator<Item = f64>) -> Self {
        self.size = Some(sizes.into_iter().collect());
        self
    }

    pub fn height<I, T>(mut self, heights: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.height = Some(heights.into_iter().map(Into::into).collect());
        self
    }

    pub fn price(mut self, min: f64, max: f64) -> Self {
        self.price = Some(PriceRange::new(min, max));
        self
    }

    pub fn year(mut self, years: impl IntoIterator<Item = i32>) -> Self {
        self.year = Some(years.into_iter().collect());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn unique<T: PartialEq>(values: Vec<T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(values.len());
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}
