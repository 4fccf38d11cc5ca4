//! Per-field product predicates and their conjunction.

use crate::filter::{FilterField, FilterState, PriceRange};
use crate::product::Product;

/// A single active filter field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldPredicate {
    Color(Vec<String>),
    Size(Vec<f64>),
    Height(Vec<String>),
    Year { years: Vec<i32>, current_year: i32 },
    Price { range: PriceRange, ceiling: f64 },
}

impl FieldPredicate {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            FieldPredicate::Color(colors) => colors.contains(&product.color),
            FieldPredicate::Size(sizes) => product.has_any_size(sizes),
            FieldPredicate::Height(heights) => heights.contains(&product.height),
            FieldPredicate::Year {
                years,
                current_year,
            } => years.contains(&product.release_year(*current_year)),
            FieldPredicate::Price { range, ceiling } => range.contains(product.price, *ceiling),
        }
    }

    /// Predicate for `field` under `state`, or `None` when the field does not
    /// constrain the listing. Gender is never a predicate: the product
    /// collection is already scoped to it.
    pub fn for_field(
        field: FilterField,
        state: &FilterState,
        ceiling: f64,
        current_year: i32,
    ) -> Option<Self> {
        match field {
            FilterField::Gender => None,
            FilterField::Color => non_empty(state.color()).map(FieldPredicate::Color),
            FilterField::Size => non_empty(state.size()).map(FieldPredicate::Size),
            FilterField::Height => non_empty(state.height()).map(FieldPredicate::Height),
            FilterField::Year => non_empty(state.year()).map(|years| FieldPredicate::Year {
                years,
                current_year,
            }),
            FilterField::Price => Some(FieldPredicate::Price {
                range: state.price(),
                ceiling,
            }),
        }
    }
}

fn non_empty<T: Clone>(values: &[T]) -> Option<Vec<T>> {
    (!values.is_empty()).then(|| values.to_vec())
}

/// Conjunction of field predicates. With no fields it accepts everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    fields: Vec<FieldPredicate>,
}

impl Predicate {
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn and(mut self, field: FieldPredicate) -> Self {
        self.fields.push(field);
        self
    }

    /// Compose the predicates of every active field in `state`.
    pub fn from_state(state: &FilterState, ceiling: f64, current_year: i32) -> Self {
        FilterField::ALL
            .into_iter()
            .filter_map(|field| FieldPredicate::for_field(field, state, ceiling, current_year))
            .fold(Self::identity(), Self::and)
    }

    pub fn fields(&self) -> &[FieldPredicate] {
        &self.fields
    }

    /// True when every field matches; stops at the first miss.
    pub fn matches(&self, product: &Product) -> bool {
        self.fields.iter().all(|field| field.matches(product))
    }

    pub fn select(&self, products: &[Product]) -> Vec<Product> {
        products
            .iter()
            .filter(|product| self.matches(product))
            .cloned()
            .collect()
    }
}
