//! Guest cart and wishlist.

use serde::{Deserialize, Serialize};

use solestore_core::{DomainError, DomainResult, ProductId};

use crate::product::Product;
use crate::summary::{UserProductLine, UserProducts};

/// Cart id reported for carts that live in a guest session.
pub const GUEST_CART_ID: &str = "guest-cart";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub cart_id: String,
    pub product_id: ProductId,
    pub size: f64,
    pub quantity: u32,
    /// `(price - discount) * quantity` at the time the line was written.
    pub total: f64,
    pub product: Product,
}

impl CartLine {
    /// Line for `requested` pairs, clamped to what is in stock.
    pub fn new(product: &Product, requested: u32, size: f64) -> Self {
        let quantity = requested.min(product.stock_qty);
        Self {
            cart_id: GUEST_CART_ID.to_string(),
            product_id: product.id.clone(),
            size,
            quantity,
            total: product.unit_price() * f64::from(quantity),
            product: product.clone(),
        }
    }
}

impl UserProductLine for CartLine {
    fn product(&self) -> &Product {
        &self.product
    }

    fn line_total(&self) -> f64 {
        self.total
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GuestCart {
    lines: Vec<CartLine>,
}

impl GuestCart {
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add or overwrite the line for `product`.
    pub fn add(&mut self, product: &Product, qty: u32, size: f64) -> DomainResult<&CartLine> {
        if qty == 0 || !(size.is_finite() && size > 0.0) {
            return Err(DomainError::validation("Malformed Request"));
        }
        if !product.in_stock() {
            return Err(DomainError::validation(format!(
                "{} is out of stock",
                product.id
            )));
        }

        self.lines.retain(|line| line.product_id != product.id);
        self.lines.push(CartLine::new(product, qty, size));
        let idx = self.lines.len() - 1;
        Ok(&self.lines[idx])
    }

    /// Returns whether a line was removed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| &line.product_id != product_id);
        self.lines.len() != before
    }

    pub fn empty(&mut self) {
        self.lines.clear();
    }

    pub fn summary(&self) -> UserProducts<CartLine> {
        UserProducts::normalize(self.lines.iter().cloned())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub product_id: ProductId,
    pub product: Product,
}

impl WishlistEntry {
    pub fn new(product: Product) -> Self {
        Self {
            product_id: product.id.clone(),
            product,
        }
    }
}

impl UserProductLine for WishlistEntry {
    fn product(&self) -> &Product {
        &self.product
    }

    fn line_total(&self) -> f64 {
        self.product.unit_price()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Wishlist {
    entries: Vec<WishlistEntry>,
}

impl Wishlist {
    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Each product may be wished for once; a repeat is a `productId` conflict.
    pub fn add(&mut self, product: &Product) -> DomainResult<&WishlistEntry> {
        if self.entries.iter().any(|e| e.product_id == product.id) {
            return Err(DomainError::conflict(["productId"]));
        }
        self.entries.push(WishlistEntry::new(product.clone()));
        let idx = self.entries.len() - 1;
        Ok(&self.entries[idx])
    }

    pub fn remove(&mut self, product_id: &ProductId) -> DomainResult<()> {
        let before = self.entries.len();
        self.entries.retain(|e| &e.product_id != product_id);
        if self.entries.len() == before {
            return Err(DomainError::not_found(format!("wishlist item {product_id}")));
        }
        Ok(())
    }

    pub fn summary(&self) -> UserProducts<WishlistEntry> {
        UserProducts::normalize(self.entries.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> Product {
        Product::new("runner", 120.0)
            .with_discount(20.0)
            .with_stock(3)
            .with_sizes([9.0, 10.0])
    }

    #[test]
    fn quantity_is_clamped_to_stock() {
        let mut cart = GuestCart::default();
        let line = cart.add(&runner(), 5, 9.0).unwrap();

        assert_eq!(line.quantity, 3);
        assert_eq!(line.total, 300.0);
        assert_eq!(line.cart_id, GUEST_CART_ID);
    }

    #[test]
    fn re_adding_replaces_the_line() {
        let mut cart = GuestCart::default();
        cart.add(&runner(), 1, 9.0).unwrap();
        cart.add(&runner(), 2, 10.0).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.lines()[0].size, 10.0);
    }

    #[test]
    fn out_of_stock_and_zero_quantity_are_rejected() {
        let mut cart = GuestCart::default();
        let sold_out = Product::new("gone", 80.0);

        assert!(matches!(cart.add(&sold_out, 1, 9.0), Err(DomainError::Validation(_))));
        assert!(matches!(cart.add(&runner(), 0, 9.0), Err(DomainError::Validation(_))));
        assert!(matches!(cart.add(&runner(), 1, 0.0), Err(DomainError::Validation(_))));
        assert!(cart.is_empty());
    }

    #[test]
    fn remove_and_empty() {
        let mut cart = GuestCart::default();
        cart.add(&runner(), 1, 9.0).unwrap();
        cart.add(&Product::new("boot", 200.0).with_stock(1), 1, 11.0).unwrap();

        assert!(cart.remove(&ProductId::from("runner")));
        assert!(!cart.remove(&ProductId::from("runner")));
        assert_eq!(cart.len(), 1);

        cart.empty();
        assert!(cart.is_empty());
        assert_eq!(cart.summary().count, 0);
    }

    #[test]
    fn duplicate_wish_is_a_conflict() {
        let mut wishlist = Wishlist::default();
        wishlist.add(&runner()).unwrap();

        let err = wishlist.add(&runner()).unwrap_err();
        assert_eq!(err, DomainError::conflict(["productId"]));
        assert_eq!(wishlist.entries().len(), 1);
    }

    #[test]
    fn removing_unknown_wish_is_not_found() {
        let mut wishlist = Wishlist::default();
        assert!(matches!(
            wishlist.remove(&ProductId::from("nope")),
            Err(DomainError::NotFound(_))
        ));
    }
}
