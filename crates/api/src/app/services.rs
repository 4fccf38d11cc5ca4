//! In-memory storefront state standing in for the persistence layer.

use std::collections::HashMap;

use tokio::sync::RwLock;

use solestore_catalog::{GuestCart, Product, Wishlist};
use solestore_core::{GuestId, ProductId};

/// Products plus per-guest carts and wishlists.
///
/// The product collection is fixed for the life of the process. Carts and
/// wishlists only hold entries for guests that have something in them.
pub struct StoreState {
    products: Vec<Product>,
    price_ceiling: f64,
    carts: RwLock<HashMap<GuestId, GuestCart>>,
    wishlists: RwLock<HashMap<GuestId, Wishlist>>,
}

impl StoreState {
    /// Ratings of reviewed products are recomputed from their reviews.
    pub fn new(products: Vec<Product>, price_ceiling: f64) -> Self {
        Self {
            products: products.into_iter().map(Product::aggregate_reviews).collect(),
            price_ceiling,
            carts: RwLock::new(HashMap::new()),
            wishlists: RwLock::new(HashMap::new()),
        }
    }

    pub fn price_ceiling(&self) -> f64 {
        self.price_ceiling
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Products in a gender category (case-insensitive). Blank means all.
    pub fn products_for_gender(&self, gender: &str) -> Vec<Product> {
        let gender = gender.trim();
        self.products
            .iter()
            .filter(|p| gender.is_empty() || p.gender.eq_ignore_ascii_case(gender))
            .cloned()
            .collect()
    }

    pub async fn cart(&self, guest: GuestId) -> GuestCart {
        self.carts.read().await.get(&guest).cloned().unwrap_or_default()
    }

    /// Run `f` against the guest's cart, creating it on first use. A cart
    /// left empty is dropped.
    pub async fn with_cart<T>(&self, guest: GuestId, f: impl FnOnce(&mut GuestCart) -> T) -> T {
        let mut carts = self.carts.write().await;
        let cart = carts.entry(guest).or_default();
        let out = f(cart);
        if cart.is_empty() {
            carts.remove(&guest);
        }
        out
    }

    pub async fn wishlist(&self, guest: GuestId) -> Wishlist {
        self.wishlists.read().await.get(&guest).cloned().unwrap_or_default()
    }

    pub async fn with_wishlist<T>(&self, guest: GuestId, f: impl FnOnce(&mut Wishlist) -> T) -> T {
        let mut wishlists = self.wishlists.write().await;
        let wishlist = wishlists.entry(guest).or_default();
        let out = f(wishlist);
        if wishlist.is_empty() {
            wishlists.remove(&guest);
        }
        out
    }
}
