//! Catalog browsing domain.
//!
//! Products, the filter state a shopper builds up while browsing a category,
//! and the listing engine that derives the visible product list from both.
//! Also carries title search, slug lookup and the small cart/wishlist
//! arithmetic the storefront needs.
//! Pure domain logic: no IO, no HTTP.

pub mod cart;
pub mod filter;
pub mod listing;
pub mod predicate;
pub mod product;
pub mod query;
pub mod search;
pub mod sort;
pub mod summary;

pub use cart::{CartLine, GuestCart, Wishlist, WishlistEntry, GUEST_CART_ID};
pub use filter::{FilterField, FilterPatch, FilterState, PriceRange, HIGHEST_PRICE};
pub use listing::{CurrentLocation, ListingConfig, ListingEngine, Location, LocationSink};
pub use predicate::{FieldPredicate, Predicate};
pub use product::{Product, Review};
pub use search::{
    find_by_slug, related_products, search, search_term, SearchResults, RELATED_LIMIT,
};
pub use sort::{sort_products, SortKey};
pub use summary::{aggregate_ratings, UserProductLine, UserProducts};
