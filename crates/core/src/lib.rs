//! `solestore-core`: storefront domain primitives.
//!
//! Identifiers and the domain error model shared by the catalog and the HTTP
//! layer. No IO lives here.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{GuestId, ProductId, RequestId};
