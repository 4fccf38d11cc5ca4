//! Storefront HTTP API: route handler chains, error mapping, and the
//! cart/wishlist/product endpoints built on them.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
pub mod route_handler;

pub use route_handler::{step, BoxedStep, HttpMethod, Next, RouteHandler, Step, StepResult};
