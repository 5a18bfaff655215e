//! HTTP API for the campus meals backend.
//!
//! - **Endpoints**: users, meals, upcoming meals (with voting), reviews, orders
//! - **Middleware**: shared application state and the HTTP layer stack
//!
//! Built on Axum 0.8 with Tower middleware.

pub mod endpoints;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, layered};
