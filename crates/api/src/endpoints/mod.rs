//! API endpoints.

mod meals;
mod orders;
mod reviews;
mod upcoming_meals;
mod users;

use axum::{Router, routing::get};

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .nest("/users", users::router())
        .nest("/meals", meals::router())
        .nest("/upcoming-meals", upcoming_meals::router())
        .nest("/reviews", reviews::router())
        .nest("/orders", orders::router())
}

/// Liveness probe.
async fn root() -> &'static str {
    "Campus meals server is running"
}
