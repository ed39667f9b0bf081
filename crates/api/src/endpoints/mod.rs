//! API endpoints.

mod auth;
mod categories;
mod comments;
mod export;
mod facility_types;
mod notifications;
mod reports;
mod stats;
mod users;

use axum::Router;

use crate::events;
use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/reports", reports::router())
        .nest("/comments", comments::router())
        .nest("/categories", categories::router())
        .nest("/facility-types", facility_types::router())
        .nest("/users", users::router())
        .nest("/notifications", notifications::router())
        .nest("/stats", stats::router())
        .nest("/export", export::router())
        .nest("/events", events::router())
}
