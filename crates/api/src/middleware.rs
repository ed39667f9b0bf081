//! API middleware.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use fasum_core::{
    AnalyticsService, AuthService, CommentService, NotificationService, ReportService,
    TaxonomyService, UserService,
};

use crate::events::ChangeBroadcaster;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub report_service: ReportService,
    pub taxonomy_service: TaxonomyService,
    pub analytics_service: AnalyticsService,
    pub comment_service: CommentService,
    pub notification_service: NotificationService,
    pub broadcaster: ChangeBroadcaster,
}

/// Authentication middleware.
///
/// Resolves a bearer token to its user and stashes the model in request
/// extensions. Missing or invalid tokens pass through anonymously; the
/// extractors reject where authentication is required.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization") {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                if let Ok(user) = state.auth_service.current_session(token).await {
                    req.extensions_mut().insert(user);
                }
            }
        }
    }

    next.run(req).await
}
