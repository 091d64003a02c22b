//! Dashboard route.

use axum::{Json, Router, extract::State, routing::get};

use crate::{AppState, error::ApiResult, middleware::AuthUser};
use amanat_core::dashboard::DashboardSummary;
use amanat_db::DashboardRepository;

/// Creates the dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(summary))
}

/// GET /dashboard - Letter counts, the caller's queue and recent activity.
async fn summary(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<DashboardSummary>> {
    let summary = DashboardRepository::new((*state.db).clone())
        .summary(auth.user_id())
        .await?;

    Ok(Json(summary))
}
