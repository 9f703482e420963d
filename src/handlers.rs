use crate::dashboard::{build_view, DashboardQuery};
use crate::errors::AppError;
use crate::page;
use crate::reference::ReferenceTable;
use crate::scoring_client::ScoringClient;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Known applicant identifiers, loaded once at startup.
    pub reference: Arc<ReferenceTable>,
    /// Client for the remote scoring API.
    pub scoring_client: ScoringClient,
}

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Health check endpoint.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "credit-risk-dashboard",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// GET /
///
/// Renders the dashboard. Every submission re-runs the whole page; scoring
/// API failures are shown inline and the page answers 200. Only a failure to
/// build the page itself turns into an error response.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `query` - Form fields: `sk_id_curr`, `feature` and `run`.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> Result<Html<String>, AppError> {
    tracing::info!(
        "GET / - sk_id_curr: {:?}, feature: {:?}, run: {}",
        query.sk_id_curr,
        query.feature,
        query.run_requested()
    );

    let view = build_view(&state.reference, &state.scoring_client, &query).await;
    let html = page::render(&view)?;
    Ok(Html(html))
}
