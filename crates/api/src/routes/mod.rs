pub mod health;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::handlers;
use crate::state::AppState;

/// Liveness message for a plain GET of the action endpoint.
pub const LIVENESS_MESSAGE: &str = "API is running. Use POST for actions.";

/// The action endpoint.
///
/// ```text
/// GET   /    liveness message
/// POST  /    { action, params, token } -> { success, data, error }
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/", get(liveness).post(handlers::dispatch))
}

async fn liveness() -> Json<Value> {
    Json(json!({ "success": true, "message": LIVENESS_MESSAGE }))
}
