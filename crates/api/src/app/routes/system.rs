use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};

pub fn router() -> Router {
    Router::new().route("/health", get(health))
}

/// Liveness probe.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}
