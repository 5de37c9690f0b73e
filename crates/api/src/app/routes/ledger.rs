use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::Deserialize;

use scanledger_infra::append::AppendOutcome;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    // One URL-style target: POST appends, GET probes or runs maintenance
    // depending on the action selector.
    Router::new().route("/", post(append_scan).get(ledger_action))
}

pub async fn append_scan(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::AppendRequest>,
) -> axum::response::Response {
    // The client is contracted to validate before sending; re-run the same
    // check so a broken client still cannot write a malformed row.
    let scan = match body.into_event().validate() {
        Ok(scan) => scan,
        Err(e) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string());
        }
    };

    match services.append().append(&scan) {
        Ok(AppendOutcome::Recorded(record)) => {
            (StatusCode::OK, Json(dto::AppendResponse::recorded(&record))).into_response()
        }
        Ok(AppendOutcome::NotFound) => {
            (StatusCode::OK, Json(dto::AppendResponse::not_found())).into_response()
        }
        Ok(AppendOutcome::Duplicate) => {
            (StatusCode::OK, Json(dto::AppendResponse::duplicate())).into_response()
        }
        Err(e) => errors::append_error_to_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct ActionParams {
    action: Option<String>,
}

/// `GET` on the ledger target: reachability probe, or a maintenance pass
/// when `?action=removeDuplicates` is given.
pub async fn ledger_action(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<ActionParams>,
) -> axum::response::Response {
    match params.action.as_deref() {
        None => probe().await,
        Some("removeDuplicates") => remove_duplicates(services).await,
        Some(other) => errors::json_error(
            StatusCode::BAD_REQUEST,
            "unknown_action",
            format!("unknown action '{other}'"),
        ),
    }
}

/// Side-effect-free "is the ledger reachable" check.
async fn probe() -> axum::response::Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "success": true,
            "message": "scan ledger ready",
        })),
    )
        .into_response()
}

async fn remove_duplicates(services: Arc<AppServices>) -> axum::response::Response {
    match services.dedup().run() {
        Ok(report) => (
            StatusCode::OK,
            Json(dto::MaintenanceResponse {
                success: true,
                message: report.message(),
            }),
        )
            .into_response(),
        Err(e) => errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string()),
    }
}
