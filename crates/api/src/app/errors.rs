use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use scanledger_infra::append::AppendError;

/// Infrastructure failures answer non-2xx: the client treats those as
/// transport-class faults, distinct from business rejections.
pub fn append_error_to_response(err: AppendError) -> axum::response::Response {
    match err {
        AppendError::Catalog(e) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "catalog_error", e.to_string())
        }
        AppendError::Store(e) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
