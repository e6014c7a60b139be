//! Error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tally_shared::AppError;
use tracing::{error, warn};

/// Handler result: both arms are finished responses.
pub type ApiResult = Result<Response, Response>;

/// Builds the `{"error", "message"}` response for an application error.
///
/// Server-side failures are logged with their detail and masked for clients.
pub fn error_response(err: impl Into<AppError>) -> Response {
    let err = err.into();
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(error = %err, "Request failed");
    } else {
        warn!(error = %err, "Request rejected");
    }
    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.public_message()
        })),
    )
        .into_response()
}

/// Shorthand for a response with a custom error code.
pub fn reject(status: StatusCode, code: &str, message: &str) -> Response {
    (status, Json(json!({ "error": code, "message": message }))).into_response()
}
