use axum::{http::StatusCode, response::Json};
use serde_json::{Value, json};

/// Health check handler
///
/// Returns a static healthy response with no dependency checks; it succeeds
/// regardless of the state of any external provider.
pub async fn health_check() -> Result<Json<Value>, StatusCode> {
    Ok(Json(json!({
        "status": "OK"
    })))
}
