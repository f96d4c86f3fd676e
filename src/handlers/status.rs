//! Bot process status handler.

use axum::{Json, extract::Path, extract::State};
use serde::Serialize;
use std::sync::Arc;

use crate::errors::{AppError, AppResult};
use crate::state::AppState;
use crate::supervisor::BotStatus;

/// Response for GET /status/{pid}
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub bot_id: u32,
    pub status: BotStatus,
}

/// Handler for GET /status/{pid}
///
/// Returns the current status of a supervised bot process. Pids never
/// issued by this supervisor yield 404.
pub async fn get_status(
    State(state): State<Arc<AppState>>,
    Path(pid): Path<u32>,
) -> AppResult<Json<StatusResponse>> {
    match state.bots.status(pid) {
        Some(status) => Ok(Json(StatusResponse {
            bot_id: pid,
            status,
        })),
        None => Err(AppError::NotFound(format!(
            "Bot with process id: {pid} not found"
        ))),
    }
}
