//! Session provisioning and bot startup handlers.
//!
//! Three ways into a call:
//! - `GET /` - browser access: provision a room, start a bot, redirect into
//!   the room.
//! - `POST /connect` - client access: mint a fresh participant token for an
//!   existing room.
//! - `POST /` - join an existing room by URL: mint a token and start a bot
//!   there.

use axum::{Json, extract::State, response::Redirect};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::daily::rest::room_name_from_url;
use crate::daily::types::DailyError;
use crate::errors::{AppError, AppResult};
use crate::state::AppState;
use crate::supervisor::MAX_BOTS_PER_ROOM;

/// Response for POST /connect
#[derive(Debug, Serialize)]
pub struct ConnectResponse {
    pub room_url: String,
    pub token: String,
}

/// Response for POST /
#[derive(Debug, Serialize)]
pub struct JoinRoomResponse {
    pub status: &'static str,
    pub room_url: String,
    pub bot_pid: u32,
}

impl From<DailyError> for AppError {
    fn from(err: DailyError) -> Self {
        match err {
            DailyError::RoomNotFound(room) => AppError::NotFound(format!("room {room}")),
            other => AppError::Provisioning(other.to_string()),
        }
    }
}

/// Launch a bot into a room, enforcing the one-bot-per-room cap. The check
/// and the spawn happen without any await in between.
fn start_bot(state: &AppState, room_url: &str, token: &str) -> AppResult<u32> {
    if state.bots.live_bots_in_room(room_url) >= MAX_BOTS_PER_ROOM {
        return Err(AppError::Start(format!(
            "Max bot limit reached for room: {room_url}"
        )));
    }

    let program = state
        .config
        .bot_program()
        .map_err(|e| AppError::Start(e.to_string()))?;
    let pid = state
        .bots
        .spawn(&program, room_url, token)
        .map_err(|e| AppError::Start(e.to_string()))?;
    Ok(pid)
}

/// Handler for GET /
///
/// Direct browser access: creates a room, starts a bot instance, and
/// redirects the caller into the room.
pub async fn start_session(State(state): State<Arc<AppState>>) -> AppResult<Redirect> {
    info!("Provisioning session for browser access");
    let session = state
        .daily
        .provision_session(state.config.daily_sample_room_url.as_deref())
        .await?;

    start_bot(&state, &session.room_url, &session.token)?;
    Ok(Redirect::temporary(&session.room_url))
}

/// Handler for POST /connect
///
/// Given an existing room URL, returns a fresh participant token for a
/// client to join. Unknown rooms yield 404.
pub async fn connect(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> AppResult<Json<ConnectResponse>> {
    let room_url = required_room_url(&body)?;
    let room_name = room_name_from_url(room_url).map_err(|e| AppError::BadRequest(e.to_string()))?;

    // Each concurrent connect mints its own token; tokens are per participant.
    let (_, room_url) = state.daily.get_room(&room_name).await?;
    let token = state.daily.meeting_token(&room_name, false).await?;

    info!(room = %room_name, "Issued participant token");
    Ok(Json(ConnectResponse { room_url, token }))
}

/// Handler for POST /
///
/// Joins an existing room by URL: mints an owner token and starts a bot
/// instance in the room.
pub async fn join_room(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> AppResult<Json<JoinRoomResponse>> {
    let room_url = required_room_url(&body)?;
    let room_name = room_name_from_url(room_url).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let (room_name, room_url) = state.daily.get_room(&room_name).await?;
    let token = state.daily.meeting_token(&room_name, true).await?;
    let bot_pid = start_bot(&state, &room_url, &token)?;

    Ok(Json(JoinRoomResponse {
        status: "success",
        room_url,
        bot_pid,
    }))
}

fn required_room_url(body: &Value) -> AppResult<&str> {
    body.get("room_url")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::BadRequest("room_url is required".to_string()))
}
