use serde::{Deserialize, Serialize};

/// Errors specific to the Daily REST and room integrations
#[derive(Debug, thiserror::Error)]
pub enum DailyError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid Daily credentials")]
    Unauthorized,

    #[error("Room not found: {0}")]
    RoomNotFound(String),

    #[error("Invalid response from Daily: {0}")]
    InvalidResponse(String),

    #[error("Invalid room URL: {0}")]
    InvalidRoomUrl(String),
}

/// A provisioned call session: one room plus one meeting token.
///
/// The token is single use in the sense that it names exactly this room;
/// every participant gets a freshly minted token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDescriptor {
    pub room_name: String,
    pub room_url: String,
    pub token: String,
    /// Unix timestamp (seconds) at which the room and token expire
    pub expires_at: u64,
}

/// Body for POST /rooms
#[derive(Debug, Serialize)]
pub(crate) struct CreateRoomRequest {
    pub properties: RoomProperties,
}

#[derive(Debug, Serialize)]
pub(crate) struct RoomProperties {
    /// Room expiry as a unix timestamp
    pub exp: u64,
    pub enable_transcription: bool,
}

/// Response body for POST /rooms and GET /rooms/{name}
#[derive(Debug, Deserialize)]
pub(crate) struct RoomResponse {
    pub name: String,
    pub url: String,
}

/// Body for POST /meeting-tokens
#[derive(Debug, Serialize)]
pub(crate) struct MeetingTokenRequest {
    pub properties: MeetingTokenProperties,
}

#[derive(Debug, Serialize)]
pub(crate) struct MeetingTokenProperties {
    pub room_name: String,
    pub is_owner: bool,
    pub exp: u64,
}

/// Response body for POST /meeting-tokens
#[derive(Debug, Deserialize)]
pub(crate) struct MeetingTokenResponse {
    pub token: String,
}
