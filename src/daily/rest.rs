//! Daily REST client for room and meeting-token provisioning.
//!
//! Wraps the two REST resources the supervisor needs:
//!
//! - `POST /rooms` / `GET /rooms/{name}` - transient room lifecycle
//! - `POST /meeting-tokens` - per-participant access tokens
//!
//! Failures are never retried here; callers decide whether a failure is a
//! provisioning error or a not-found condition.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::{Client, StatusCode};
use tracing::{debug, info};
use url::Url;

use super::types::{
    CreateRoomRequest, DailyError, MeetingTokenProperties, MeetingTokenRequest,
    MeetingTokenResponse, RoomProperties, RoomResponse, SessionDescriptor,
};

/// REST client for the Daily API.
///
/// Holds a single long-lived `reqwest::Client` so connections are pooled
/// across requests.
pub struct DailyRestClient {
    http: Client,
    api_url: String,
    api_key: String,
    token_expiry: Duration,
}

impl DailyRestClient {
    pub fn new(api_url: String, api_key: String, token_expiry_seconds: u64) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            token_expiry: Duration::from_secs(token_expiry_seconds),
        }
    }

    fn expiry_timestamp(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        (now + self.token_expiry).as_secs()
    }

    /// Create a transient room with transcription enabled.
    ///
    /// Side effect: creates a remote resource that expires on its own after
    /// the configured lifetime.
    pub async fn create_room(&self) -> Result<(String, String), DailyError> {
        let body = CreateRoomRequest {
            properties: RoomProperties {
                exp: self.expiry_timestamp(),
                enable_transcription: true,
            },
        };

        let response = self
            .http
            .post(format!("{}/rooms", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DailyError::RequestFailed(e.to_string()))?;

        let room: RoomResponse = decode_response(response, None).await?;
        info!(room = %room.name, "Created Daily room");
        Ok((room.name, room.url))
    }

    /// Look up an existing room by name. 404 maps to `RoomNotFound`.
    pub async fn get_room(&self, room_name: &str) -> Result<(String, String), DailyError> {
        let response = self
            .http
            .get(format!("{}/rooms/{}", self.api_url, room_name))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| DailyError::RequestFailed(e.to_string()))?;

        let room: RoomResponse = decode_response(response, Some(room_name)).await?;
        Ok((room.name, room.url))
    }

    /// Mint a meeting token for one room.
    ///
    /// Bots get owner tokens; clients get plain participant tokens.
    pub async fn meeting_token(
        &self,
        room_name: &str,
        is_owner: bool,
    ) -> Result<String, DailyError> {
        let body = MeetingTokenRequest {
            properties: MeetingTokenProperties {
                room_name: room_name.to_string(),
                is_owner,
                exp: self.expiry_timestamp(),
            },
        };

        let response = self
            .http
            .post(format!("{}/meeting-tokens", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DailyError::RequestFailed(e.to_string()))?;

        let token: MeetingTokenResponse = decode_response(response, Some(room_name)).await?;
        debug!(room = room_name, is_owner, "Minted meeting token");
        Ok(token.token)
    }

    /// Provision a full session: a room (fresh, or the given fixed one) plus
    /// an owner token for the bot.
    pub async fn provision_session(
        &self,
        fixed_room_url: Option<&str>,
    ) -> Result<SessionDescriptor, DailyError> {
        let (room_name, room_url) = match fixed_room_url {
            Some(url) => {
                let name = room_name_from_url(url)?;
                // Validate the fixed room still exists before handing it out
                self.get_room(&name).await?
            }
            None => self.create_room().await?,
        };

        let token = self.meeting_token(&room_name, true).await?;
        Ok(SessionDescriptor {
            room_name,
            room_url,
            token,
            expires_at: self.expiry_timestamp(),
        })
    }
}

/// Decode a Daily REST response, mapping error statuses onto `DailyError`.
async fn decode_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    room_name: Option<&str>,
) -> Result<T, DailyError> {
    let status = response.status();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(DailyError::Unauthorized),
        StatusCode::NOT_FOUND => Err(DailyError::RoomNotFound(
            room_name.unwrap_or("<unnamed>").to_string(),
        )),
        s if s.is_success() => response
            .json::<T>()
            .await
            .map_err(|e| DailyError::InvalidResponse(e.to_string())),
        s => {
            let body = response.text().await.unwrap_or_default();
            Err(DailyError::RequestFailed(format!("HTTP {s}: {body}")))
        }
    }
}

/// Extract the room name from a Daily room URL
/// (e.g. `https://example.daily.co/my-room` -> `my-room`).
pub fn room_name_from_url(room_url: &str) -> Result<String, DailyError> {
    let url =
        Url::parse(room_url).map_err(|e| DailyError::InvalidRoomUrl(format!("{room_url}: {e}")))?;
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(|name| name.to_string())
        .ok_or_else(|| DailyError::InvalidRoomUrl(format!("{room_url}: no room name in path")))
}
