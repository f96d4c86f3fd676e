//! Daily room transport over the WebSocket signaling channel.
//!
//! The bot joins the room as a participant, receives transcription events
//! (Daily-side STT and VAD; the bot never touches raw inbound audio) and
//! publishes synthesized speech as base64 payloads on the same channel.
//!
//! Messages are JSON, tagged by a `type` field. Unknown event types are
//! ignored so new provider events do not break the bot.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tracing::{debug, info, warn};
use url::Url;

use crate::pipeline::transport::{Transport, TransportError, TransportEvent};
use crate::tts::AudioData;

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type WsStream = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

// =============================================================================
// Wire messages
// =============================================================================

/// Messages sent from the bot to the room.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum ClientMessage<'a> {
    Join { token: &'a str, user_name: &'a str },
    Audio { data: String, sample_rate: u32, format: &'a str },
    Leave,
}

/// Messages received from the room.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum ServerEvent {
    ParticipantJoined {
        participant_id: String,
    },
    ParticipantLeft {
        participant_id: String,
    },
    TranscriptionMessage {
        text: String,
        #[serde(default)]
        is_final: bool,
    },
    RoomClosed,
    Error {
        message: String,
    },
    /// Any event type this bot does not care about.
    #[serde(other)]
    Ignored,
}

// =============================================================================
// DailyTransport
// =============================================================================

/// WebSocket transport for one Daily room.
pub struct DailyTransport {
    sink: WsSink,
    stream: WsStream,
    bot_name: String,
}

impl DailyTransport {
    /// Connect to a room and announce the bot as a participant.
    ///
    /// The signaling endpoint is derived from the room URL by switching the
    /// scheme to WebSocket.
    pub async fn connect(
        room_url: &str,
        token: &str,
        bot_name: &str,
    ) -> Result<Self, TransportError> {
        let ws_url = signaling_url(room_url)?;
        info!(url = %ws_url, "Connecting to Daily room");

        let (ws, _) = connect_async(ws_url.as_str())
            .await
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        let (mut sink, stream) = ws.split();

        let join = ClientMessage::Join {
            token,
            user_name: bot_name,
        };
        let payload = serde_json::to_string(&join)
            .map_err(|e| TransportError::Protocol(e.to_string()))?;
        sink.send(Message::text(payload))
            .await
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            sink,
            stream,
            bot_name: bot_name.to_string(),
        })
    }
}

#[async_trait]
impl Transport for DailyTransport {
    async fn next_event(&mut self) -> Result<Option<TransportEvent>, TransportError> {
        while let Some(message) = self.stream.next().await {
            let message = message.map_err(|e| TransportError::Protocol(e.to_string()))?;
            match message {
                Message::Text(text) => {
                    let event: ServerEvent = match serde_json::from_str(&text) {
                        Ok(event) => event,
                        Err(e) => {
                            warn!("Undecodable room event, skipping: {}", e);
                            continue;
                        }
                    };
                    match event {
                        ServerEvent::ParticipantJoined { participant_id } => {
                            debug!(participant = %participant_id, "Participant joined");
                            return Ok(Some(TransportEvent::ParticipantJoined {
                                identity: participant_id,
                            }));
                        }
                        ServerEvent::ParticipantLeft { participant_id } => {
                            debug!(participant = %participant_id, "Participant left");
                            return Ok(Some(TransportEvent::ParticipantLeft {
                                identity: participant_id,
                            }));
                        }
                        ServerEvent::TranscriptionMessage { text, is_final } => {
                            return Ok(Some(TransportEvent::Transcript { text, is_final }));
                        }
                        ServerEvent::RoomClosed => return Ok(Some(TransportEvent::Closed)),
                        ServerEvent::Error { message } => {
                            return Err(TransportError::Protocol(message));
                        }
                        ServerEvent::Ignored => continue,
                    }
                }
                Message::Close(_) => return Ok(Some(TransportEvent::Closed)),
                // Ping/pong handled by tungstenite; binary frames are not
                // part of the signaling protocol.
                _ => continue,
            }
        }
        Ok(None)
    }

    async fn send_speech(&mut self, audio: AudioData) -> Result<(), TransportError> {
        let message = ClientMessage::Audio {
            data: BASE64.encode(&audio.data),
            sample_rate: audio.sample_rate,
            format: &audio.format,
        };
        let payload = serde_json::to_string(&message)
            .map_err(|e| TransportError::Protocol(e.to_string()))?;
        self.sink
            .send(Message::text(payload))
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        debug!(bot = %self.bot_name, "Leaving room");
        let payload = serde_json::to_string(&ClientMessage::Leave)
            .map_err(|e| TransportError::Protocol(e.to_string()))?;
        // Best effort: the room may already be gone.
        let _ = self.sink.send(Message::text(payload)).await;
        let _ = self.sink.close().await;
        Ok(())
    }
}

/// Derive the room's WebSocket signaling URL from its HTTP URL.
fn signaling_url(room_url: &str) -> Result<Url, TransportError> {
    let mut url = Url::parse(room_url)
        .map_err(|e| TransportError::ConnectionFailed(format!("{room_url}: {e}")))?;
    let scheme = match url.scheme() {
        "https" | "wss" => "wss",
        "http" | "ws" => "ws",
        other => {
            return Err(TransportError::ConnectionFailed(format!(
                "unsupported scheme: {other}"
            )));
        }
    };
    url.set_scheme(scheme)
        .map_err(|_| TransportError::ConnectionFailed(format!("{room_url}: bad scheme")))?;
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signaling_url_switches_scheme() {
        assert_eq!(
            signaling_url("https://example.daily.co/my-room")
                .unwrap()
                .as_str(),
            "wss://example.daily.co/my-room"
        );
        assert_eq!(
            signaling_url("http://localhost:7860/demo").unwrap().as_str(),
            "ws://localhost:7860/demo"
        );
    }

    #[test]
    fn test_server_event_ignores_unknown_types() {
        let event: ServerEvent =
            serde_json::from_str(r#"{"type":"network-quality","quality":"good"}"#).unwrap();
        assert!(matches!(event, ServerEvent::Ignored));
    }

    #[test]
    fn test_transcription_event_decodes() {
        let event: ServerEvent = serde_json::from_str(
            r#"{"type":"transcription-message","text":"hello","is_final":true}"#,
        )
        .unwrap();
        match event {
            ServerEvent::TranscriptionMessage { text, is_final } => {
                assert_eq!(text, "hello");
                assert!(is_final);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
