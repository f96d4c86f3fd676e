//! Transport seam for the conversational pipeline.
//!
//! The transport provider owns audio capture, voice-activity detection and
//! transcription; the pipeline only sees participant lifecycle events and
//! finished transcript fragments, and pushes synthesized speech back out.

use async_trait::async_trait;

use crate::tts::AudioData;

/// Transport-side errors. Never retried by the pipeline; they terminate the
/// bot process.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Not connected to room")]
    NotConnected,

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

/// Events delivered by the room transport to the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    ParticipantJoined { identity: String },
    ParticipantLeft { identity: String },
    /// A transcript fragment from the provider-side transcription.
    /// Interim fragments carry `is_final: false` and are ignored by the
    /// pipeline.
    Transcript { text: String, is_final: bool },
    /// The room was closed by the provider.
    Closed,
}

/// One room's duplex connection: events in, synthesized speech out.
#[async_trait]
pub trait Transport: Send {
    /// Wait for the next event. `Ok(None)` means the connection has ended
    /// and no further events will arrive.
    async fn next_event(&mut self) -> Result<Option<TransportEvent>, TransportError>;

    /// Emit synthesized speech into the room.
    async fn send_speech(&mut self, audio: AudioData) -> Result<(), TransportError>;

    /// Leave the room and tear down the connection.
    async fn close(&mut self) -> Result<(), TransportError>;
}
