//! Text-to-speech seam and the Cartesia implementation.
//!
//! The pipeline talks to a `SpeechSynthesizer`; the shipped implementation
//! calls the Cartesia REST bytes endpoint and returns raw PCM for the
//! transport to publish.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

/// Default Cartesia REST endpoint for one-shot synthesis.
pub const CARTESIA_TTS_URL: &str = "https://api.cartesia.ai/tts/bytes";

const CARTESIA_VERSION: &str = "2024-06-10";
const DEFAULT_MODEL: &str = "sonic-english";
const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// Synthesized audio returned by a TTS provider.
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Audio bytes in the format named by `format`
    pub data: Vec<u8>,
    pub sample_rate: u32,
    /// Audio encoding (e.g. "pcm_s16le")
    pub format: String,
}

/// TTS-specific error types
#[derive(Debug, thiserror::Error)]
pub enum TtsError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Audio generation failed: {0}")]
    GenerationFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Seam between the pipeline and the hosted TTS provider.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<AudioData, TtsError>;
}

/// Cartesia TTS client using the REST bytes endpoint.
///
/// One POST per utterance; the response body is the raw audio. No retries:
/// a failed synthesis propagates and terminates the bot.
pub struct CartesiaTts {
    http: Client,
    api_key: String,
    voice_id: String,
    url: String,
    sample_rate: u32,
}

impl CartesiaTts {
    pub fn new(api_key: String, voice_id: String) -> Result<Self, TtsError> {
        if api_key.trim().is_empty() {
            return Err(TtsError::InvalidConfig("empty Cartesia API key".into()));
        }
        Ok(Self {
            http: Client::new(),
            api_key,
            voice_id,
            url: CARTESIA_TTS_URL.to_string(),
            sample_rate: DEFAULT_SAMPLE_RATE,
        })
    }

    /// Override the endpoint URL (used against local stand-ins in tests).
    pub fn with_url(mut self, url: String) -> Self {
        self.url = url;
        self
    }

    fn request_body(&self, text: &str) -> serde_json::Value {
        json!({
            "model_id": DEFAULT_MODEL,
            "transcript": text,
            "voice": {
                "mode": "id",
                "id": self.voice_id,
            },
            "output_format": {
                "container": "raw",
                "encoding": "pcm_s16le",
                "sample_rate": self.sample_rate,
            },
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for CartesiaTts {
    async fn synthesize(&self, text: &str) -> Result<AudioData, TtsError> {
        debug!(chars = text.len(), "Synthesizing speech");

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .header("Cartesia-Version", CARTESIA_VERSION)
            .header("Content-Type", "application/json")
            .header("Accept", "application/octet-stream")
            .json(&self.request_body(text))
            .send()
            .await
            .map_err(|e| TtsError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TtsError::GenerationFailed(format!("HTTP {status}: {body}")));
        }

        let data = response
            .bytes()
            .await
            .map_err(|e| TtsError::Network(e.to_string()))?
            .to_vec();

        Ok(AudioData {
            data,
            sample_rate: self.sample_rate,
            format: "pcm_s16le".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let tts = CartesiaTts::new("key".into(), "voice-1".into()).unwrap();
        let body = tts.request_body("Hello there");
        assert_eq!(body["transcript"], "Hello there");
        assert_eq!(body["voice"]["id"], "voice-1");
        assert_eq!(body["output_format"]["encoding"], "pcm_s16le");
        assert_eq!(body["output_format"]["sample_rate"], 24_000);
    }

    #[test]
    fn test_empty_api_key_rejected() {
        assert!(CartesiaTts::new("  ".into(), "voice".into()).is_err());
    }
}
