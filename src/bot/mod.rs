//! Bot process assembly.
//!
//! One bot process serves one call session. The supervisor passes the room
//! URL and meeting token on the command line; provider credentials come from
//! the environment and are validated before anything connects, so a missing
//! key fails the process at startup rather than mid-call.

use std::env;
use std::sync::Arc;

use tracing::info;

use crate::config::ConfigError;
use crate::config::validation::require_key;
use crate::daily::DailyTransport;
use crate::directory::StaticDirectory;
use crate::llm::OpenAiClient;
use crate::pipeline::{PipelineRunner, SessionEnd};
use crate::tools::ReceptionistTools;
use crate::tts::CartesiaTts;

/// Display name the bot joins the room with.
pub const BOT_NAME: &str = "Receptionist Bot";

/// Per-process bot configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub room_url: String,
    pub token: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub cartesia_api_key: String,
    pub cartesia_voice_id: String,
}

impl BotConfig {
    /// Build from the supervisor-provided room URL and token plus the
    /// provider keys in the environment.
    pub fn from_env(room_url: String, token: String) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            room_url,
            token,
            openai_api_key: require_key("OPENAI_API_KEY")?,
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
            cartesia_api_key: require_key("CARTESIA_API_KEY")?,
            cartesia_voice_id: env::var("CARTESIA_VOICE_ID")
                .unwrap_or_else(|_| "79a125e8-cd45-4c13-8a67-188112f4dd22".to_string()),
        })
    }
}

/// Wire up the providers and run the session to completion.
///
/// Any stage error propagates out and terminates the process; there is no
/// retry or graceful fallback beyond what the model itself says before the
/// failure.
pub async fn run(config: BotConfig) -> anyhow::Result<()> {
    let transport = DailyTransport::connect(&config.room_url, &config.token, BOT_NAME).await?;
    let llm = OpenAiClient::new(config.openai_api_key, config.openai_model);
    let tts = CartesiaTts::new(config.cartesia_api_key, config.cartesia_voice_id)?;
    let tools = Arc::new(ReceptionistTools::new(Arc::new(StaticDirectory::default())));

    let runner = PipelineRunner::new(
        Box::new(transport),
        Box::new(llm),
        Box::new(tts),
        tools.clone(),
    );

    let end = runner.run().await?;
    match end {
        SessionEnd::Transferred => info!("Session ended: call transferred"),
        SessionEnd::Disconnected => info!("Session ended: caller disconnected"),
    }

    // Messages live only as long as this process; surface them in the log
    // before exit so they are not silently lost.
    for message in tools.messages() {
        info!(person = %message.person_name, message = %message.message, "Recorded message");
    }

    Ok(())
}
