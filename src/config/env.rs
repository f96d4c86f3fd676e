use std::env;
use std::path::PathBuf;

use super::ServerConfig;
use super::validation::{ConfigError, require_key};

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Reads configuration from environment variables, with sensible defaults.
    /// Also loads from a `.env` file if present using dotenvy.
    ///
    /// # Errors
    /// Returns an error if:
    /// - `PORT` or `TOKEN_EXPIRY_SECONDS` are malformed
    /// - Any required provider API key is missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        // Server configuration
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "7860".to_string())
            .parse::<u16>()
            .map_err(|e| ConfigError::Invalid(format!("Invalid port number: {e}")))?;

        // Daily configuration
        let daily_api_key = require_key("DAILY_API_KEY")?;
        let daily_api_url =
            env::var("DAILY_API_URL").unwrap_or_else(|_| "https://api.daily.co/v1".to_string());
        let daily_sample_room_url = env::var("DAILY_SAMPLE_ROOM_URL").ok();

        // Provider API keys
        let openai_api_key = require_key("OPENAI_API_KEY")?;
        let openai_model = env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());
        let cartesia_api_key = require_key("CARTESIA_API_KEY")?;
        // Default voice: Cartesia "British Lady"
        let cartesia_voice_id = env::var("CARTESIA_VOICE_ID")
            .unwrap_or_else(|_| "79a125e8-cd45-4c13-8a67-188112f4dd22".to_string());

        // Bot subprocess configuration
        let bot_program = env::var("BOT_PROGRAM").ok().map(PathBuf::from);
        let token_expiry_seconds = env::var("TOKEN_EXPIRY_SECONDS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse::<u64>()
            .map_err(|e| ConfigError::Invalid(format!("Invalid token expiry: {e}")))?;

        Ok(ServerConfig {
            host,
            port,
            daily_api_key,
            daily_api_url,
            daily_sample_room_url,
            openai_api_key,
            openai_model,
            cartesia_api_key,
            cartesia_voice_id,
            bot_program,
            token_expiry_seconds,
        })
    }
}
