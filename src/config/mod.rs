//! Configuration module for the frontdesk server
//!
//! Configuration is loaded from environment variables (with `.env` support via
//! dotenvy). Provider API keys are required and validated at load time so the
//! server fails fast at startup instead of failing mid-call.
//!
//! # Modules
//! - `env`: Environment variable loading
//! - `validation`: Configuration validation logic

use std::path::PathBuf;

mod env;
pub(crate) mod validation;

pub use validation::ConfigError;

/// Server configuration
///
/// Contains everything the supervisor needs to run:
/// - Server settings (host, port)
/// - Daily REST API settings (key, API URL, optional fixed sample room)
/// - Provider API keys forwarded to bot subprocesses (OpenAI, Cartesia)
/// - Bot subprocess settings (program path, token expiry)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // Daily settings
    pub daily_api_key: String,
    pub daily_api_url: String,
    /// When set, bots join this room instead of provisioning a fresh one.
    pub daily_sample_room_url: Option<String>,

    // Provider API keys (consumed by the bot subprocess)
    pub openai_api_key: String,
    pub openai_model: String,
    pub cartesia_api_key: String,
    pub cartesia_voice_id: String,

    // Bot subprocess settings
    /// Path to the bot executable. When `None`, the supervisor looks for a
    /// `frontdesk-bot` binary next to its own executable.
    pub bot_program: Option<PathBuf>,
    /// Lifetime of provisioned rooms and meeting tokens, in seconds.
    pub token_expiry_seconds: u64,
}

impl ServerConfig {
    /// Get the server address as a string in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolve the bot program path.
    ///
    /// Falls back to a `frontdesk-bot` binary located in the same directory
    /// as the running executable.
    pub fn bot_program(&self) -> Result<PathBuf, ConfigError> {
        if let Some(program) = &self.bot_program {
            return Ok(program.clone());
        }
        let exe = std::env::current_exe()
            .map_err(|e| ConfigError::Invalid(format!("cannot locate current executable: {e}")))?;
        let dir = exe.parent().ok_or_else(|| {
            ConfigError::Invalid("current executable has no parent directory".to_string())
        })?;
        Ok(dir.join("frontdesk-bot"))
    }
}
