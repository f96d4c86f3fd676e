use std::env;

/// Errors produced while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingKey(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Read a required environment variable.
///
/// Empty values are treated the same as unset ones so that a blank line in a
/// `.env` file does not mask a missing credential.
pub fn require_key(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingKey(name)),
    }
}
