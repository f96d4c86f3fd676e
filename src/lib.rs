pub mod bot;
pub mod config;
pub mod daily;
pub mod directory;
pub mod errors;
pub mod handlers;
pub mod llm;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod supervisor;
pub mod tools;
pub mod tts;

// Re-export commonly used items for convenience
pub use config::ServerConfig;
pub use errors::app_error::{AppError, AppResult};
pub use state::AppState;
