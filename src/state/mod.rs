use std::sync::Arc;

use crate::config::ServerConfig;
use crate::daily::DailyRestClient;
use crate::supervisor::BotRegistry;

/// Application state that can be shared across handlers
pub struct AppState {
    pub config: ServerConfig,
    /// REST client for Daily room and token provisioning
    pub daily: Arc<DailyRestClient>,
    /// Registry of supervised bot subprocesses
    pub bots: Arc<BotRegistry>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Arc<Self> {
        let daily = Arc::new(DailyRestClient::new(
            config.daily_api_url.clone(),
            config.daily_api_key.clone(),
            config.token_expiry_seconds,
        ));

        Arc::new(Self {
            config,
            daily,
            bots: Arc::new(BotRegistry::new()),
        })
    }
}
