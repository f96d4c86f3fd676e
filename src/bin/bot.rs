use std::env;

use anyhow::anyhow;

use frontdesk::bot::{self, BotConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Initialize crypto provider for TLS connections
    // This must be done before any TLS connections are attempted
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Failed to install default crypto provider"))?;

    // Parse command line arguments supplied by the supervisor
    let mut room_url: Option<String> = None;
    let mut token: Option<String> = None;

    let mut args = env::args();
    let _ = args.next();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-u" | "--room-url" => {
                room_url = Some(args.next().ok_or_else(|| anyhow!("--room-url requires a value"))?);
            }
            "-t" | "--token" => {
                token = Some(args.next().ok_or_else(|| anyhow!("--token requires a value"))?);
            }
            other => {
                anyhow::bail!("Unknown option '{other}'. Use --room-url <url> --token <token>");
            }
        }
    }

    let room_url = room_url.ok_or_else(|| anyhow!("--room-url is required"))?;
    let token = token.ok_or_else(|| anyhow!("--token is required"))?;

    let config = BotConfig::from_env(room_url, token).map_err(|e| anyhow!(e.to_string()))?;
    bot::run(config).await
}
