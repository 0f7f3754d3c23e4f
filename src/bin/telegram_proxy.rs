use telegram_relay::{app, config::Config, logging, AppState};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let config = Config::from_env()?;

    // Inbound credentials reach the upstream unless explicitly stripped.
    if config.proxy_strip_headers.is_empty() {
        warn!("Proxy forwards all end-to-end headers, including Authorization; set PROXY_STRIP_HEADERS to drop any");
    } else {
        info!(headers = ?config.proxy_strip_headers, "Proxy strips configured headers");
    }
    if !config.bot_configured() {
        warn!("TELEGRAM_BOT_TOKEN not set; proxy target has no bot path");
    }

    let port = config.port;
    let state = AppState::new(config)?;
    info!("Telegram API proxy starting on port {}", port);
    app::serve(app::proxy_router(state), port).await
}
