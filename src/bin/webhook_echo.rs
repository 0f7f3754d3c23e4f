use telegram_relay::{app, config::Config, logging, AppState};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let config = Config::from_env()?;

    if config.bot_configured() {
        info!("Bot token configured");
    } else {
        warn!("TELEGRAM_BOT_TOKEN not set! Echo replies and webhook management are disabled");
    }

    let port = config.port;
    let state = AppState::new(config)?;
    info!("Telegram webhook echo service starting on port {}", port);
    app::serve(app::webhook_router(state), port).await
}
