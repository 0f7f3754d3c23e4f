use telegram_relay::{app, config::Config, logging, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let config = Config::from_env()?;

    let port = config.port;
    let state = AppState::new(config)?;
    info!("Story API stub starting on port {}", port);
    app::serve(app::story_router(state), port).await
}
