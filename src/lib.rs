pub mod app;
pub mod config;
pub mod dto;
pub mod error;
pub mod extract;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::{
    config::Config,
    error::{Error, Result},
    services::{
        proxy_service::ProxyService,
        story_service::StoryService,
        telegram_service::{DeliveryHook, TelegramService},
    },
};
use reqwest::Client;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub telegram_service: TelegramService,
    pub proxy_service: ProxyService,
    pub story_service: StoryService,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);
        // No timeout: a slow upstream holds only its own request open.
        let http_client = Client::builder()
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let telegram_service = TelegramService::new(config.clone(), http_client.clone());
        let proxy_service = ProxyService::new(&config, http_client);
        let story_service = StoryService::new();

        Ok(Self {
            config,
            telegram_service,
            proxy_service,
            story_service,
        })
    }

    /// Publishes the outcome of every echo delivery on `hook`.
    pub fn with_delivery_hook(mut self, hook: DeliveryHook) -> Self {
        self.telegram_service = self.telegram_service.with_delivery_hook(hook);
        self
    }
}
