pub mod proxy_service;
pub mod story_service;
pub mod telegram_service;
