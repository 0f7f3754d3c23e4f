pub mod fallback;
pub mod health;
pub mod proxy;
pub mod story;
pub mod telegram;
