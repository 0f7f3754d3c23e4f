pub mod story_dto;
pub mod webhook_dto;
