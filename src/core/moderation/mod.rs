// Core moderation module - contains the auto-moderation pipeline.

pub mod moderation_config;
pub mod moderation_models;
pub mod moderation_service;
pub mod similarity;

pub use moderation_config::*;
pub use moderation_models::*;
pub use moderation_service::*;
