// Policy file loading for the moderation pipeline.

pub mod json_config;

pub use json_config::{load_moderation_config, save_moderation_config};
