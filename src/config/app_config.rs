// Application configuration, loaded from environment variables (and `.env`).
//
// AUTOMOD_CONFIG_FILE          optional JSON policy file
// AUTOMOD_BLOCKED_TERMS        comma-separated, replaces the file's terms
// AUTOMOD_MAX_MESSAGES         messages allowed per rate window
// AUTOMOD_RATE_WINDOW_MS       rate window length
// AUTOMOD_PROFANITY_FILTER     on/off
// AUTOMOD_RATE_LIMIT           on/off
// AUTOMOD_CAPS_NORMALIZATION   on/off
// AUTOMOD_SCOPE                global | channel
// CHAT_SENDER                  starting identity (default "guest")
// CHAT_CHANNEL                 starting channel (default "general")

use crate::core::chat::ModerationScope;
use crate::core::moderation::{FilterToggle, ModerationConfig};
use crate::infra::moderation::load_moderation_config;
use anyhow::{anyhow, Context, Result};

const DEFAULT_SENDER: &str = "guest";
const DEFAULT_CHANNEL: &str = "general";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub moderation: ModerationConfig,
    pub scope: ModerationScope,
    pub sender_id: String,
    pub channel: String,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key -> value source (the env, or a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut moderation = match lookup("AUTOMOD_CONFIG_FILE").filter(|p| !p.trim().is_empty()) {
            Some(path) => load_moderation_config(&path)
                .with_context(|| format!("Failed to load moderation policy from {}", path))?,
            None => ModerationConfig::default(),
        };

        if let Some(terms) = lookup("AUTOMOD_BLOCKED_TERMS") {
            moderation = moderation.with_blocked_terms(terms.split(','));
        }

        if let Some(value) = lookup("AUTOMOD_MAX_MESSAGES") {
            moderation.max_messages_per_window = value
                .trim()
                .parse::<usize>()
                .with_context(|| format!("AUTOMOD_MAX_MESSAGES must be a count, got {:?}", value))?;
        }

        if let Some(value) = lookup("AUTOMOD_RATE_WINDOW_MS") {
            moderation.rate_window_ms = value.trim().parse::<i64>().with_context(|| {
                format!("AUTOMOD_RATE_WINDOW_MS must be milliseconds, got {:?}", value)
            })?;
        }

        for (key, toggle) in [
            ("AUTOMOD_PROFANITY_FILTER", FilterToggle::Profanity),
            ("AUTOMOD_RATE_LIMIT", FilterToggle::RateLimit),
            ("AUTOMOD_CAPS_NORMALIZATION", FilterToggle::CapsNormalization),
        ] {
            if let Some(value) = lookup(key) {
                let enabled = parse_switch(&value)
                    .ok_or_else(|| anyhow!("{} must be on/off, got {:?}", key, value))?;
                moderation.toggles.set(toggle, enabled);
            }
        }

        moderation
            .validate()
            .context("Invalid moderation policy after applying environment overrides")?;

        let scope = match lookup("AUTOMOD_SCOPE") {
            Some(value) => ModerationScope::parse(&value)
                .ok_or_else(|| anyhow!("AUTOMOD_SCOPE must be global or channel, got {:?}", value))?,
            None => ModerationScope::default(),
        };

        let sender_id = lookup("CHAT_SENDER")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SENDER.to_string());

        let channel = lookup("CHAT_CHANNEL")
            .map(|s| s.trim().trim_start_matches('#').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_CHANNEL.to_string());

        Ok(Self {
            moderation,
            scope,
            sender_id,
            channel,
        })
    }
}

/// Accept the usual spellings of a boolean switch.
pub fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" | "enabled" => Some(true),
        "0" | "false" | "off" | "no" | "disabled" => Some(false),
        _ => None,
    }
}
