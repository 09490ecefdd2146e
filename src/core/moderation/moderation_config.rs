// Policy configuration for the moderation pipeline.
//
// Thresholds and blocked terms are fixed at construction. The three filter
// toggles are the only knobs meant to change at runtime (see FilterToggle).

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid moderation config: {0}")]
    Invalid(String),
}

/// One of the runtime-switchable filters.
///
/// Duplicate detection has no switch: it is always on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterToggle {
    Profanity,
    RateLimit,
    CapsNormalization,
}

impl FilterToggle {
    pub const ALL: [FilterToggle; 3] = [
        FilterToggle::Profanity,
        FilterToggle::RateLimit,
        FilterToggle::CapsNormalization,
    ];

    /// Parse the short names used on the command line / env.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "profanity" | "profanity_filter" => Some(FilterToggle::Profanity),
            "ratelimit" | "rate_limit" | "rate" => Some(FilterToggle::RateLimit),
            "caps" | "caps_normalization" => Some(FilterToggle::CapsNormalization),
            _ => None,
        }
    }
}

impl std::fmt::Display for FilterToggle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterToggle::Profanity => write!(f, "profanity"),
            FilterToggle::RateLimit => write!(f, "ratelimit"),
            FilterToggle::CapsNormalization => write!(f, "caps"),
        }
    }
}

/// Snapshot of the filter switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationToggles {
    #[serde(default = "enabled")]
    pub profanity_filter_enabled: bool,
    #[serde(default = "enabled")]
    pub rate_limit_enabled: bool,
    #[serde(default = "enabled")]
    pub caps_normalization_enabled: bool,
}

impl ModerationToggles {
    pub fn is_enabled(&self, toggle: FilterToggle) -> bool {
        match toggle {
            FilterToggle::Profanity => self.profanity_filter_enabled,
            FilterToggle::RateLimit => self.rate_limit_enabled,
            FilterToggle::CapsNormalization => self.caps_normalization_enabled,
        }
    }

    pub fn set(&mut self, toggle: FilterToggle, enabled: bool) {
        match toggle {
            FilterToggle::Profanity => self.profanity_filter_enabled = enabled,
            FilterToggle::RateLimit => self.rate_limit_enabled = enabled,
            FilterToggle::CapsNormalization => self.caps_normalization_enabled = enabled,
        }
    }
}

impl Default for ModerationToggles {
    fn default() -> Self {
        Self {
            profanity_filter_enabled: true,
            rate_limit_enabled: true,
            caps_normalization_enabled: true,
        }
    }
}

/// Configuration for auto-moderation behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationConfig {
    /// Terms masked with `***` (matched case-insensitively)
    #[serde(default = "default_blocked_terms")]
    pub blocked_terms: Vec<String>,

    /// Maximum messages allowed in the rate window
    #[serde(default = "default_max_messages")]
    pub max_messages_per_window: usize,

    /// Rate window in milliseconds
    #[serde(default = "default_rate_window")]
    pub rate_window_ms: i64,

    /// Identical text inside this window is rejected
    #[serde(default = "default_exact_window")]
    pub exact_duplicate_window_ms: i64,

    /// Near-identical text inside this window is rejected
    #[serde(default = "default_similar_window")]
    pub similar_duplicate_window_ms: i64,

    /// Similarity above this counts as a duplicate
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Uppercase share above this triggers normalization
    #[serde(default = "default_caps_ratio")]
    pub caps_ratio_threshold: f64,

    /// Shorter messages are never caps-normalized
    #[serde(default = "default_min_caps_length")]
    pub min_length_for_caps_check: usize,

    #[serde(flatten)]
    pub toggles: ModerationToggles,
}

fn enabled() -> bool {
    true
}

fn default_blocked_terms() -> Vec<String> {
    vec![
        "spam".to_string(),
        "badword".to_string(),
        "offensive".to_string(),
    ]
}

fn default_max_messages() -> usize {
    10
}

fn default_rate_window() -> i64 {
    60_000 // 1 minute
}

fn default_exact_window() -> i64 {
    5_000
}

fn default_similar_window() -> i64 {
    10_000
}

fn default_similarity_threshold() -> f64 {
    0.8
}

fn default_caps_ratio() -> f64 {
    0.6
}

fn default_min_caps_length() -> usize {
    5
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            blocked_terms: default_blocked_terms(),
            max_messages_per_window: default_max_messages(), // 10 messages...
            rate_window_ms: default_rate_window(),           // ...per minute
            exact_duplicate_window_ms: default_exact_window(),
            similar_duplicate_window_ms: default_similar_window(),
            similarity_threshold: default_similarity_threshold(),
            caps_ratio_threshold: default_caps_ratio(),
            min_length_for_caps_check: default_min_caps_length(),
            toggles: ModerationToggles::default(),
        }
    }
}

impl ModerationConfig {
    /// Replace the blocked terms, normalizing them the way the pipeline expects.
    pub fn with_blocked_terms<I, T>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.blocked_terms = terms.into_iter().map(|t| t.as_ref().to_string()).collect();
        self.normalize_terms();
        self
    }

    /// Lower-case, trim, drop empties and de-duplicate while keeping order.
    pub fn normalize_terms(&mut self) {
        let mut seen = Vec::with_capacity(self.blocked_terms.len());
        for term in self.blocked_terms.drain(..) {
            let term = term.trim().to_lowercase();
            if !term.is_empty() && !seen.contains(&term) {
                seen.push(term);
            }
        }
        self.blocked_terms = seen;
    }

    /// Reject settings the pipeline can't sensibly run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::Invalid(format!(
                "similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.caps_ratio_threshold) {
            return Err(ConfigError::Invalid(format!(
                "caps_ratio_threshold must be within [0, 1], got {}",
                self.caps_ratio_threshold
            )));
        }
        if self.max_messages_per_window == 0 {
            return Err(ConfigError::Invalid(
                "max_messages_per_window must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("rate_window_ms", self.rate_window_ms),
            ("exact_duplicate_window_ms", self.exact_duplicate_window_ms),
            ("similar_duplicate_window_ms", self.similar_duplicate_window_ms),
        ] {
            if value <= 0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
