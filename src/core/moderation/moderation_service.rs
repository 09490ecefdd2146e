// Auto-moderation pipeline - core business logic for outgoing chat messages.
//
// Every message runs through the same ordered checks:
// 1. Duplicate detection (always on, compares against the sender's last message)
// 2. Profanity masking (transforms, never blocks)
// 3. Rate limiting (blocks)
// 4. Caps normalization (transforms)
// Then the original text is recorded in the sender's history.
//
// NO transport or UI dependencies here - just pure domain logic.

use super::moderation_config::{FilterToggle, ModerationConfig, ModerationToggles};
use super::moderation_models::{ModerationVerdict, ReasonCode, SenderModerationState};
use super::similarity::similarity;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Replacement for every blocked term, whatever its length.
pub const PROFANITY_MASK: &str = "***";

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModerationError {
    #[error("Message text is empty")]
    EmptyMessage,
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// Moderation pipeline that owns all per-sender state.
///
/// **DashMap:** evaluating a message holds that sender's entry for the whole
/// read-modify-write, so two tasks can't interleave on the same sender while
/// different senders proceed independently.
pub struct ModerationPipeline {
    config: ModerationConfig,
    profanity_filter: AtomicBool,
    rate_limit: AtomicBool,
    caps_normalization: AtomicBool,
    /// Sender id -> state, created on first message
    senders: DashMap<String, SenderModerationState>,
}

impl ModerationPipeline {
    /// Create a pipeline. Blocked terms are normalized on the way in.
    pub fn new(mut config: ModerationConfig) -> Self {
        config.normalize_terms();
        let toggles = config.toggles;

        Self {
            config,
            profanity_filter: AtomicBool::new(toggles.profanity_filter_enabled),
            rate_limit: AtomicBool::new(toggles.rate_limit_enabled),
            caps_normalization: AtomicBool::new(toggles.caps_normalization_enabled),
            senders: DashMap::new(),
        }
    }

    /// The static part of the policy (toggles live separately, see `toggles`).
    pub fn config(&self) -> &ModerationConfig {
        &self.config
    }

    fn toggle_flag(&self, toggle: FilterToggle) -> &AtomicBool {
        match toggle {
            FilterToggle::Profanity => &self.profanity_filter,
            FilterToggle::RateLimit => &self.rate_limit,
            FilterToggle::CapsNormalization => &self.caps_normalization,
        }
    }

    /// Switch one filter on or off.
    pub fn set_filter(&self, toggle: FilterToggle, enabled: bool) {
        self.toggle_flag(toggle).store(enabled, Ordering::Relaxed);
        tracing::info!(filter = %toggle, enabled, "Moderation filter toggled");
    }

    /// Current state of the filter switches.
    pub fn toggles(&self) -> ModerationToggles {
        let mut toggles = ModerationToggles::default();
        for toggle in FilterToggle::ALL {
            toggles.set(toggle, self.toggle_flag(toggle).load(Ordering::Relaxed));
        }
        toggles
    }

    /// Snapshot of what we remember about a sender.
    pub fn sender_state(&self, sender_id: &str) -> Option<SenderModerationState> {
        self.senders.get(sender_id).map(|state| state.clone())
    }

    /// How many distinct senders have been seen.
    pub fn tracked_senders(&self) -> usize {
        self.senders.len()
    }

    /// Evaluate a message stamped with the current wall-clock time.
    #[allow(dead_code)]
    pub fn evaluate_now(
        &self,
        sender_id: &str,
        text: &str,
    ) -> Result<ModerationVerdict, ModerationError> {
        self.evaluate(sender_id, text, chrono::Utc::now().timestamp_millis())
    }

    /// Run one message through the pipeline and update the sender's state.
    ///
    /// # Arguments
    /// * `sender_id` - Opaque key; whoever calls decides if it's global or per-channel
    /// * `text` - What the sender typed
    /// * `now_ms` - Send time in ms, non-decreasing per sender
    ///
    /// # Returns
    /// A `ModerationVerdict`. Rejected messages are not recorded.
    pub fn evaluate(
        &self,
        sender_id: &str,
        text: &str,
        now_ms: i64,
    ) -> Result<ModerationVerdict, ModerationError> {
        if text.trim().is_empty() {
            return Err(ModerationError::EmptyMessage);
        }

        let toggles = self.toggles();
        let mut state = self.senders.entry(sender_id.to_string()).or_default();

        // Duplicate check runs regardless of toggles
        if let Some(reason) = self.check_duplicate(&state, text, now_ms) {
            tracing::debug!(sender_id, reason = %reason, "Duplicate message rejected");
            return Ok(ModerationVerdict::reject(text, reason));
        }

        let mut reason = ReasonCode::None;
        let mut working = text.to_string();

        if toggles.profanity_filter_enabled {
            if let Some(masked) = self.mask_blocked_terms(&working) {
                working = masked;
                reason = ReasonCode::Profanity;
            }
        }

        if toggles.rate_limit_enabled {
            state.prune_timestamps(now_ms, self.config.rate_window_ms);

            // The current message isn't counted yet
            if state.recent_timestamps.len() >= self.config.max_messages_per_window {
                tracing::info!(
                    sender_id,
                    count = state.recent_timestamps.len(),
                    "Sender rate limited"
                );
                return Ok(ModerationVerdict::reject(text, ReasonCode::RateLimited));
            }
        }

        // Shouting is measured on what was typed; masking only shapes the output
        if toggles.caps_normalization_enabled && self.is_shouting(text) {
            working = normalize_caps(&working);
        }

        // History keeps what was typed, not what gets published
        state.prune_timestamps(now_ms, self.config.rate_window_ms);
        state.record(text, now_ms);

        let verdict = ModerationVerdict::accept(text, working, reason);
        if verdict.was_transformed {
            tracing::debug!(sender_id, reason = %verdict.reason_code, "Message transformed");
        }
        Ok(verdict)
    }

    /// Compare against the sender's most recent message only.
    fn check_duplicate(
        &self,
        state: &SenderModerationState,
        text: &str,
        now_ms: i64,
    ) -> Option<ReasonCode> {
        let last = state.last_message()?;
        // A clock step backwards reads as "immediately after"
        let elapsed = now_ms.saturating_sub(last.sent_at_ms).max(0);

        if text == last.text {
            // Identical text is governed by the exact window alone
            return (elapsed < self.config.exact_duplicate_window_ms)
                .then_some(ReasonCode::DuplicateExact);
        }

        if elapsed < self.config.similar_duplicate_window_ms
            && similarity(text, &last.text) > self.config.similarity_threshold
        {
            return Some(ReasonCode::DuplicateSimilar);
        }

        None
    }

    /// Mask every blocked term found in `text`, or `None` if nothing matched.
    fn mask_blocked_terms(&self, text: &str) -> Option<String> {
        let masked = self
            .config
            .blocked_terms
            .iter()
            .fold(text.to_string(), |acc, term| replace_ignore_case(&acc, term));

        (masked != text).then_some(masked)
    }

    /// Long enough and with more uppercase than the threshold allows.
    fn is_shouting(&self, text: &str) -> bool {
        let length = text.chars().count();
        if length == 0 || length < self.config.min_length_for_caps_check {
            return false;
        }

        let uppercase = text.chars().filter(|c| c.is_uppercase()).count();
        uppercase as f64 / length as f64 > self.config.caps_ratio_threshold
    }
}

/// Blunt normalization: first char upper, everything else lower.
fn normalize_caps(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}

/// Case-fold one char for matching. Char-wise lower-casing has no context,
/// so the Greek final sigma is folded onto the regular one by hand.
fn fold_case(c: char) -> impl Iterator<Item = char> {
    c.to_lowercase().map(|l| if l == 'ς' { 'σ' } else { l })
}

/// Replace every case-insensitive occurrence of `term` with the mask.
/// Matching is char by char so the original casing and any surrounding
/// multi-byte text are preserved.
fn replace_ignore_case(text: &str, term: &str) -> String {
    let term: Vec<char> = term.chars().collect();
    if term.is_empty() {
        return text.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let matches = i + term.len() <= chars.len()
            && chars[i..i + term.len()]
                .iter()
                .zip(&term)
                .all(|(c, t)| fold_case(*c).eq(fold_case(*t)));

        if matches {
            out.push_str(PROFANITY_MASK);
            i += term.len();
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }

    out
}

// ============================================================================
// TESTS
// ============================================================================
