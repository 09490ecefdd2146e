// JSON policy file for the moderation pipeline.
//
// Every field is optional; anything missing falls back to the defaults in
// ModerationConfig. Example:
// { "blocked_terms": ["spam", "scam"], "max_messages_per_window": 5 }

use crate::core::moderation::{ConfigError, ModerationConfig};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Read, normalize and validate a moderation policy file.
pub fn load_moderation_config(path: impl AsRef<Path>) -> Result<ModerationConfig, ConfigError> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    let mut config: ModerationConfig = serde_json::from_reader(reader)?;
    config.normalize_terms();
    config.validate()?;
    Ok(config)
}

/// Write a policy file (pretty-printed), e.g. to bootstrap one from defaults.
#[allow(dead_code)]
pub fn save_moderation_config(
    path: impl AsRef<Path>,
    config: &ModerationConfig,
) -> Result<(), ConfigError> {
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, config)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(
            tmp,
            r#"{{ "blocked_terms": ["Scam", "scam", "phish"], "rate_window_ms": 30000, "caps_normalization_enabled": false }}"#
        )
        .unwrap();

        let config = load_moderation_config(tmp.path()).unwrap();
        assert_eq!(config.blocked_terms, vec!["scam", "phish"]);
        assert_eq!(config.rate_window_ms, 30_000);
        assert_eq!(config.max_messages_per_window, 10);
        assert!(!config.toggles.caps_normalization_enabled);
        assert!(config.toggles.profanity_filter_enabled);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, r#"{{ "caps_ratio_threshold": 2.0 }}"#).unwrap();

        assert!(matches!(
            load_moderation_config(tmp.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "not json").unwrap();

        assert!(matches!(
            load_moderation_config(tmp.path()),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_owned();
        drop(tmp);

        assert!(matches!(
            load_moderation_config(&path),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_save_then_load() {
        let tmp = NamedTempFile::new().unwrap();
        let config = ModerationConfig {
            max_messages_per_window: 4,
            ..Default::default()
        };

        save_moderation_config(tmp.path(), &config).unwrap();
        let loaded = load_moderation_config(tmp.path()).unwrap();
        assert_eq!(loaded, config);
    }
}
