//! Configuration validation.
//!
//! Validation never blocks startup: [`load_document`](super::loader::load_document)
//! always returns a usable configuration, and the scheduler independently
//! skips groups it cannot arm. These checks exist so `--validate-config` and
//! the reload command can tell an operator what will silently be ignored.

use super::ads::WelcomeKind;
use super::Config;

/// All problems found in one document, joined for display.
#[derive(Debug, thiserror::Error)]
#[error("configuration validation failed:\n{}", .issues.join("\n"))]
pub struct ValidationError {
    pub issues: Vec<String>,
}

pub fn validate(config: &Config) -> Result<(), ValidationError> {
    let mut issues = Vec::new();

    for (index, group) in config.ads.iter().enumerate() {
        if !(group.interval > 0.0) || !group.interval.is_finite() {
            issues.push(format!(
                "  ad group {index}: interval must be a positive number of seconds, got {}",
                group.interval
            ));
        }
        if group.messages.is_empty() {
            issues.push(format!(
                "  ad group {index}: no message sets; the group will never fire"
            ));
        }
        for (set_index, set) in group.messages.iter().enumerate() {
            if set.is_empty() {
                issues.push(format!(
                    "  ad group {index}: message set {set_index} has no destinations"
                ));
            }
        }
    }

    if config.tick_rate == 0 {
        issues.push("  tick_rate must be positive".to_string());
    }

    if config.use_center_overlay && !(config.overlay_duration > 0.0) {
        issues.push(format!(
            "  overlay_duration must be positive while use_center_overlay is on, got {}",
            config.overlay_duration
        ));
    }

    if let Some(welcome) = &config.welcome_message {
        if welcome.message.is_empty() {
            issues.push("  welcome_message.message is empty".to_string());
        }
        if welcome.display_delay < 0.0 || !welcome.display_delay.is_finite() {
            issues.push(format!(
                "  welcome_message.display_delay must be non-negative, got {}",
                welcome.display_delay
            ));
        }
        if welcome.kind == WelcomeKind::CenterOverlay && !(config.overlay_duration > 0.0) {
            issues.push(
                "  welcome_message uses CenterOverlay but overlay_duration is not positive"
                    .to_string(),
            );
        }
    }

    if config.default_locale.is_empty() {
        issues.push("  default_locale is empty".to_string());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { issues })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ads::{AdDestination, AdGroup, MessageSet, WelcomeSpec};
    use crate::config::defaults::sample_config;

    #[test]
    fn sample_document_validates_clean() {
        assert!(validate(&sample_config()).is_ok());
    }

    #[test]
    fn bad_interval_and_empty_group_are_reported() {
        let mut config = Config::default();
        config.ads.push(AdGroup {
            interval: 0.0,
            messages: Vec::new(),
        });

        let err = validate(&config).expect_err("should flag both issues");
        assert_eq!(err.issues.len(), 2);
        assert!(err.issues[0].contains("interval"));
        assert!(err.issues[1].contains("never fire"));
    }

    #[test]
    fn overlay_mode_requires_positive_duration() {
        let mut config = Config::default();
        config.use_center_overlay = true;
        config.overlay_duration = 0.0;

        let err = validate(&config).expect_err("should flag duration");
        assert!(err.to_string().contains("overlay_duration"));
    }

    #[test]
    fn negative_welcome_delay_is_reported() {
        let mut config = Config::default();
        config.welcome_message = Some(WelcomeSpec {
            kind: WelcomeKind::Chat,
            message: "hi".to_string(),
            display_delay: -1.0,
        });

        assert!(validate(&config).is_err());
    }

    #[test]
    fn empty_message_set_is_reported() {
        let mut config = Config::default();
        config.ads.push(AdGroup {
            interval: 30.0,
            messages: vec![MessageSet::new()],
        });

        let err = validate(&config).expect_err("should flag the empty set");
        assert!(err.issues.iter().any(|i| i.contains("no destinations")));

        // A populated set passes.
        let mut set = MessageSet::new();
        set.insert(AdDestination::Chat, "hello".to_string());
        config.ads[0].messages = vec![set];
        assert!(validate(&config).is_ok());
    }
}
