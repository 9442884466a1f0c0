//! Configuration module for the advertisement engine.
//!
//! One JSON document describes everything a generation of the engine needs:
//! the ad rotations, the welcome message, overlay behavior, localization
//! tables, and logging. Loading never fails -- a missing or near-empty
//! document is replaced by a documented default that is written back to disk,
//! and a malformed one degrades to built-in defaults.
//!
//! # Module Structure
//!
//! - [`types`]: Root `Config` struct
//! - [`ads`]: Advertisement groups, message sets, welcome message
//! - [`logging`]: Logging configuration
//! - [`crate::config::loader`]: Document loading, write-back, env overrides
//! - [`crate::config::validation`]: Warn-level validation
//! - [`crate::config::defaults`]: Default value functions and the sample document

// Submodules
pub mod ads;
pub mod defaults;
pub mod loader;
pub mod logging;
pub mod types;
pub mod validation;

// Re-exports for convenience
pub use ads::{AdDestination, AdGroup, MessageSet, WelcomeKind, WelcomeSpec};

pub use loader::{load_document, write_default_document, ConfigError};

pub use logging::{LogFormat, LogLevel, LoggingConfig};

pub use types::Config;

pub use validation::{validate, ValidationError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();

        assert!(!config.use_center_overlay);
        assert_eq!(config.overlay_duration, 5.0);
        assert!(!config.show_overlay_when_dead);
        assert_eq!(config.tick_rate, 64);
        assert!(config.welcome_message.is_none());
        assert!(config.ads.is_empty());
        assert_eq!(config.default_locale, "US");
        assert_eq!(config.server_name, "Carousel");

        assert_eq!(config.logging.dir, "logs");
        assert_eq!(config.logging.filename, "ad-carousel.log");
        assert_eq!(config.logging.rotation, "daily");
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = defaults::sample_config();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(config.ads.len(), deserialized.ads.len());
        assert_eq!(config.server_name, deserialized.server_name);
        assert_eq!(config.server_subname, deserialized.server_subname);
        assert_eq!(
            config.welcome_message.as_ref().map(|w| w.display_delay),
            deserialized.welcome_message.as_ref().map(|w| w.display_delay)
        );
        assert_eq!(config.locale_messages, deserialized.locale_messages);
        assert_eq!(config.map_names, deserialized.map_names);
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let json = r#"{
            "server_name": "Prod",
            "ads": [
                { "interval": 30.0, "messages": [{ "Chat": "hi" }] }
            ]
        }"#;

        let config: Config = serde_json::from_str(json).expect("parse should succeed");
        assert_eq!(config.server_name, "Prod");
        assert_eq!(config.ads.len(), 1);
        // Non-specified fields remain at defaults
        assert_eq!(config.tick_rate, 64);
        assert_eq!(config.default_locale, "US");
        assert!(!config.use_center_overlay);
    }

    #[test]
    fn test_unknown_fields_are_tolerated() {
        // Write-back documents carry a leading "_comment" array.
        let json = r#"{ "_comment": ["docs"], "server_name": "X" }"#;
        let config: Config = serde_json::from_str(json).expect("parse should succeed");
        assert_eq!(config.server_name, "X");
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::Trace.to_string(), "trace");
        assert_eq!(LogLevel::Debug.to_string(), "debug");
        assert_eq!(LogLevel::Info.to_string(), "info");
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert_eq!(LogLevel::Error.to_string(), "error");
    }
}
