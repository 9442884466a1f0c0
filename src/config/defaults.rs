//! Default value functions for configuration fields, used by serde's
//! `#[serde(default = ...)]` attributes, plus the documented sample
//! configuration written to disk when no document exists yet.

use super::ads::{AdDestination, AdGroup, MessageSet, WelcomeKind, WelcomeSpec};
use super::types::Config;
use std::collections::HashMap;

// =============================================================================
// Overlay Defaults
// =============================================================================

pub const fn default_use_center_overlay() -> bool {
    false
}

pub const fn default_overlay_duration() -> f32 {
    5.0
}

pub const fn default_show_overlay_when_dead() -> bool {
    false
}

/// Host ticks per second; overlay expiry is measured in ticks.
pub const fn default_tick_rate() -> u32 {
    64
}

// =============================================================================
// Welcome Defaults
// =============================================================================

pub const fn default_welcome_kind() -> WelcomeKind {
    WelcomeKind::Chat
}

pub const fn default_welcome_delay() -> f32 {
    2.0
}

// =============================================================================
// Identity Defaults
// =============================================================================

pub fn default_server_name() -> String {
    "Carousel".to_string()
}

pub fn default_locale() -> String {
    "US".to_string()
}

// =============================================================================
// Logging Defaults
// =============================================================================

pub fn default_log_dir() -> String {
    "logs".to_string()
}

pub fn default_log_filename() -> String {
    "ad-carousel.log".to_string()
}

pub fn default_rotation() -> String {
    "daily".to_string()
}

pub const fn default_enable_file_logging() -> bool {
    false
}

// =============================================================================
// Sample Document
// =============================================================================

/// The documented default configuration: written back to disk when the
/// configured document is missing or near-empty, and used as the running
/// configuration for that first launch.
pub fn sample_config() -> Config {
    let mut rotation_set = MessageSet::new();
    rotation_set.insert(
        AdDestination::Chat,
        "Try out {SERVERSUBNAME} - currently on {MAP}".to_string(),
    );
    rotation_set.insert(
        AdDestination::Center,
        "Thanks for playing on {SERVERNAME}!".to_string(),
    );

    Config {
        welcome_message: Some(WelcomeSpec {
            kind: WelcomeKind::Chat,
            message: "Welcome to {SERVERNAME} | {SERVERSUBNAME}, {BLUE}{PLAYERNAME}!".to_string(),
            display_delay: 5.0,
        }),
        ads: vec![AdGroup {
            interval: 60.0,
            messages: vec![rotation_set],
        }],
        server_name: "Carousel".to_string(),
        server_subname: "24/7 Surf Easy".to_string(),
        locale_messages: HashMap::from([(
            "map_name".to_string(),
            HashMap::from([("US".to_string(), "Map is {MAP}!".to_string())]),
        )]),
        map_names: HashMap::from([("surf_kitsune".to_string(), "Surf Kitsune".to_string())]),
        version: 1,
        ..Config::default()
    }
}
