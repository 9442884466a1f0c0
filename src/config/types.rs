//! Root configuration types.

use super::ads::{AdGroup, WelcomeSpec};
use super::defaults::{
    default_locale, default_overlay_duration, default_server_name, default_show_overlay_when_dead,
    default_tick_rate, default_use_center_overlay,
};
use super::logging::LoggingConfig;
use crate::template::LocalizationTable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Root configuration document: one generation of engine settings.
///
/// A generation is immutable once loaded. Reload produces a brand-new value
/// that replaces the old one wholesale; nothing ever mutates a live
/// generation in place.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// Route broadcast `Center` messages to the timed overlay surface instead
    /// of plain center text.
    #[serde(default = "default_use_center_overlay")]
    pub use_center_overlay: bool,
    /// Seconds an overlay stays on screen.
    #[serde(default = "default_overlay_duration")]
    pub overlay_duration: f32,
    /// Keep refreshing overlays for participants who are not alive.
    #[serde(default = "default_show_overlay_when_dead")]
    pub show_overlay_when_dead: bool,
    /// Host ticks per second; the overlay clock counts in ticks.
    #[serde(default = "default_tick_rate")]
    pub tick_rate: u32,
    /// One-time message for newly connected participants; absent disables it.
    #[serde(default)]
    pub welcome_message: Option<WelcomeSpec>,
    /// Independently timed rotations.
    #[serde(default)]
    pub ads: Vec<AdGroup>,
    /// `{SERVERNAME}` source.
    #[serde(default = "default_server_name")]
    pub server_name: String,
    /// `{SERVERSUBNAME}` source.
    #[serde(default)]
    pub server_subname: String,
    /// Fallback locale for participants without a resolved country.
    #[serde(default = "default_locale")]
    pub default_locale: String,
    /// Tag name -> locale -> localized text.
    #[serde(default)]
    pub locale_messages: LocalizationTable,
    /// Raw map identifier -> friendly display name.
    #[serde(default)]
    pub map_names: HashMap<String, String>,
    /// Overrides the host-reported address for the `{IP}` placeholder.
    #[serde(default)]
    pub ip_override: Option<String>,
    /// Path to the local address-prefix country database; absent disables
    /// geolocation and everyone gets the default locale.
    #[serde(default)]
    pub geo_database: Option<PathBuf>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub version: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            use_center_overlay: default_use_center_overlay(),
            overlay_duration: default_overlay_duration(),
            show_overlay_when_dead: default_show_overlay_when_dead(),
            tick_rate: default_tick_rate(),
            welcome_message: None,
            ads: Vec::new(),
            server_name: default_server_name(),
            server_subname: String::new(),
            default_locale: default_locale(),
            locale_messages: LocalizationTable::new(),
            map_names: HashMap::new(),
            ip_override: None,
            geo_database: None,
            logging: LoggingConfig::default(),
            version: 0,
        }
    }
}
