//! Advertisement and welcome-message configuration types.

use super::defaults::{default_welcome_delay, default_welcome_kind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Broadcast destination for one line of a message set.
///
/// Ordered so message sets iterate deterministically (chat before center)
/// within a single firing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum AdDestination {
    /// One line in the chat area.
    Chat,
    /// Center-screen text; routed to the overlay surface when the global
    /// overlay mode is on.
    Center,
}

/// One unit of rotation content: destination kind -> raw template.
pub type MessageSet = BTreeMap<AdDestination, String>;

/// One independently timed rotation of message sets.
///
/// Declarative only: the rotation cursor is runtime state owned by the
/// engine, never part of the configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdGroup {
    /// Seconds between firings.
    pub interval: f32,
    /// Ordered rotation content; consumed round-robin.
    #[serde(default)]
    pub messages: Vec<MessageSet>,
}

/// Destination for the one-shot welcome message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum WelcomeKind {
    #[default]
    Chat,
    /// Plain center text, no refresh loop.
    Center,
    /// Timed overlay, driven by the per-tick refresh machinery.
    CenterOverlay,
}

/// One-time personalized message for newly connected participants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeSpec {
    #[serde(default = "default_welcome_kind")]
    pub kind: WelcomeKind,
    /// Raw template; `{PLAYERNAME}` resolves here and nowhere else.
    pub message: String,
    /// Seconds between the connect event and delivery.
    #[serde(default = "default_welcome_delay")]
    pub display_delay: f32,
}
