#![cfg_attr(not(test), deny(clippy::panic))]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

//! # Ad Carousel
//!
//! A timed advertisement rotation and templated messaging engine for game
//! servers: round-robin broadcast rotations, one-shot localized welcome
//! messages, `{tag}` template resolution with per-participant locales, and a
//! tick-driven center-screen overlay with automatic expiry.
//!
//! The engine is host-agnostic: connect/disconnect/authorize/tick callbacks
//! and rendering surfaces arrive through the [`host::HostApi`] contract, and
//! everything else is driven by one serialized event stream.

/// Configuration document: ad groups, welcome message, overlay behavior,
/// localization tables
pub mod config;

/// Engine orchestration and the serialized event stream
pub mod engine;

/// Host collaborator contract: participants, rendering surfaces, server facts
pub mod host;

/// Participant locale resolution via the geolocation collaborator
pub mod locale;

/// Structured logging configuration
pub mod logging;

/// Per-participant overlay state machine
pub mod overlay;

/// Round-robin rotation cursors
pub mod rotation;

/// Message template resolution: localization, placeholders, colors
pub mod template;
