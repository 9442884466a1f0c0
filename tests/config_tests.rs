//! Configuration document loading, write-back, and environment override
//! tests.
//!
//! Env-mutating tests are serialized with `serial_test` so parallel test
//! threads never observe each other's process environment.

use ad_carousel::config::{self, Config};
use serial_test::serial;
use std::fs;

#[test]
#[serial]
fn missing_document_is_generated_and_written_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("ad-carousel.json");

    let config = config::load_document(&path);

    // The documented sample: one rotation and a welcome message.
    assert_eq!(config.ads.len(), 1);
    assert!(config.welcome_message.is_some());
    assert_eq!(config.default_locale, "US");

    // Written back to disk with the documentation header.
    let written = fs::read_to_string(&path).expect("document exists after load");
    assert!(written.contains("_comment"));
    assert!(written.contains("welcome_message"));

    // A second load round-trips the generated document.
    let reloaded = config::load_document(&path);
    assert_eq!(reloaded.ads.len(), config.ads.len());
    assert_eq!(reloaded.server_name, config.server_name);
}

#[test]
#[serial]
fn near_empty_document_is_replaced_with_the_default() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("ad-carousel.json");
    fs::write(&path, "{}").expect("write stub");

    let config = config::load_document(&path);

    assert_eq!(config.ads.len(), 1, "stub file should be treated as absent");
    let written = fs::read_to_string(&path).expect("document readable");
    assert!(written.len() > 50);
}

#[test]
#[serial]
fn malformed_document_degrades_to_defaults_and_is_preserved() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("ad-carousel.json");
    let garbage = "this is not json at all, but it is long enough to not look like a stub";
    fs::write(&path, garbage).expect("write garbage");

    let config = config::load_document(&path);

    // Built-in defaults, not the sample document.
    assert!(config.ads.is_empty());
    assert!(config.welcome_message.is_none());

    // The operator's file is left for them to fix.
    assert_eq!(fs::read_to_string(&path).expect("readable"), garbage);
}

#[test]
#[serial]
fn existing_document_loads_verbatim() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("ad-carousel.json");

    let json = r#"{
        "use_center_overlay": true,
        "overlay_duration": 3.5,
        "server_name": "Prod",
        "server_subname": "EU",
        "default_locale": "DE",
        "ads": [
            { "interval": 45.0, "messages": [{ "Chat": "hello {SERVERNAME}" }] },
            { "interval": 90.0, "messages": [{ "Center": "mid-screen" }] }
        ],
        "map_names": { "de_dust2": "Dust II" }
    }"#;
    fs::write(&path, json).expect("write document");

    let config = config::load_document(&path);

    assert!(config.use_center_overlay);
    assert_eq!(config.overlay_duration, 3.5);
    assert_eq!(config.server_name, "Prod");
    assert_eq!(config.default_locale, "DE");
    assert_eq!(config.ads.len(), 2);
    assert_eq!(config.ads[1].interval, 90.0);
    assert_eq!(
        config.map_names.get("de_dust2").map(String::as_str),
        Some("Dust II")
    );
    // Untouched fields keep their defaults.
    assert_eq!(config.tick_rate, 64);
}

#[test]
#[serial]
fn environment_variables_override_document_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("ad-carousel.json");
    fs::write(
        &path,
        r#"{ "server_name": "FromFile", "overlay_duration": 5.0, "extra": "pad out the stub threshold" }"#,
    )
    .expect("write document");

    std::env::set_var("AD_CAROUSEL__SERVER_NAME", "FromEnv");
    std::env::set_var("AD_CAROUSEL__OVERLAY_DURATION", "9.5");
    std::env::set_var("AD_CAROUSEL__LOGGING__LEVEL", "debug");

    let config = config::load_document(&path);

    std::env::remove_var("AD_CAROUSEL__SERVER_NAME");
    std::env::remove_var("AD_CAROUSEL__OVERLAY_DURATION");
    std::env::remove_var("AD_CAROUSEL__LOGGING__LEVEL");

    assert_eq!(config.server_name, "FromEnv");
    assert_eq!(config.overlay_duration, 9.5);
    assert_eq!(config.logging.level, Some(config::LogLevel::Debug));
}

#[test]
#[serial]
fn inline_json_env_var_takes_precedence_over_the_document() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("ad-carousel.json");
    fs::write(
        &path,
        r#"{ "server_name": "FromFile", "note": "long enough to not be a stub" }"#,
    )
    .expect("write document");

    std::env::set_var(
        "AD_CAROUSEL_CONFIG_JSON",
        r#"{ "server_name": "Inline", "default_locale": "FR" }"#,
    );

    let config = config::load_document(&path);

    std::env::remove_var("AD_CAROUSEL_CONFIG_JSON");

    assert_eq!(config.server_name, "Inline");
    assert_eq!(config.default_locale, "FR");
}

#[test]
#[serial]
fn write_default_document_creates_parent_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested/config/ad-carousel.json");

    config::write_default_document(&path, &Config::default()).expect("write succeeds");
    assert!(path.exists());
}
