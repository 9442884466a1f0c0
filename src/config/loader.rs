//! Configuration document loading, write-back, and environment overrides.

use super::defaults::sample_config;
use super::Config;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Documents shorter than this are treated as stub files left by tooling and
/// replaced with the documented default.
const NEAR_EMPTY_THRESHOLD: u64 = 50;

/// Errors surfaced by the document helpers. [`load_document`] itself never
/// fails; these are logged and recovered from.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration at {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write default configuration to {}: {source}", .path.display())]
    WriteBack {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Load the configuration document with the following precedence:
/// 1) `AD_CAROUSEL_CONFIG_JSON` env var containing raw JSON
/// 2) The document at `path`; a missing or near-empty file triggers
///    generation of the documented default and a write-back to disk
/// 3) Defaults compiled into the binary (also used when the file is
///    malformed -- the malformed file is left untouched for the operator)
///
/// Individual fields can then be overridden by environment variables with
/// prefix `AD_CAROUSEL` and `__` as a nested separator, e.g.
/// `AD_CAROUSEL__SERVER_NAME=Prod` or `AD_CAROUSEL__LOGGING__LEVEL=debug`.
///
/// Never fails: every error degrades to a safe default and is logged.
#[must_use]
pub fn load_document(path: &Path) -> Config {
    let mut config = match std::env::var("AD_CAROUSEL_CONFIG_JSON") {
        Ok(raw) if !raw.trim().is_empty() => match serde_json::from_str::<Config>(&raw) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Inline configuration JSON malformed, falling back to the document");
                load_file_or_default(path)
            }
        },
        _ => load_file_or_default(path),
    };

    apply_env_overrides(&mut config);
    config
}

fn load_file_or_default(path: &Path) -> Config {
    if is_missing_or_near_empty(path) {
        let config = sample_config();
        match write_default_document(path, &config) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Created default configuration document");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not persist default configuration, continuing with it in memory");
            }
        }
        return config;
    }

    match read_document(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Using built-in defaults");
            Config::default()
        }
    }
}

fn is_missing_or_near_empty(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(meta) => meta.len() < NEAR_EMPTY_THRESHOLD,
        Err(_) => true,
    }
}

fn read_document(path: &Path) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize `config` to `path` with a leading `_comment` block documenting
/// how to edit and reload the file.
pub fn write_default_document(path: &Path, config: &Config) -> Result<(), ConfigError> {
    let document = build_document(config);
    let text = serde_json::to_string_pretty(&document).unwrap_or_default();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::WriteBack {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }

    fs::write(path, text).map_err(|source| ConfigError::WriteBack {
        path: path.to_path_buf(),
        source,
    })
}

fn build_document(config: &Config) -> Value {
    let mut document = serde_json::Map::new();
    document.insert(
        "_comment".to_string(),
        Value::Array(vec![
            Value::String("This is the default ad-carousel configuration.".to_string()),
            Value::String(
                "Edit these settings, or override individual fields with AD_CAROUSEL__* environment variables.".to_string(),
            ),
            Value::String("Use the 'reload' console command to apply edits without a restart.".to_string()),
        ]),
    );

    if let Ok(Value::Object(fields)) = serde_json::to_value(config) {
        for (key, value) in fields {
            document.insert(key, value);
        }
    }

    Value::Object(document)
}

/// Environment overrides with prefix `AD_CAROUSEL` and nested separator `__`.
fn apply_env_overrides(config: &mut Config) {
    let mut overridden = match serde_json::to_value(&*config) {
        Ok(value) => value,
        Err(_) => return,
    };

    let mut changed = false;
    for (key, raw_value) in std::env::vars() {
        let Some(stripped) = key.strip_prefix("AD_CAROUSEL__") else {
            continue;
        };

        let segments: Vec<String> = stripped
            .split("__")
            .filter(|segment| !segment.is_empty())
            .map(str::to_ascii_lowercase)
            .collect();
        if segments.is_empty() {
            continue;
        }

        set_nested_value(&mut overridden, &segments, parse_scalar(raw_value.trim()));
        changed = true;
    }

    if changed {
        match serde_json::from_value::<Config>(overridden) {
            Ok(merged) => *config = merged,
            Err(e) => {
                tracing::warn!(error = %e, "Environment overrides produced an invalid configuration; ignoring them");
            }
        }
    }
}

/// Interpret an env value as JSON where possible (numbers, booleans, null),
/// otherwise as a bare string.
fn parse_scalar(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::String(String::new());
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn set_nested_value(target: &mut Value, segments: &[String], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *target = value;
        return;
    };

    let map = ensure_object(target);
    if rest.is_empty() {
        map.insert(head.clone(), value);
    } else {
        let entry = map
            .entry(head.clone())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
        set_nested_value(entry, rest, value);
    }
}

fn ensure_object(value: &mut Value) -> &mut serde_json::Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(serde_json::Map::new());
    }

    // The branch above guarantees `value` is an object.
    value
        .as_object_mut()
        .expect("value was just coerced into an object")
}
