//! Participant locale resolution.
//!
//! Locale codes are derived once per connection, at authorization time, from
//! the participant's source address via the geolocation collaborator, and
//! cached until disconnect. Every failure mode -- malformed address, missing
//! database, unknown network -- degrades to the configured default locale and
//! never reaches a participant.

use std::collections::HashMap;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use crate::host::ParticipantId;

/// IP-to-country collaborator. Implementations must be total: a lookup that
/// cannot answer returns `None`, never an error.
pub trait GeoResolver: Send + Sync {
    fn resolve_country(&self, ip: &str) -> Option<String>;
}

/// Resolver that never answers; every participant gets the default locale.
#[derive(Debug, Default)]
pub struct NullGeoResolver;

impl GeoResolver for NullGeoResolver {
    fn resolve_country(&self, _ip: &str) -> Option<String> {
        None
    }
}

/// Longest-prefix resolver backed by a local JSON database file mapping
/// address prefixes to ISO country codes, e.g. `{"203.0.": "AU"}`.
///
/// A missing or malformed database degrades to an empty table.
#[derive(Debug, Default)]
pub struct PrefixGeoResolver {
    /// Sorted longest-prefix-first so the most specific entry wins.
    prefixes: Vec<(String, String)>,
}

impl PrefixGeoResolver {
    pub fn from_map(map: HashMap<String, String>) -> Self {
        let mut prefixes: Vec<(String, String)> = map.into_iter().collect();
        prefixes.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        Self { prefixes }
    }

    pub fn from_file(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Geolocation database unavailable, using default locale for everyone");
                return Self::default();
            }
        };

        match serde_json::from_str::<HashMap<String, String>>(&contents) {
            Ok(map) => Self::from_map(map),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Geolocation database malformed, using default locale for everyone");
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

impl GeoResolver for PrefixGeoResolver {
    fn resolve_country(&self, ip: &str) -> Option<String> {
        // Malformed addresses must degrade to absent, never error.
        if ip.parse::<IpAddr>().is_err() {
            tracing::debug!(%ip, "Malformed address in country lookup");
            return None;
        }

        self.prefixes
            .iter()
            .find(|(prefix, _)| ip.starts_with(prefix.as_str()))
            .map(|(_, country)| country.clone())
    }
}

/// Per-participant locale cache.
#[derive(Debug)]
pub struct LocaleCache {
    default_locale: String,
    by_participant: HashMap<ParticipantId, String>,
}

impl LocaleCache {
    pub fn new(default_locale: impl Into<String>) -> Self {
        Self {
            default_locale: default_locale.into(),
            by_participant: HashMap::new(),
        }
    }

    /// Derive and cache the locale for a newly authorized participant.
    ///
    /// Loopback addresses resolve straight to the default locale without
    /// consulting the geolocation collaborator.
    pub fn on_authorize(
        &mut self,
        participant: ParticipantId,
        source_address: &str,
        geo: &dyn GeoResolver,
    ) {
        let ip = strip_port(source_address);

        let locale = if is_local_address(&ip) {
            self.default_locale.clone()
        } else {
            geo.resolve_country(&ip)
                .unwrap_or_else(|| self.default_locale.clone())
        };

        tracing::debug!(%participant, %locale, "Cached participant locale");
        self.by_participant.insert(participant, locale);
    }

    pub fn on_disconnect(&mut self, participant: &ParticipantId) {
        self.by_participant.remove(participant);
    }

    /// Pure read; a participant with no cache entry gets the default locale.
    pub fn lookup(&self, participant: &ParticipantId) -> &str {
        self.by_participant
            .get(participant)
            .map_or(self.default_locale.as_str(), String::as_str)
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn len(&self) -> usize {
        self.by_participant.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_participant.is_empty()
    }
}

/// Coarse network address: the `ip` of `ip:port`, tolerating bare addresses
/// (IPv4 or IPv6) that carry no port at all.
fn strip_port(source_address: &str) -> String {
    if let Ok(addr) = source_address.parse::<SocketAddr>() {
        return addr.ip().to_string();
    }
    if source_address.parse::<IpAddr>().is_ok() {
        return source_address.to_string();
    }
    source_address
        .split(':')
        .next()
        .unwrap_or(source_address)
        .to_string()
}

fn is_local_address(ip: &str) -> bool {
    ip.parse::<IpAddr>().is_ok_and(|addr| addr.is_loopback())
}
