//! Configuration generation replacement.

use std::sync::Arc;

use super::{AdEngine, Generation};
use crate::config;
use crate::locale::LocaleCache;
use crate::rotation::RotationState;

impl AdEngine {
    /// Re-read the configuration document and swap in a new generation.
    pub fn reload(&mut self) {
        let config = config::load_document(&self.config_path);
        if let Err(e) = config::validate(&config) {
            tracing::warn!(%e, "Reloaded configuration has issues; unusable parts will be skipped");
        }
        self.apply_config(config);
        tracing::info!(
            generation = self.generation.number,
            groups = self.generation.config.ads.len(),
            "Configuration reloaded"
        );
    }

    /// Replace the running generation wholesale.
    ///
    /// Old timers are cancelled *before* the new ones are armed, so two
    /// generations never fire concurrently and no message set is delivered
    /// twice. Rotation cursors restart from zero, and the locale cache is
    /// re-primed for everyone currently connected (the default locale may
    /// have changed).
    pub(crate) fn apply_config(&mut self, config: config::Config) {
        self.scheduler.stop();

        let number = self.generation.number + 1;
        let config = Arc::new(config);

        self.rotation = RotationState::for_groups(config.ads.len());

        self.locales = LocaleCache::new(config.default_locale.clone());
        for participant in self.host.participants() {
            if !participant.is_eligible() {
                continue;
            }
            if let Some(address) = &participant.address {
                self.locales
                    .on_authorize(participant.id, address, self.geo.as_ref());
            }
        }

        self.scheduler.start(&config.ads, number, &self.events);
        self.generation = Generation { number, config };
    }
}
