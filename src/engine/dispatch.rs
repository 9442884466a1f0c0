//! Message delivery: rotation broadcasts and one-shot welcomes.

use std::sync::Arc;

use super::AdEngine;
use crate::config::{AdDestination, Config, WelcomeKind};
use crate::host::{ParticipantId, ServerInfo};
use crate::template::{self, PlaceholderContext};

impl AdEngine {
    /// A repeating timer fired for `group_index`. Select the next message set
    /// round-robin and deliver each destination line to every eligible
    /// participant.
    pub(super) fn handle_ad_fired(&mut self, generation: u64, group_index: usize) {
        if generation != self.generation.number {
            tracing::debug!(
                generation,
                current = self.generation.number,
                "Discarding firing from a superseded timer generation"
            );
            return;
        }

        let config = Arc::clone(&self.generation.config);
        let Some(group) = config.ads.get(group_index) else {
            return;
        };
        let Some(set_index) = self.rotation.advance(group_index, group.messages.len()) else {
            return;
        };
        let Some(message_set) = group.messages.get(set_index) else {
            return;
        };

        tracing::debug!(group = group_index, set = set_index, "Advertisement firing");
        for (destination, raw_template) in message_set {
            self.broadcast(*destination, raw_template, &config);
        }
    }

    /// Deliver one template to all eligible participants, each resolved with
    /// their own locale -- two participants can see different text from the
    /// same firing.
    fn broadcast(&mut self, destination: AdDestination, raw_template: &str, config: &Config) {
        let info = self.host.server_info();

        for participant in self.host.participants() {
            if !participant.is_eligible() {
                continue;
            }

            let ctx = placeholder_context(config, &info, None);
            let locale = self.locales.lookup(&participant.id);
            let text = template::resolve(
                raw_template,
                locale,
                &config.locale_messages,
                &config.default_locale,
                &ctx,
            );

            match destination {
                AdDestination::Chat => {
                    // Leading space keeps the line clear of the host's chat prefix.
                    self.host.send_chat_line(&participant, &format!(" {text}"));
                }
                AdDestination::Center if config.use_center_overlay => {
                    // Rendering starts on the next tick and refreshes until expiry.
                    self.overlays.set(participant.id, text);
                }
                AdDestination::Center => {
                    self.host.send_center_text(&participant, &text);
                }
            }
        }
    }

    /// The welcome display delay elapsed. Skipped silently if the
    /// participant left in the meantime.
    pub(super) fn deliver_welcome(&mut self, participant_id: ParticipantId) {
        let config = Arc::clone(&self.generation.config);
        let Some(welcome) = &config.welcome_message else {
            return;
        };

        let Some(participant) = self
            .host
            .participants()
            .into_iter()
            .find(|p| p.id == participant_id)
        else {
            tracing::trace!(%participant_id, "Welcome target left before the delay elapsed");
            return;
        };
        if !participant.is_eligible() {
            return;
        }

        let info = self.host.server_info();
        let ctx = placeholder_context(&config, &info, Some(&participant.name));
        let locale = self.locales.lookup(&participant.id);
        let text = template::resolve(
            &welcome.message,
            locale,
            &config.locale_messages,
            &config.default_locale,
            &ctx,
        );

        match welcome.kind {
            WelcomeKind::Chat => self.host.send_chat_line(&participant, &text),
            WelcomeKind::Center => self.host.send_center_text(&participant, &text),
            WelcomeKind::CenterOverlay => self.overlays.set(participant.id, text),
        }
    }
}

fn placeholder_context<'a>(
    config: &'a Config,
    info: &'a ServerInfo,
    requester: Option<&'a str>,
) -> PlaceholderContext<'a> {
    PlaceholderContext {
        server_name: &config.server_name,
        server_sub_name: &config.server_subname,
        map_name: &info.map_name,
        map_display_names: &config.map_names,
        ip: config.ip_override.as_deref().unwrap_or(&info.ip),
        port: info.port,
        max_participants: info.max_participants,
        occupied: info.occupied,
        participant_name: requester,
        now: chrono::Local::now(),
    }
}
