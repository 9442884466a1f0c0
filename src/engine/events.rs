//! Host callback handling.

use super::{AdEngine, HostEvent};
use crate::host::Participant;

impl AdEngine {
    pub(super) fn handle_host_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::ParticipantFullyConnected(participant) => self.on_connected(&participant),
            HostEvent::ParticipantAuthorized {
                participant,
                source_address,
            } => {
                self.locales
                    .on_authorize(participant, &source_address, self.geo.as_ref());
            }
            HostEvent::ParticipantDisconnected(participant) => {
                self.locales.on_disconnect(&participant);
                self.overlays.remove(&participant);
            }
            HostEvent::Tick => self.on_tick(),
        }
    }

    /// Schedule the one-shot welcome after its configured delay. Bots never
    /// get one.
    fn on_connected(&mut self, participant: &Participant) {
        if !participant.is_eligible() {
            return;
        }
        let Some(welcome) = &self.generation.config.welcome_message else {
            return;
        };

        tracing::debug!(
            participant = %participant.id,
            delay = welcome.display_delay,
            "Scheduling welcome message"
        );
        self.scheduler
            .arm_welcome(welcome.display_delay, participant.id, &self.events);
    }

    /// Re-render every active overlay; the surface fades without a refresh
    /// each tick.
    fn on_tick(&mut self) {
        let timing = self.overlay_timing();
        for participant in self.host.participants() {
            if let Some(text) = self
                .overlays
                .tick(&participant.id, participant.is_alive, &timing)
            {
                self.host.send_center_overlay(&participant, text);
            }
        }
    }
}
