//! Per-participant overlay state machine.
//!
//! The overlay surface is not "set once, persists": it only stays on screen
//! while re-sent, so an active overlay must be re-rendered every tick until
//! its duration elapses. State lives here; the actual render call is issued
//! by the caller with whatever [`tick`](OverlayTable::tick) returns.

use std::collections::HashMap;

use crate::host::ParticipantId;

/// Timing knobs for overlay expiry, taken from the active configuration.
#[derive(Debug, Clone, Copy)]
pub struct OverlayTiming {
    pub duration_secs: f32,
    /// When false, a dead participant's overlay is paused: no re-render and
    /// no time advance until they are alive again.
    pub show_while_dead: bool,
    /// Host ticks per second.
    pub tick_rate: u32,
}

/// One participant's overlay: showing or idle, plus elapsed display time.
#[derive(Debug, Clone, Default)]
struct OverlayState {
    active: bool,
    text: String,
    elapsed_ticks: u32,
}

/// All live overlay records, keyed by participant identity.
///
/// Records are created lazily on the first overlay send for a participant
/// and dropped on disconnect. Nothing here survives a restart.
#[derive(Debug, Default)]
pub struct OverlayTable {
    states: HashMap<ParticipantId, OverlayState>,
}

impl OverlayTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin (or restart) showing `text` for a participant. Always resets the
    /// elapsed time, regardless of prior state.
    pub fn set(&mut self, participant: ParticipantId, text: impl Into<String>) {
        let state = self.states.entry(participant).or_default();
        state.active = true;
        state.text = text.into();
        state.elapsed_ticks = 0;
    }

    /// Advance one host tick for a participant.
    ///
    /// Returns the text to re-render if the overlay is still showing this
    /// tick; `None` when idle, paused, or just expired. Expiry uses
    /// `elapsed_ticks / tick_rate < duration_secs`, so a 2 s overlay at 64
    /// ticks/s renders for ticks 0..=127 and goes idle on tick 128.
    pub fn tick(
        &mut self,
        participant: &ParticipantId,
        alive: bool,
        timing: &OverlayTiming,
    ) -> Option<&str> {
        let state = self.states.get_mut(participant)?;
        if !state.active {
            return None;
        }

        if !timing.show_while_dead && !alive {
            // Paused, not expired: time does not advance while hidden.
            return None;
        }

        let shown_secs = f64::from(state.elapsed_ticks) / f64::from(timing.tick_rate.max(1));
        if shown_secs < f64::from(timing.duration_secs) {
            state.elapsed_ticks += 1;
            Some(state.text.as_str())
        } else {
            state.active = false;
            None
        }
    }

    /// Whether a participant currently has a showing overlay.
    pub fn is_active(&self, participant: &ParticipantId) -> bool {
        self.states.get(participant).is_some_and(|s| s.active)
    }

    /// Drop a participant's record entirely (disconnect).
    pub fn remove(&mut self, participant: &ParticipantId) {
        self.states.remove(participant);
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const TIMING: OverlayTiming = OverlayTiming {
        duration_secs: 2.0,
        show_while_dead: false,
        tick_rate: 64,
    };

    #[test]
    fn overlay_renders_for_exactly_duration_times_tick_rate_ticks() {
        let mut table = OverlayTable::new();
        let id = Uuid::new_v4();
        table.set(id, "hello");

        for tick in 0..128 {
            assert_eq!(
                table.tick(&id, true, &TIMING),
                Some("hello"),
                "tick {tick} should still render"
            );
        }
        assert_eq!(table.tick(&id, true, &TIMING), None, "tick 128 expires");
        assert!(!table.is_active(&id));
    }

    #[test]
    fn set_resets_elapsed_time_mid_show() {
        let mut table = OverlayTable::new();
        let id = Uuid::new_v4();
        table.set(id, "first");

        for _ in 0..100 {
            table.tick(&id, true, &TIMING);
        }
        table.set(id, "second");

        // A full duration again from zero.
        for _ in 0..128 {
            assert_eq!(table.tick(&id, true, &TIMING), Some("second"));
        }
        assert_eq!(table.tick(&id, true, &TIMING), None);
    }

    #[test]
    fn set_reopens_an_expired_overlay() {
        let mut table = OverlayTable::new();
        let id = Uuid::new_v4();
        table.set(id, "first");
        for _ in 0..=128 {
            table.tick(&id, true, &TIMING);
        }
        assert!(!table.is_active(&id));

        table.set(id, "again");
        assert!(table.is_active(&id));
        assert_eq!(table.tick(&id, true, &TIMING), Some("again"));
    }

    #[test]
    fn dead_participant_pauses_instead_of_expiring() {
        let mut table = OverlayTable::new();
        let id = Uuid::new_v4();
        table.set(id, "paused");

        for _ in 0..50 {
            table.tick(&id, true, &TIMING);
        }
        // Dead for an arbitrarily long stretch: no render, no time advance.
        for _ in 0..10_000 {
            assert_eq!(table.tick(&id, false, &TIMING), None);
        }
        assert!(table.is_active(&id));

        // Alive again: the remaining 78 ticks still render.
        for _ in 0..78 {
            assert_eq!(table.tick(&id, true, &TIMING), Some("paused"));
        }
        assert_eq!(table.tick(&id, true, &TIMING), None);
    }

    #[test]
    fn dead_participant_keeps_rendering_when_flag_allows() {
        let timing = OverlayTiming {
            show_while_dead: true,
            ..TIMING
        };
        let mut table = OverlayTable::new();
        let id = Uuid::new_v4();
        table.set(id, "visible");

        assert_eq!(table.tick(&id, false, &timing), Some("visible"));
    }

    #[test]
    fn tick_without_record_is_a_noop() {
        let mut table = OverlayTable::new();
        let id = Uuid::new_v4();
        assert_eq!(table.tick(&id, true, &TIMING), None);
        assert!(table.is_empty());
    }

    #[test]
    fn disconnect_discards_state() {
        let mut table = OverlayTable::new();
        let id = Uuid::new_v4();
        table.set(id, "gone");
        table.remove(&id);
        assert!(table.is_empty());
        assert_eq!(table.tick(&id, true, &TIMING), None);
    }
}
