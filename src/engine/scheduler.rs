//! Timer arming and cancellation.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use super::EngineEvent;
use crate::config::AdGroup;
use crate::host::ParticipantId;

/// Owns the repeating timers of the active configuration generation.
///
/// Firings are messages into the engine's event stream rather than direct
/// calls, which keeps all mutable state on one task. `stop` cancels the
/// token shared by every armed task; a firing that was already queued when
/// the token flipped still carries its generation number and is discarded by
/// the engine on receipt.
#[derive(Debug)]
pub(crate) struct Scheduler {
    cancel: CancellationToken,
    armed: usize,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            cancel: CancellationToken::new(),
            armed: 0,
        }
    }

    /// Arm one repeating timer per group. Groups that could never fire
    /// usefully (no message sets, non-positive interval) are skipped with a
    /// warning instead of failing the whole generation.
    pub fn start(
        &mut self,
        groups: &[AdGroup],
        generation: u64,
        events: &UnboundedSender<EngineEvent>,
    ) {
        for (index, group) in groups.iter().enumerate() {
            if !group.interval.is_finite() || group.interval <= 0.0 {
                tracing::warn!(
                    group = index,
                    interval = group.interval,
                    "Skipping ad group with a non-positive interval"
                );
                continue;
            }
            if group.messages.is_empty() {
                tracing::warn!(group = index, "Skipping ad group with no message sets");
                continue;
            }

            let interval = Duration::from_secs_f32(group.interval);
            let token = self.cancel.child_token();
            let events = events.clone();

            tokio::spawn(async move {
                // First firing lands one full interval after arming.
                let start = tokio::time::Instant::now() + interval;
                let mut ticker = tokio::time::interval_at(start, interval);
                loop {
                    tokio::select! {
                        () = token.cancelled() => break,
                        _ = ticker.tick() => {
                            let fired = EngineEvent::AdFired { generation, group: index };
                            if events.send(fired).is_err() {
                                break;
                            }
                        }
                    }
                }
            });
            self.armed += 1;
        }

        tracing::info!(generation, timers = self.armed, "Armed advertisement timers");
    }

    /// Cancel every armed timer. Idempotent and safe with zero armed timers.
    pub fn stop(&mut self) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.armed = 0;
    }

    /// One-shot deferred welcome delivery. Deliberately not tied to the
    /// generation token: a reload between connect and delivery must not eat
    /// the welcome. Validity is re-checked at delivery time instead.
    pub fn arm_welcome(
        &self,
        delay_secs: f32,
        participant: ParticipantId,
        events: &UnboundedSender<EngineEvent>,
    ) {
        let delay_secs = if delay_secs.is_finite() {
            delay_secs.max(0.0)
        } else {
            0.0
        };
        let delay = Duration::from_secs_f32(delay_secs);
        let events = events.clone();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(EngineEvent::WelcomeDue { participant });
        });
    }

    /// Number of currently armed repeating timers.
    pub fn armed_timers(&self) -> usize {
        self.armed
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
