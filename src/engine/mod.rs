//! Engine orchestration.
//!
//! One engine task owns every piece of mutable runtime state -- locale cache,
//! overlay table, rotation cursors, armed timers -- and consumes a single
//! serialized event stream. Host callbacks and timer firings are messages
//! into that stream, so no state here ever needs a lock.

mod dispatch;
mod events;
mod reload;
mod scheduler;

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::Config;
use crate::host::{HostApi, Participant, ParticipantId};
use crate::locale::{GeoResolver, LocaleCache};
use crate::overlay::{OverlayTable, OverlayTiming};
use crate::rotation::RotationState;

pub(crate) use scheduler::Scheduler;

/// Callbacks delivered by the host, serially and at-least-once per real
/// event.
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// A participant finished connecting and can receive a welcome message.
    ParticipantFullyConnected(Participant),
    /// A participant left; all per-participant state is dropped.
    ParticipantDisconnected(ParticipantId),
    /// A participant's identity and source address became known.
    ParticipantAuthorized {
        participant: ParticipantId,
        source_address: String,
    },
    /// One host frame; drives overlay refreshes.
    Tick,
}

/// Everything the engine task consumes: host callbacks plus internally
/// scheduled firings.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    Host(HostEvent),
    /// A repeating ad timer fired. Firings tagged with a superseded
    /// generation are discarded, which is what makes reload atomic even for
    /// firings already queued when the old timers were cancelled.
    AdFired { generation: u64, group: usize },
    /// A welcome display delay elapsed.
    WelcomeDue { participant: ParticipantId },
    /// Manual configuration reload (console command).
    ReloadRequested,
    /// Stop consuming events and cancel all timers. The engine itself holds
    /// a sender for arming timers, so a plain channel close can never be
    /// observed from inside [`AdEngine::run`]; shutdown is explicit instead.
    Shutdown,
}

/// The active configuration generation. Immutable; replaced wholesale by
/// reload.
struct Generation {
    number: u64,
    config: Arc<Config>,
}

/// Advertisement rotation engine.
pub struct AdEngine {
    host: Arc<dyn HostApi>,
    geo: Arc<dyn GeoResolver>,
    config_path: PathBuf,
    generation: Generation,
    rotation: RotationState,
    locales: LocaleCache,
    overlays: OverlayTable,
    scheduler: Scheduler,
    /// Sender half of the engine's own stream, used to arm timers.
    events: mpsc::UnboundedSender<EngineEvent>,
}

impl AdEngine {
    /// Build an engine around `config` and arm its first generation of
    /// timers. Returns the engine together with both halves of its event
    /// stream; the host feeds the sender, [`run`](Self::run) consumes the
    /// receiver.
    ///
    /// Must be called within a tokio runtime (timers spawn immediately).
    pub fn new(
        host: Arc<dyn HostApi>,
        geo: Arc<dyn GeoResolver>,
        config: Config,
        config_path: PathBuf,
    ) -> (
        Self,
        mpsc::UnboundedSender<EngineEvent>,
        mpsc::UnboundedReceiver<EngineEvent>,
    ) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let mut engine = Self {
            host,
            geo,
            config_path,
            generation: Generation {
                number: 0,
                config: Arc::new(Config::default()),
            },
            rotation: RotationState::default(),
            locales: LocaleCache::new(config.default_locale.clone()),
            overlays: OverlayTable::new(),
            scheduler: Scheduler::new(),
            events: events_tx.clone(),
        };
        engine.apply_config(config);

        (engine, events_tx, events_rx)
    }

    /// Consume the event stream until [`EngineEvent::Shutdown`] arrives,
    /// then cancel all timers.
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<EngineEvent>) {
        while let Some(event) = events.recv().await {
            if matches!(event, EngineEvent::Shutdown) {
                break;
            }
            self.handle_event(event);
        }
        self.scheduler.stop();
        tracing::info!("Advertisement engine stopped");
    }

    /// Process one event. Synchronous: every handler runs to completion
    /// before the next event is looked at.
    pub fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Host(host_event) => self.handle_host_event(host_event),
            EngineEvent::AdFired { generation, group } => self.handle_ad_fired(generation, group),
            EngineEvent::WelcomeDue { participant } => self.deliver_welcome(participant),
            EngineEvent::ReloadRequested => self.reload(),
            EngineEvent::Shutdown => {}
        }
    }

    /// Number of repeating timers armed for the active generation.
    pub fn armed_timer_count(&self) -> usize {
        self.scheduler.armed_timers()
    }

    /// The active generation number. Firings tagged with anything older are
    /// discarded.
    pub fn generation_number(&self) -> u64 {
        self.generation.number
    }

    /// The active configuration generation.
    pub fn current_config(&self) -> Arc<Config> {
        Arc::clone(&self.generation.config)
    }

    fn overlay_timing(&self) -> OverlayTiming {
        let config = &self.generation.config;
        OverlayTiming {
            duration_secs: config.overlay_duration,
            show_while_dead: config.show_overlay_when_dead,
            tick_rate: config.tick_rate,
        }
    }
}
