//! Host collaborator contract.
//!
//! The engine never talks to a concrete game server. Everything it needs --
//! who is connected, where rendered text goes, what the current map is --
//! sits behind [`HostApi`], so the core stays a plain struct driven by host
//! callbacks rather than inheriting from a platform base type.

use uuid::Uuid;

/// Unique identifier for session participants
pub type ParticipantId = Uuid;

/// Snapshot of one connected participant as reported by the host.
#[derive(Debug, Clone)]
pub struct Participant {
    pub id: ParticipantId,
    /// Host connection slot. Informational only; the engine keys all
    /// per-participant state by `id`, never by slot, because hosts reuse
    /// slots after disconnects.
    pub slot: u16,
    /// Display name, used by the `{PLAYERNAME}` placeholder.
    pub name: String,
    /// Source address as reported by the host, usually `ip:port`.
    pub address: Option<String>,
    /// Synthetic entities are excluded from all deliveries.
    pub is_bot: bool,
    /// Gates overlay refreshes when the dead-visibility flag is off.
    pub is_alive: bool,
}

impl Participant {
    /// Eligible for broadcasts and welcome messages.
    pub fn is_eligible(&self) -> bool {
        !self.is_bot
    }
}

/// Server-level facts consumed by placeholder substitution.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub map_name: String,
    pub ip: String,
    pub port: u16,
    pub max_participants: u32,
    pub occupied: u32,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            map_name: String::new(),
            ip: "127.0.0.1".to_string(),
            port: 27015,
            max_participants: 0,
            occupied: 0,
        }
    }
}

/// Rendering surfaces and participant directory supplied by the host.
///
/// All methods are synchronous and fire-and-forget. A send to a participant
/// who vanished between snapshot and delivery is the host's problem to drop;
/// the engine never observes render failures.
pub trait HostApi: Send + Sync {
    /// Snapshot of currently connected participants, in a stable iteration
    /// order.
    fn participants(&self) -> Vec<Participant>;

    /// One line of chat text for a single participant.
    fn send_chat_line(&self, participant: &Participant, text: &str);

    /// Plain center-screen text. Set once, fades on its own.
    fn send_center_text(&self, participant: &Participant, text: &str);

    /// Center-screen overlay surface. The surface only stays visible while
    /// re-sent every tick; the engine's overlay table drives the refresh.
    fn send_center_overlay(&self, participant: &Participant, text: &str);

    /// Current map, address, and occupancy facts.
    fn server_info(&self) -> ServerInfo;
}
