//! Shared helpers for integration tests: a recording host and canned
//! configurations.

use ad_carousel::config::{AdDestination, AdGroup, Config, MessageSet};
use ad_carousel::host::{HostApi, Participant, ParticipantId, ServerInfo};
use ad_carousel::locale::GeoResolver;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Which rendering surface a recorded send went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Chat,
    Center,
    Overlay,
}

#[derive(Debug, Clone)]
pub struct Sent {
    pub participant: ParticipantId,
    pub surface: Surface,
    pub text: String,
}

/// Host double that records every send and serves a mutable participant
/// roster.
pub struct RecordingHost {
    participants: Mutex<Vec<Participant>>,
    sent: Mutex<Vec<Sent>>,
    info: Mutex<ServerInfo>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            participants: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            info: Mutex::new(ServerInfo {
                map_name: "de_dust2".to_string(),
                ip: "198.51.100.50".to_string(),
                port: 27015,
                max_participants: 64,
                occupied: 2,
            }),
        }
    }

    pub fn join(&self, name: &str, address: &str) -> Participant {
        let participant = Participant {
            id: Uuid::new_v4(),
            slot: self.participants.lock().unwrap().len() as u16,
            name: name.to_string(),
            address: Some(address.to_string()),
            is_bot: false,
            is_alive: true,
        };
        self.participants.lock().unwrap().push(participant.clone());
        participant
    }

    #[allow(dead_code)]
    pub fn join_bot(&self, name: &str) -> Participant {
        let bot = Participant {
            id: Uuid::new_v4(),
            slot: self.participants.lock().unwrap().len() as u16,
            name: name.to_string(),
            address: None,
            is_bot: true,
            is_alive: true,
        };
        self.participants.lock().unwrap().push(bot.clone());
        bot
    }

    #[allow(dead_code)]
    pub fn leave(&self, participant: &ParticipantId) {
        self.participants
            .lock()
            .unwrap()
            .retain(|p| p.id != *participant);
    }

    #[allow(dead_code)]
    pub fn set_alive(&self, participant: &ParticipantId, alive: bool) {
        let mut roster = self.participants.lock().unwrap();
        if let Some(p) = roster.iter_mut().find(|p| p.id == *participant) {
            p.is_alive = alive;
        }
    }

    #[allow(dead_code)]
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn texts_for(&self, participant: &ParticipantId, surface: Surface) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.participant == *participant && s.surface == surface)
            .map(|s| s.text.clone())
            .collect()
    }

    #[allow(dead_code)]
    pub fn clear_sent(&self) {
        self.sent.lock().unwrap().clear();
    }

    fn record(&self, participant: &Participant, surface: Surface, text: &str) {
        self.sent.lock().unwrap().push(Sent {
            participant: participant.id,
            surface,
            text: text.to_string(),
        });
    }
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostApi for RecordingHost {
    fn participants(&self) -> Vec<Participant> {
        self.participants.lock().unwrap().clone()
    }

    fn send_chat_line(&self, participant: &Participant, text: &str) {
        self.record(participant, Surface::Chat, text);
    }

    fn send_center_text(&self, participant: &Participant, text: &str) {
        self.record(participant, Surface::Center, text);
    }

    fn send_center_overlay(&self, participant: &Participant, text: &str) {
        self.record(participant, Surface::Overlay, text);
    }

    fn server_info(&self) -> ServerInfo {
        self.info.lock().unwrap().clone()
    }
}

/// Exact-address geolocation stub.
pub struct MapGeoResolver {
    countries: HashMap<String, String>,
}

impl MapGeoResolver {
    #[allow(dead_code)]
    pub fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            countries: entries
                .iter()
                .map(|(ip, code)| ((*ip).to_string(), (*code).to_string()))
                .collect(),
        }
    }
}

impl GeoResolver for MapGeoResolver {
    fn resolve_country(&self, ip: &str) -> Option<String> {
        self.countries.get(ip).cloned()
    }
}

/// One ad group of chat-only message sets with a long interval, so tests
/// drive firings by hand.
#[allow(dead_code)]
pub fn chat_rotation(templates: &[&str]) -> AdGroup {
    AdGroup {
        interval: 3600.0,
        messages: templates
            .iter()
            .map(|template| {
                let mut set = MessageSet::new();
                set.insert(AdDestination::Chat, (*template).to_string());
                set
            })
            .collect(),
    }
}

/// Minimal configuration with no welcome message and the given groups.
#[allow(dead_code)]
pub fn rotation_config(groups: Vec<AdGroup>) -> Config {
    Config {
        ads: groups,
        server_name: "Foo".to_string(),
        server_subname: "Sub".to_string(),
        ..Config::default()
    }
}
