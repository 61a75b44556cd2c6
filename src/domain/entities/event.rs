//! Event entity.
//!
//! An `Event` is the unit stored in room history and carried as the payload
//! of room broadcasts. Ids are derived from time + originator, so replayed
//! history keeps its original ordering and provenance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::ids;

/// Kind of a broadcast event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Message,
    Private,
    System,
    Presence,
}

impl EventKind {
    /// Convert from wire string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "message" => Some(Self::Message),
            "private" => Some(Self::Private),
            "system" => Some(Self::System),
            "presence" => Some(Self::Presence),
            _ => None,
        }
    }

    /// Convert to wire string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Private => "private",
            Self::System => "system",
            Self::Presence => "presence",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A broadcastable occurrence.
///
/// Room-scoped message/system/presence events that are broadcast to a room
/// are appended to that room's history buffer; private messages and typing
/// notices never are.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Id derived from time + originator
    pub id: String,

    /// Event kind
    #[serde(rename = "type")]
    pub kind: EventKind,

    /// Username (or external user id for presence events) of the originator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Event content: message text, system notice, or presence status
    pub content: String,

    /// Room the event was broadcast to, if room-scoped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,

    /// When the event was created
    pub timestamp: DateTime<Utc>,
}

impl Event {
    fn new(
        kind: EventKind,
        originator: &str,
        username: Option<String>,
        content: String,
        room: Option<String>,
    ) -> Self {
        Self {
            id: ids::event_id(originator),
            kind,
            username,
            content,
            room,
            timestamp: Utc::now(),
        }
    }

    /// A chat message broadcast to a room.
    pub fn message(originator: &str, username: &str, content: &str, room: &str) -> Self {
        Self::new(
            EventKind::Message,
            originator,
            Some(username.to_string()),
            content.to_string(),
            Some(room.to_string()),
        )
    }

    /// A private message between two users (never stored).
    pub fn private(originator: &str, username: &str, content: &str) -> Self {
        Self::new(
            EventKind::Private,
            originator,
            Some(username.to_string()),
            content.to_string(),
            None,
        )
    }

    /// A system notice scoped to a room (join/leave announcements).
    pub fn system(originator: &str, content: &str, room: &str) -> Self {
        Self::new(
            EventKind::System,
            originator,
            None,
            content.to_string(),
            Some(room.to_string()),
        )
    }

    /// A presence change, optionally scoped to a room.
    pub fn presence(originator: &str, user_id: &str, status: &str, room: Option<&str>) -> Self {
        Self::new(
            EventKind::Presence,
            originator,
            Some(user_id.to_string()),
            status.to_string(),
            room.map(str::to_string),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kind_roundtrip() {
        for kind in [
            EventKind::Message,
            EventKind::Private,
            EventKind::System,
            EventKind::Presence,
        ] {
            assert_eq!(EventKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(EventKind::from_str("bogus"), None);
    }

    #[test]
    fn test_kind_serializes_as_type_field() {
        let event = Event::message("conn1", "alice", "hi", "lobby");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "message");
        assert_eq!(json["username"], "alice");
        assert_eq!(json["content"], "hi");
        assert_eq!(json["room"], "lobby");
        assert!(json["id"].as_str().is_some());
    }

    #[test]
    fn test_system_event_has_no_username() {
        let event = Event::system("conn1", "alice joined the room", "lobby");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json.get("username"), None);
        assert_eq!(json["type"], "system");
    }

    #[test]
    fn test_private_event_is_not_room_scoped() {
        let event = Event::private("conn1", "alice", "psst");
        assert_eq!(event.room, None);
        assert_eq!(event.kind, EventKind::Private);
    }
}
