//! Room entity.
//!
//! A room is a named broadcast group. The entry is created lazily on first
//! join and deleted as soon as its membership becomes empty; bounded history
//! for the room may outlive the entry for a grace window.

use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

/// A named broadcast group with its current members.
#[derive(Debug, Clone, Default)]
pub struct Room {
    /// Room name (1-30 chars)
    pub name: String,

    /// Connection ids of current members
    pub members: HashSet<Uuid>,
}

impl Room {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: HashSet::new(),
        }
    }

    pub fn add_member(&mut self, connection_id: Uuid) -> bool {
        self.members.insert(connection_id)
    }

    pub fn remove_member(&mut self, connection_id: &Uuid) -> bool {
        self.members.remove(connection_id)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            name: self.name.clone(),
            member_count: self.member_count(),
        }
    }
}

/// Point-in-time room snapshot for listings and stats.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub name: String,
    pub member_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_add_remove() {
        let mut room = Room::new("lobby");
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        assert!(room.add_member(a));
        assert!(room.add_member(b));
        // double add is a no-op
        assert!(!room.add_member(a));
        assert_eq!(room.member_count(), 2);

        assert!(room.remove_member(&a));
        assert!(!room.remove_member(&a));
        assert_eq!(room.member_count(), 1);
        assert!(!room.is_empty());

        room.remove_member(&b);
        assert!(room.is_empty());
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let room = Room::new("general");
        let json = serde_json::to_string(&room.summary()).unwrap();
        assert_eq!(json, r#"{"name":"general","memberCount":0}"#);
    }
}
