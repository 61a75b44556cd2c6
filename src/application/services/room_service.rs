//! Room Registry
//!
//! Maps room name to member set and owns the room lifecycle: entries are
//! created lazily on first join and deleted immediately when membership
//! becomes empty. History for an emptied room is purged by a deferred task
//! after a grace window, so a quick rejoin keeps its context; the task
//! re-checks that the room is still absent at fire time.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::domain::{Room, RoomSummary};

use super::HistoryService;

/// Default grace window before an emptied room's history is purged
pub const DEFAULT_PURGE_GRACE: Duration = Duration::from_secs(300);

/// Room membership registry with deferred history purge.
pub struct RoomService {
    rooms: Arc<RwLock<HashMap<String, Room>>>,
    history: Arc<HistoryService>,
    purge_grace: Duration,
}

impl RoomService {
    pub fn new(history: Arc<HistoryService>, purge_grace: Duration) -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
            history,
            purge_grace,
        }
    }

    /// Add a member, creating the room entry if absent. Returns the
    /// post-join member count.
    pub fn join(&self, room: &str, connection_id: Uuid) -> usize {
        let mut rooms = self.rooms.write();
        let entry = rooms
            .entry(room.to_string())
            .or_insert_with(|| Room::new(room));
        entry.add_member(connection_id);
        entry.member_count()
    }

    /// Remove a member. If membership becomes empty the entry is deleted
    /// immediately and a deferred history purge is scheduled. Returns the
    /// remaining member count.
    pub fn leave(&self, room: &str, connection_id: Uuid) -> usize {
        let remaining = {
            let mut rooms = self.rooms.write();
            let Some(entry) = rooms.get_mut(room) else {
                return 0;
            };
            entry.remove_member(&connection_id);
            let remaining = entry.member_count();
            if remaining == 0 {
                rooms.remove(room);
            }
            remaining
        };

        if remaining == 0 {
            tracing::debug!(room = %room, "Room emptied, scheduling history purge");
            self.schedule_purge(room);
        }
        remaining
    }

    /// Create an empty tracking entry if absent. Bridge path only; performs
    /// no name validation.
    pub fn ensure(&self, room: &str) {
        let mut rooms = self.rooms.write();
        rooms
            .entry(room.to_string())
            .or_insert_with(|| Room::new(room));
    }

    /// Point-in-time snapshot of all rooms.
    pub fn list_rooms(&self) -> Vec<RoomSummary> {
        let mut summaries: Vec<RoomSummary> =
            self.rooms.read().values().map(Room::summary).collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }

    /// Point-in-time snapshot of a room's member connection ids.
    pub fn members_of(&self, room: &str) -> Vec<Uuid> {
        self.rooms
            .read()
            .get(room)
            .map(|r| r.members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Current member count of a room (0 if absent).
    pub fn member_count(&self, room: &str) -> usize {
        self.rooms.read().get(room).map_or(0, Room::member_count)
    }

    pub fn contains(&self, room: &str) -> bool {
        self.rooms.read().contains_key(room)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.read().len()
    }

    /// Schedule the deferred purge for an emptied room. The task carries the
    /// room name only and re-queries current state when it fires: a rejoin in
    /// the meantime recreates the entry and neutralizes the purge.
    fn schedule_purge(&self, room: &str) {
        let rooms = Arc::clone(&self.rooms);
        let history = Arc::clone(&self.history);
        let room = room.to_string();
        let grace = self.purge_grace;

        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            if rooms.read().contains_key(&room) {
                tracing::debug!(room = %room, "Room was recreated, skipping history purge");
                return;
            }
            if history.purge(&room) {
                tracing::info!(room = %room, "Purged history of empty room");
            }
        });
    }
}
