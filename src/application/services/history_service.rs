//! History Buffer
//!
//! Per-room bounded FIFO of recent broadcast events, replayed to newly
//! joined members. Oldest entries are dropped first on overflow; there is no
//! recency re-ranking.

use std::collections::VecDeque;

use dashmap::DashMap;

use crate::domain::Event;

/// Default per-room history capacity
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Bounded per-room event history.
pub struct HistoryService {
    capacity: usize,
    buffers: DashMap<String, VecDeque<Event>>,
}

impl HistoryService {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            buffers: DashMap::new(),
        }
    }

    /// Append an event to a room's history, evicting the oldest entry once
    /// the capacity is exceeded.
    pub fn append(&self, room: &str, event: Event) {
        let mut buffer = self.buffers.entry(room.to_string()).or_default();
        buffer.push_back(event);
        while buffer.len() > self.capacity {
            buffer.pop_front();
        }
    }

    /// Ordered copy of a room's history; empty if the room has none.
    pub fn snapshot(&self, room: &str) -> Vec<Event> {
        self.buffers
            .get(room)
            .map(|buffer| buffer.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of buffered events for a room.
    pub fn message_count(&self, room: &str) -> usize {
        self.buffers.get(room).map(|b| b.len()).unwrap_or(0)
    }

    /// Drop a room's stored history. Invoked only by the deferred purge
    /// task after the grace window. Returns whether anything was removed.
    pub fn purge(&self, room: &str) -> bool {
        self.buffers.remove(room).is_some()
    }
}

impl Default for HistoryService {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
