//! Connection Gateway
//!
//! Registry of live connections and the best-effort broadcast dispatcher.
//! Frames are handed to per-connection outbound channels; a target that has
//! already disconnected is silently skipped and delivery failures never
//! reach the caller.

use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Classification of a connection on the shared transport.
///
/// Every connection starts `Unclassified`; the first frame decides whether
/// it speaks the structured event API or the bridge line protocol. The tag
/// is checked explicitly before routing, never inferred from payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    Unclassified,
    Regular,
    Bridge,
}

impl ConnectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unclassified => "unclassified",
            Self::Regular => "regular",
            Self::Bridge => "bridge",
        }
    }
}

struct ConnectionHandle {
    kind: ConnectionKind,
    sender: mpsc::UnboundedSender<String>,
}

/// Gateway managing all live connections.
pub struct Gateway {
    connections: DashMap<Uuid, ConnectionHandle>,
}

impl Gateway {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Register a new, still unclassified connection.
    pub fn register(&self, connection_id: Uuid, sender: mpsc::UnboundedSender<String>) {
        self.connections.insert(
            connection_id,
            ConnectionHandle {
                kind: ConnectionKind::Unclassified,
                sender,
            },
        );
        tracing::debug!(connection_id = %connection_id, "Connection registered");
    }

    /// Record the outcome of first-frame classification.
    pub fn classify(&self, connection_id: Uuid, kind: ConnectionKind) {
        if let Some(mut handle) = self.connections.get_mut(&connection_id) {
            handle.kind = kind;
        }
    }

    pub fn kind_of(&self, connection_id: Uuid) -> Option<ConnectionKind> {
        self.connections.get(&connection_id).map(|h| h.kind)
    }

    /// Drop a connection, returning its classification.
    pub fn remove(&self, connection_id: Uuid) -> Option<ConnectionKind> {
        let removed = self.connections.remove(&connection_id);
        if let Some((_, handle)) = &removed {
            tracing::debug!(
                connection_id = %connection_id,
                kind = handle.kind.as_str(),
                "Connection removed"
            );
        }
        removed.map(|(_, handle)| handle.kind)
    }

    /// Unicast a frame. Returns false if the target is gone; never errors.
    pub fn send_to_connection(&self, connection_id: Uuid, frame: String) -> bool {
        match self.connections.get(&connection_id) {
            Some(handle) => handle.sender.send(frame).is_ok(),
            None => false,
        }
    }

    /// Best-effort fan-out to a set of connections.
    pub fn send_to_many(&self, targets: &[Uuid], frame: &str) {
        for target in targets {
            if let Some(handle) = self.connections.get(target) {
                let _ = handle.sender.send(frame.to_string());
            }
        }
    }

    /// Best-effort fan-out to every regular connection. Bridge connections
    /// speak the line protocol and never receive event envelopes.
    pub fn send_global(&self, frame: &str) {
        for entry in self.connections.iter() {
            if entry.kind == ConnectionKind::Regular {
                let _ = entry.sender.send(frame.to_string());
            }
        }
    }

    /// Total live connections, any classification.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Live bridge connections.
    pub fn bridge_count(&self) -> usize {
        self.connections
            .iter()
            .filter(|e| e.kind == ConnectionKind::Bridge)
            .count()
    }
}

impl Default for Gateway {
    fn default() -> Self {
        Self::new()
    }
}
