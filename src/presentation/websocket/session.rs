//! WebSocket Session State

use uuid::Uuid;

use super::gateway::ConnectionKind;

/// Per-connection session state.
///
/// Tracks only what the demultiplexer needs: the connection identity and its
/// classification. Whether the connection has joined a room is owned by the
/// presence registry.
#[derive(Debug)]
pub struct SessionState {
    pub connection_id: Uuid,
    pub classification: ConnectionKind,
}

impl SessionState {
    pub fn new(connection_id: Uuid) -> Self {
        Self {
            connection_id,
            classification: ConnectionKind::Unclassified,
        }
    }

    pub fn is_unclassified(&self) -> bool {
        self.classification == ConnectionKind::Unclassified
    }

    pub fn is_bridge(&self) -> bool {
        self.classification == ConnectionKind::Bridge
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_unclassified() {
        let session = SessionState::new(Uuid::new_v4());
        assert!(session.is_unclassified());
        assert!(!session.is_bridge());
    }

    #[test]
    fn test_classification_is_sticky() {
        let mut session = SessionState::new(Uuid::new_v4());
        session.classification = ConnectionKind::Bridge;
        assert!(session.is_bridge());
        assert!(!session.is_unclassified());
    }
}
