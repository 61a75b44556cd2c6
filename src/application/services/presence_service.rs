//! Presence Registry
//!
//! Maps connection identity to user profile and enforces case-insensitive
//! username uniqueness across all connected regular users. Usernames are
//! indexed in canonical (lowercase) form; the original case is preserved for
//! display.

use std::collections::HashMap;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::domain::User;
use crate::shared::error::AppError;
use crate::shared::validation::{validate_room_name, validate_username};

#[derive(Default)]
struct Registry {
    /// Connection id -> user record
    users: HashMap<Uuid, User>,
    /// Canonical username -> connection id
    canonical: HashMap<String, Uuid>,
}

/// Connection-to-user registry.
#[derive(Default)]
pub struct PresenceService {
    registry: RwLock<Registry>,
}

impl PresenceService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user for a connection.
    ///
    /// Validates the username and room name, rejects duplicate usernames
    /// (case-insensitively) and connections that already carry a user. No
    /// state changes on any failure.
    pub fn join(
        &self,
        connection_id: Uuid,
        username: &str,
        room: &str,
        external_id: Option<String>,
    ) -> Result<User, AppError> {
        validate_username(username)?;
        validate_room_name(room)?;

        let mut registry = self.registry.write();

        if registry.users.contains_key(&connection_id) {
            return Err(AppError::Validation("Connection already joined".into()));
        }

        let user = User::new(connection_id, username, room, external_id);
        let canonical = user.canonical_username();
        if registry.canonical.contains_key(&canonical) {
            return Err(AppError::DuplicateUsername(username.to_string()));
        }

        registry.canonical.insert(canonical, connection_id);
        registry.users.insert(connection_id, user.clone());

        tracing::info!(
            connection_id = %connection_id,
            username = %user.username,
            room = %user.room,
            "User joined"
        );

        Ok(user)
    }

    /// Remove and return the user for a connection, if present.
    pub fn leave(&self, connection_id: Uuid) -> Option<User> {
        let mut registry = self.registry.write();
        let user = registry.users.remove(&connection_id)?;
        registry.canonical.remove(&user.canonical_username());

        tracing::info!(
            connection_id = %connection_id,
            username = %user.username,
            "User left"
        );

        Some(user)
    }

    /// Update the room field of a connection's user. The corresponding room
    /// membership move is the caller's responsibility.
    pub fn change_room(&self, connection_id: Uuid, new_room: &str) -> Result<User, AppError> {
        validate_room_name(new_room)?;

        let mut registry = self.registry.write();
        let user = registry
            .users
            .get_mut(&connection_id)
            .ok_or(AppError::NotAuthenticated)?;
        user.room = new_room.to_string();
        Ok(user.clone())
    }

    /// Case-insensitive lookup across all current users.
    pub fn find_by_username(&self, username: &str) -> Option<User> {
        let registry = self.registry.read();
        let connection_id = registry.canonical.get(&username.to_lowercase())?;
        registry.users.get(connection_id).cloned()
    }

    /// User record for a connection, if it has joined.
    pub fn get(&self, connection_id: Uuid) -> Option<User> {
        self.registry.read().users.get(&connection_id).cloned()
    }

    /// Display usernames for a set of member connections, in iteration order.
    pub fn usernames_for(&self, members: &[Uuid]) -> Vec<String> {
        let registry = self.registry.read();
        members
            .iter()
            .filter_map(|id| registry.users.get(id).map(|u| u.username.clone()))
            .collect()
    }

    /// Number of currently joined users.
    pub fn count(&self) -> usize {
        self.registry.read().users.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_creates_user() {
        let presence = PresenceService::new();
        let conn = Uuid::new_v4();
        let user = presence.join(conn, "alice", "lobby", None).unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.room, "lobby");
        assert_eq!(presence.count(), 1);
        assert_eq!(presence.get(conn).unwrap().username, "alice");
    }

    #[test]
    fn test_duplicate_username_is_case_insensitive() {
        let presence = PresenceService::new();
        presence
            .join(Uuid::new_v4(), "Alice", "lobby", None)
            .unwrap();
        let err = presence
            .join(Uuid::new_v4(), "aLiCe", "lobby", None)
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateUsername(_)));
        assert_eq!(presence.count(), 1);
    }

    #[test]
    fn test_invalid_username_creates_nothing() {
        let presence = PresenceService::new();
        let err = presence
            .join(Uuid::new_v4(), "ab cd", "lobby", None)
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(presence.count(), 0);
    }

    #[test]
    fn test_invalid_room_rejected() {
        let presence = PresenceService::new();
        let err = presence
            .join(Uuid::new_v4(), "alice", "no spaces", None)
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_second_join_on_same_connection_rejected() {
        let presence = PresenceService::new();
        let conn = Uuid::new_v4();
        presence.join(conn, "alice", "lobby", None).unwrap();
        let err = presence.join(conn, "bob", "lobby", None).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(presence.get(conn).unwrap().username, "alice");
    }

    #[test]
    fn test_leave_frees_username() {
        let presence = PresenceService::new();
        let conn = Uuid::new_v4();
        presence.join(conn, "alice", "lobby", None).unwrap();

        let user = presence.leave(conn).unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(presence.count(), 0);

        // the name can be taken again after leave
        presence
            .join(Uuid::new_v4(), "ALICE", "lobby", None)
            .unwrap();
    }

    #[test]
    fn test_leave_unknown_connection_is_none() {
        let presence = PresenceService::new();
        assert!(presence.leave(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_find_by_username_case_insensitive() {
        let presence = PresenceService::new();
        presence
            .join(Uuid::new_v4(), "Alice", "lobby", None)
            .unwrap();
        let found = presence.find_by_username("ALICE").unwrap();
        assert_eq!(found.username, "Alice");
        assert!(presence.find_by_username("bob").is_none());
    }

    #[test]
    fn test_change_room_updates_record() {
        let presence = PresenceService::new();
        let conn = Uuid::new_v4();
        presence.join(conn, "alice", "lobby", None).unwrap();
        let user = presence.change_room(conn, "general").unwrap();
        assert_eq!(user.room, "general");
        assert_eq!(presence.get(conn).unwrap().room, "general");
    }

    #[test]
    fn test_change_room_requires_user() {
        let presence = PresenceService::new();
        let err = presence.change_room(Uuid::new_v4(), "general").unwrap_err();
        assert!(matches!(err, AppError::NotAuthenticated));
    }

    #[test]
    fn test_usernames_for_skips_unknown_members() {
        let presence = PresenceService::new();
        let a = Uuid::new_v4();
        presence.join(a, "alice", "lobby", None).unwrap();
        let names = presence.usernames_for(&[a, Uuid::new_v4()]);
        assert_eq!(names, vec!["alice".to_string()]);
    }
}
