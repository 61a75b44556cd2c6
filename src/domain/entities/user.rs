//! User entity.
//!
//! Exactly one `User` exists per connected regular client that has completed
//! a `join`. The record is owned by the presence registry and destroyed on
//! leave or disconnect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A joined regular client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Identity of the underlying connection
    pub connection_id: Uuid,

    /// Display username (1-20 chars, unique case-insensitively)
    pub username: String,

    /// Name of the room the user is currently in
    pub room: String,

    /// Identifier assigned by the external application server, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    /// When the user joined
    pub joined_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        connection_id: Uuid,
        username: impl Into<String>,
        room: impl Into<String>,
        external_id: Option<String>,
    ) -> Self {
        Self {
            connection_id,
            username: username.into(),
            room: room.into(),
            external_id,
            joined_at: Utc::now(),
        }
    }

    /// Canonical form of the username used for uniqueness and lookup.
    pub fn canonical_username(&self) -> String {
        self.username.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_username_lowercases() {
        let user = User::new(Uuid::new_v4(), "AlIcE", "lobby", None);
        assert_eq!(user.canonical_username(), "alice");
        // display case is preserved
        assert_eq!(user.username, "AlIcE");
    }

    #[test]
    fn test_external_id_omitted_when_absent() {
        let user = User::new(Uuid::new_v4(), "bob", "lobby", None);
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("externalId"));

        let user = User::new(Uuid::new_v4(), "bob", "lobby", Some("ext-1".into()));
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("\"externalId\":\"ext-1\""));
    }
}
