//! Application Services
//!
//! The three registries at the heart of the server:
//!
//! - **PresenceService**: connection identity -> user profile, with
//!   case-insensitive username uniqueness
//! - **RoomService**: room name -> member set, room lifecycle and the
//!   deferred history purge
//! - **HistoryService**: per-room bounded FIFO of recent broadcast events

pub mod history_service;
pub mod presence_service;
pub mod room_service;

pub use history_service::HistoryService;
pub use presence_service::PresenceService;
pub use room_service::RoomService;
