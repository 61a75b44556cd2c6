//! # Domain Entities
//!
//! Core entities representing the connection/presence/room state tracked by
//! the relay server. Everything here lives in memory only; there is no
//! persistent storage behind these types.
//!
//! - **User**: a joined regular client (one per connection)
//! - **Room**: a named broadcast group with dynamic membership
//! - **Event**: a broadcastable occurrence (message, system notice, presence
//!   change) as stored in room history and sent on the wire

mod event;
mod room;
mod user;

pub use event::{Event, EventKind};
pub use room::{Room, RoomSummary};
pub use user::User;
