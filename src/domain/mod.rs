//! # Domain Layer
//!
//! The domain layer contains the core business objects of the relay server.
//! It is independent of any external frameworks or infrastructure concerns.
//!
//! ## Structure
//!
//! - **entities**: Core domain entities (User, Room, Event)

pub mod entities;

// Re-export commonly used types
pub use entities::*;
