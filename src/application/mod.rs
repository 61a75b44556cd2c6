//! Application Layer
//!
//! In-memory registries coordinating the domain entities. Each service owns
//! its state behind its own lock; composite flows are orchestrated by the
//! websocket event handlers in the presentation layer.

pub mod services;

pub use services::*;
