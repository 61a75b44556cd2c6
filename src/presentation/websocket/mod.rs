//! WebSocket Gateway
//!
//! Real-time communication over a single WebSocket endpoint carrying two
//! protocols: the structured client event API and the privileged bridge's
//! newline-delimited control channel.

pub mod bridge;
pub mod events;
pub mod framing;
pub mod gateway;
pub mod handler;
pub mod messages;
pub mod session;

pub use framing::LineAssembler;
pub use gateway::{ConnectionKind, Gateway};
pub use handler::ws_handler;
pub use messages::ServerEvent;
pub use session::SessionState;
