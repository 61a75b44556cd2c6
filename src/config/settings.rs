//! Application settings and configuration structures.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// WebSocket configuration
    pub websocket: WebSocketSettings,

    /// Bridge channel configuration
    pub bridge: BridgeSettings,

    /// Room/message behavior configuration
    pub chat: ChatSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins (comma-separated in env)
    pub allowed_origins: Vec<String>,
}

/// WebSocket configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebSocketSettings {
    /// Maximum message size in bytes (default: 64KB)
    /// Protects against DoS via oversized messages
    pub max_message_size: usize,

    /// Maximum frame size in bytes (default: 16KB)
    pub max_frame_size: usize,
}

/// Bridge channel configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeSettings {
    /// First-frame token identifying the privileged application server
    pub sentinel: String,
}

/// Room and message behavior configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatSettings {
    /// Room assigned when a join request names none
    pub default_room: String,

    /// Maximum message length in characters after trimming
    pub max_message_length: usize,

    /// Per-room history capacity
    pub history_capacity: usize,

    /// Grace window in seconds before an emptied room's history is purged
    pub purge_grace_secs: u64,
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. built-in defaults
    /// 2. config/default.toml (base configuration)
    /// 3. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 4. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        // Determine the running environment
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("cors.allowed_origins", vec!["http://localhost:3000"])?
            // WebSocket settings - security limits to prevent DoS
            .set_default("websocket.max_message_size", 65536_i64)? // 64KB
            .set_default("websocket.max_frame_size", 16384_i64)? // 16KB
            .set_default("bridge.sentinel", "BRIDGE_CONNECT")?
            .set_default("chat.default_room", "lobby")?
            .set_default("chat.max_message_length", 500_i64)?
            .set_default("chat.history_capacity", 50_i64)?
            .set_default("chat.purge_grace_secs", 300_i64)? // 5 minutes
            // Load from config files
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Load from environment variables
            // APP__SERVER__PORT=3000 -> server.port = 3000
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            // Map simple environment variables
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("bridge.sentinel", std::env::var("BRIDGE_SENTINEL").ok())?
            .build()?
            .try_deserialize()
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_every_section() {
        let settings = Settings::load().expect("defaults should satisfy all fields");
        assert_eq!(settings.chat.history_capacity, 50);
        assert_eq!(settings.chat.max_message_length, 500);
        assert_eq!(settings.chat.purge_grace_secs, 300);
        assert_eq!(settings.chat.default_room, "lobby");
        assert!(!settings.bridge.sentinel.is_empty());
    }

    #[test]
    fn test_server_addr_formats_host_and_port() {
        let settings = Settings::load().unwrap();
        assert_eq!(
            settings.server_addr(),
            format!("{}:{}", settings.server.host, settings.server.port)
        );
    }
}
