//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;

use crate::application::{HistoryService, PresenceService, RoomService};
use crate::config::Settings;
use crate::presentation::http::routes;
use crate::presentation::middleware::{cors, logging};
use crate::presentation::websocket::Gateway;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
    pub presence: Arc<PresenceService>,
    pub rooms: Arc<RoomService>,
    pub history: Arc<HistoryService>,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Assemble the shared registries from settings.
    pub fn build(settings: Settings) -> Self {
        let history = Arc::new(HistoryService::new(settings.chat.history_capacity));
        let rooms = Arc::new(RoomService::new(
            Arc::clone(&history),
            Duration::from_secs(settings.chat.purge_grace_secs),
        ));

        Self {
            gateway: Arc::new(Gateway::new()),
            presence: Arc::new(PresenceService::new()),
            rooms,
            history,
            settings: Arc::new(settings),
        }
    }
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        let addr: SocketAddr = settings.server_addr().parse()?;

        // Create shared state
        let state = AppState::build(settings.clone());

        // Build router with middleware
        let router = routes::create_router(state)
            .layer(logging::create_trace_layer())
            .layer(cors::create_cors_layer(&settings.cors));

        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}
