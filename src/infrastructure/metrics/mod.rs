//! Prometheus Metrics Module
//!
//! Application-wide metrics collection.
//!
//! # Metrics Collected
//! - Active connection gauges (all / bridge)
//! - Structured client events by name
//! - Bridge control messages by type

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Active connections of any classification
pub static ACTIVE_CONNECTIONS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::with_opts(
        Opts::new("connections_active", "Number of active connections").namespace("relay_server"),
    )
    .expect("Failed to create ACTIVE_CONNECTIONS metric")
});

/// Active bridge connections
pub static BRIDGE_CONNECTIONS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::with_opts(
        Opts::new(
            "bridge_connections_active",
            "Number of active bridge connections",
        )
        .namespace("relay_server"),
    )
    .expect("Failed to create BRIDGE_CONNECTIONS metric")
});

/// Structured client events received, by event name
pub static CLIENT_EVENTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("client_events_total", "Structured client events received")
            .namespace("relay_server"),
        &["event"],
    )
    .expect("Failed to create CLIENT_EVENTS_TOTAL metric")
});

/// Bridge control messages received, by type
pub static BRIDGE_CONTROL_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("bridge_control_total", "Bridge control messages received")
            .namespace("relay_server"),
        &["type"],
    )
    .expect("Failed to create BRIDGE_CONTROL_TOTAL metric")
});

const CLIENT_EVENT_NAMES: &[&str] = &[
    "join",
    "send_message",
    "send_private_message",
    "typing",
    "stop_typing",
    "change_room",
    "get_rooms",
    "get_room_users",
];

const BRIDGE_CONTROL_TYPES: &[&str] = &[
    "emit",
    "emit_to_room",
    "room_created",
    "presence_update",
    "ping",
    "heartbeat",
    "disconnect",
];

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(ACTIVE_CONNECTIONS.clone()))
        .expect("Failed to register ACTIVE_CONNECTIONS");
    registry
        .register(Box::new(BRIDGE_CONNECTIONS.clone()))
        .expect("Failed to register BRIDGE_CONNECTIONS");
    registry
        .register(Box::new(CLIENT_EVENTS_TOTAL.clone()))
        .expect("Failed to register CLIENT_EVENTS_TOTAL");
    registry
        .register(Box::new(BRIDGE_CONTROL_TOTAL.clone()))
        .expect("Failed to register BRIDGE_CONTROL_TOTAL");
}

pub fn record_connect() {
    ACTIVE_CONNECTIONS.inc();
}

pub fn record_bridge_classified() {
    BRIDGE_CONNECTIONS.inc();
}

pub fn record_disconnect(was_bridge: bool) {
    ACTIVE_CONNECTIONS.dec();
    if was_bridge {
        BRIDGE_CONNECTIONS.dec();
    }
}

/// Count a client event, folding unknown names into one label to keep
/// cardinality bounded.
pub fn record_client_event(name: &str) {
    let label = if CLIENT_EVENT_NAMES.contains(&name) {
        name
    } else {
        "unknown"
    };
    CLIENT_EVENTS_TOTAL.with_label_values(&[label]).inc();
}

/// Count a bridge control message, folding unknown types into one label.
pub fn record_bridge_control(kind: &str) {
    let label = if BRIDGE_CONTROL_TYPES.contains(&kind) {
        kind
    } else {
        "unknown"
    };
    BRIDGE_CONTROL_TOTAL.with_label_values(&[label]).inc();
}

/// Render all registered metrics in the Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_labels_are_folded() {
        record_client_event("totally_made_up");
        record_bridge_control("totally_made_up");
        let output = gather_metrics();
        assert!(output.contains("relay_server_client_events_total"));
        assert!(!output.contains("totally_made_up"));
    }

    #[test]
    fn test_gather_metrics_renders_gauges() {
        record_connect();
        let output = gather_metrics();
        assert!(output.contains("relay_server_connections_active"));
    }
}
