//! # Relay Server Library
//!
//! This crate provides a real-time multi-room broadcast server with:
//! - A WebSocket gateway carrying the structured client event API
//! - A privileged bridge channel for an external application server
//!   (newline-delimited JSON control messages on the same transport)
//! - In-memory presence/room registries with bounded per-room history
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Core entities (User, Room, Event)
//! - **Application Layer**: In-memory registries (presence, rooms, history)
//! - **Infrastructure Layer**: Metrics collection
//! - **Presentation Layer**: HTTP snapshot endpoints and the WebSocket gateway
//!
//! ## Module Structure
//!
//! ```text
//! relay_server/
//! +-- config/        Configuration management
//! +-- domain/        Domain entities
//! +-- application/   Registry services
//! +-- infrastructure/ Metrics
//! +-- presentation/  HTTP routes and WebSocket handlers
//! +-- shared/        Common utilities (errors, validation, event ids)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core entities
pub mod domain;

// Application layer - Registry services
pub mod application;

// Infrastructure layer - Metrics
pub mod infrastructure;

// Presentation layer - HTTP and WebSocket handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
