//! Infrastructure Layer
//!
//! Cross-cutting runtime concerns. With all state held in memory the layer
//! reduces to metrics collection.

pub mod metrics;
