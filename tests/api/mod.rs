//! HTTP API Tests

mod health_tests;
mod stats_tests;
