//! Event ID Generation
//!
//! Time-ordered identifiers tagged with their originator, in the form
//! `<unix-millis>-<originator-prefix>-<seq>`.

use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide sequence to disambiguate ids minted in the same millisecond.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Number of originator characters carried in the id
const ORIGIN_PREFIX_LEN: usize = 8;

/// Generate an event id from the current time and the originating
/// connection/source identifier.
pub fn event_id(originator: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed) % 10_000;
    let prefix: String = originator
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(ORIGIN_PREFIX_LEN)
        .collect();
    format!("{}-{}-{}", millis, prefix, seq)
}
