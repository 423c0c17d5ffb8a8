//! Shared timestamp helpers.
//!
//! Expiry and cooldown decisions are made by pure functions that take a
//! `now` argument in epoch seconds; this module is the single place that
//! actually reads the wall clock.

use ulid::Ulid;

/// Returns the current wall clock as unix-epoch seconds.
pub fn now_epoch_secs() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// Returns unix-epoch seconds with `Z` suffix (e.g. `1771220592Z`), the
/// record-timestamp format used across the store.
pub fn now_epoch_z() -> String {
    format!("{}Z", now_epoch_secs())
}

pub fn new_event_id() -> String {
    Ulid::new().to_string()
}
