//! Store handle for WellNest's on-disk state.

use std::path::PathBuf;

/// A Store is the root directory holding one deployment's state: the SQLite
/// database, the mutation audit log, and the notification outbox. All
/// subsystem state (accounts, pending registrations, activity, badges) is
/// scoped to a store.
#[derive(Debug, Clone)]
pub struct Store {
    /// Absolute path to the store root directory
    pub root: PathBuf,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}
