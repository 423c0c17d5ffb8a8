//! Notification port: how verification codes leave the system.
//!
//! Actual delivery (SMTP, SMS, push) is a deployment concern. The core only
//! needs a capability it can hand a destination and a code; the default
//! implementation appends to an outbox file under the store root, which is
//! also what the CLI and the tests read back.

use crate::core::error;
use crate::core::store::Store;
use crate::core::time;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub trait NotificationPort {
    fn send(&self, destination: &str, code: &str) -> Result<(), error::WellnestError>;
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct OutboxRecord {
    pub ts: String,
    pub event_id: String,
    pub destination: String,
    pub code: String,
}

/// Appends one JSON line per sent code to `outbox.jsonl`.
pub struct OutboxNotifier {
    outbox_path: PathBuf,
}

impl OutboxNotifier {
    pub fn new(store: &Store) -> Self {
        Self {
            outbox_path: store.root.join("outbox.jsonl"),
        }
    }
}

impl NotificationPort for OutboxNotifier {
    fn send(&self, destination: &str, code: &str) -> Result<(), error::WellnestError> {
        use std::fs::OpenOptions;
        use std::io::Write;

        let record = OutboxRecord {
            ts: time::now_epoch_z(),
            event_id: time::new_event_id(),
            destination: destination.to_string(),
            code: code.to_string(),
        };

        if let Some(parent) = self.outbox_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| error::WellnestError::DeliveryFailed(e.to_string()))?;
        }

        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.outbox_path)
            .map_err(|e| error::WellnestError::DeliveryFailed(e.to_string()))?;

        let line = serde_json::to_string(&record)
            .map_err(|e| error::WellnestError::DeliveryFailed(e.to_string()))?;
        writeln!(f, "{}", line).map_err(|e| error::WellnestError::DeliveryFailed(e.to_string()))?;
        Ok(())
    }
}
