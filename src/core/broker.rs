use crate::core::db;
use crate::core::error;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use ulid::Ulid;

/// The DB Broker is the single gate for state access. Every read and write
/// runs through `with_conn`, which serializes access in-process and appends
/// an audit event per operation. Concurrent requests for the same email
/// (two registration attempts, say) are therefore ordered before they touch
/// the accounts or pending_registrations tables.
pub struct DbBroker {
    audit_log_path: PathBuf,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BrokerEvent {
    pub ts: String,
    pub event_id: String,
    pub actor: String,
    pub op: String,
    pub status: String,
}

impl DbBroker {
    pub fn new(root: &Path) -> Self {
        Self {
            audit_log_path: root.join("broker.events.jsonl"),
        }
    }

    /// Execute a closure with a serialized connection to the store database.
    /// `actor` is the email driving the operation (or "wellnest" for
    /// maintenance ops); `op_name` names the mutation for the audit trail.
    pub fn with_conn<F, R>(
        &self,
        db_path: &Path,
        actor: &str,
        op_name: &str,
        f: F,
    ) -> Result<R, error::WellnestError>
    where
        F: FnOnce(&Connection) -> Result<R, error::WellnestError>,
    {
        static DB_LOCK: Mutex<()> = Mutex::new(());
        let _lock = DB_LOCK.lock().unwrap();

        let conn = db::db_connect(&db_path.to_string_lossy())?;

        let result = f(&conn);

        let status = if result.is_ok() { "success" } else { "error" };
        self.log_event(actor, op_name, status)?;

        result
    }

    fn log_event(&self, actor: &str, op: &str, status: &str) -> Result<(), error::WellnestError> {
        use std::fs::OpenOptions;
        use std::io::Write;

        let ev = BrokerEvent {
            ts: crate::core::time::now_epoch_z(),
            event_id: Ulid::new().to_string(),
            actor: actor.to_string(),
            op: op.to_string(),
            status: status.to_string(),
        };

        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.audit_log_path)
            .map_err(error::WellnestError::IoError)?;

        let line = serde_json::to_string(&ev)
            .map_err(|e| error::WellnestError::DatabaseInitializationError(e.to_string()))?;
        writeln!(f, "{}", line).map_err(error::WellnestError::IoError)?;
        Ok(())
    }
}
