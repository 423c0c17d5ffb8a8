use crate::core::broker::DbBroker;
use crate::core::error;
use crate::core::schemas;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

pub fn db_connect(db_path: &str) -> Result<Connection, error::WellnestError> {
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(std::time::Duration::from_secs(5))
        .map_err(error::WellnestError::RusqliteError)?;
    conn.query_row("PRAGMA journal_mode=WAL;", [], |_| Ok(()))
        .map_err(error::WellnestError::RusqliteError)?;
    conn.execute("PRAGMA foreign_keys=ON;", [])
        .map_err(error::WellnestError::RusqliteError)?;
    Ok(conn)
}

pub fn wellnest_db_path(root: &Path) -> PathBuf {
    root.join(schemas::WELLNEST_DB_NAME)
}

/// Create the store directory and every table. Idempotent; each subsystem
/// calls this before its first query.
pub fn initialize_wellnest_db(root: &Path) -> Result<(), error::WellnestError> {
    fs::create_dir_all(root).map_err(error::WellnestError::IoError)?;
    let db_path = wellnest_db_path(root);

    let broker = DbBroker::new(root);
    broker.with_conn(&db_path, "wellnest", "db.init", |conn| {
        conn.execute(schemas::ACCOUNTS_SCHEMA, [])?;
        conn.execute(schemas::PENDING_REGISTRATIONS_SCHEMA, [])?;
        conn.execute(schemas::ACTIVITY_LOG_SCHEMA, [])?;
        conn.execute(schemas::AWARDED_BADGES_SCHEMA, [])?;
        Ok(())
    })
}
