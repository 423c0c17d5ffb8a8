//! The activity ledger: one validated entry per calendar day per user.
//!
//! Entries are append-only. There is no per-date delete; a wrong entry means
//! resetting the whole ledger. The duplicate-date check always consults the
//! persisted table, never an in-memory mirror.

use crate::core::broker::DbBroker;
use crate::core::db;
use crate::core::error;
use crate::core::store::Store;
use crate::core::time;
use chrono::NaiveDate;
use rusqlite::{OptionalExtension, params};
use serde::{Deserialize, Serialize};

pub const MAX_STEPS: i64 = 50_000;
pub const MAX_CALORIES: i64 = 10_000;
pub const MAX_SLEEP_HOURS: f64 = 24.0;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ActivityEntry {
    pub date: NaiveDate,
    pub steps: i64,
    pub calories: i64,
    pub sleep_hours: f64,
}

/// Collects every violated rule; bounds are inclusive on both ends.
pub fn validate_entry(steps: i64, calories: i64, sleep_hours: f64) -> Vec<String> {
    let mut errors = Vec::new();

    if steps < 0 {
        errors.push("Steps cannot be negative".to_string());
    }
    if steps > MAX_STEPS {
        errors.push("Steps seem unusually high (>50,000)".to_string());
    }

    if calories < 0 {
        errors.push("Calories cannot be negative".to_string());
    }
    if calories > MAX_CALORIES {
        errors.push("Calories seem unusually high (>10,000)".to_string());
    }

    if sleep_hours < 0.0 {
        errors.push("Sleep hours cannot be negative".to_string());
    }
    if sleep_hours > MAX_SLEEP_HOURS {
        errors.push("Sleep hours cannot exceed 24".to_string());
    }

    errors
}

/// Validate and insert one entry. The existence check and the insert run
/// under the same broker lock, so the (email, date) key stays authoritative.
pub fn append(
    store: &Store,
    email: &str,
    entry: &ActivityEntry,
) -> Result<(), error::WellnestError> {
    let errors = validate_entry(entry.steps, entry.calories, entry.sleep_hours);
    if !errors.is_empty() {
        return Err(error::WellnestError::ValidationFailed(errors));
    }

    db::initialize_wellnest_db(&store.root)?;
    let broker = DbBroker::new(&store.root);
    let db_path = db::wellnest_db_path(&store.root);
    let date_str = entry.date.to_string();
    let logged_at = time::now_epoch_z();

    broker.with_conn(&db_path, email, "activity.append", |conn| {
        let exists: Option<String> = conn
            .query_row(
                "SELECT date FROM activity_log WHERE email = ?1 AND date = ?2",
                params![email, date_str],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_some() {
            return Err(error::WellnestError::DuplicateDate(date_str.clone()));
        }

        conn.execute(
            "INSERT INTO activity_log(email, date, steps, calories, sleep_hours, logged_at)
             VALUES(?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                email,
                date_str,
                entry.steps,
                entry.calories,
                entry.sleep_hours,
                logged_at
            ],
        )?;
        Ok(())
    })
}

/// Clear the ledger for one user, unconditionally.
pub fn reset(store: &Store, email: &str) -> Result<(), error::WellnestError> {
    db::initialize_wellnest_db(&store.root)?;
    let broker = DbBroker::new(&store.root);
    let db_path = db::wellnest_db_path(&store.root);

    broker.with_conn(&db_path, email, "activity.reset", |conn| {
        conn.execute("DELETE FROM activity_log WHERE email = ?1", params![email])?;
        Ok(())
    })
}

/// Every entry for one user. No ordering guarantee; consumers sort by date
/// as needed.
pub fn all(store: &Store, email: &str) -> Result<Vec<ActivityEntry>, error::WellnestError> {
    db::initialize_wellnest_db(&store.root)?;
    let broker = DbBroker::new(&store.root);
    let db_path = db::wellnest_db_path(&store.root);

    broker.with_conn(&db_path, email, "activity.list", |conn| {
        let mut stmt = conn.prepare(
            "SELECT date, steps, calories, sleep_hours FROM activity_log WHERE email = ?1",
        )?;
        let rows = stmt.query_map(params![email], |row| {
            let date_str: String = row.get(0)?;
            Ok((date_str, row.get(1)?, row.get(2)?, row.get(3)?))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (date_str, steps, calories, sleep_hours) = row?;
            let date = date_str.parse::<NaiveDate>().map_err(|e| {
                error::WellnestError::CorruptRecord(format!("date {}: {}", date_str, e))
            })?;
            entries.push(ActivityEntry {
                date,
                steps,
                calories,
                sleep_hours,
            });
        }
        Ok(entries)
    })
}

/// Entry count and per-field averages over the full ledger.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ActivitySummary {
    pub entries: usize,
    pub avg_steps: f64,
    pub avg_calories: f64,
    pub avg_sleep_hours: f64,
}

pub fn summary(store: &Store, email: &str) -> Result<ActivitySummary, error::WellnestError> {
    let entries = all(store, email)?;
    let n = entries.len();
    if n == 0 {
        return Ok(ActivitySummary {
            entries: 0,
            avg_steps: 0.0,
            avg_calories: 0.0,
            avg_sleep_hours: 0.0,
        });
    }
    let steps: i64 = entries.iter().map(|e| e.steps).sum();
    let calories: i64 = entries.iter().map(|e| e.calories).sum();
    let sleep: f64 = entries.iter().map(|e| e.sleep_hours).sum();
    Ok(ActivitySummary {
        entries: n,
        avg_steps: steps as f64 / n as f64,
        avg_calories: calories as f64 / n as f64,
        avg_sleep_hours: sleep / n as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_boundaries() {
        assert!(validate_entry(0, 0, 0.0).is_empty());
        assert!(validate_entry(MAX_STEPS, MAX_CALORIES, MAX_SLEEP_HOURS).is_empty());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let errors = validate_entry(-1, -1, -0.5);
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("Steps"));
        assert!(errors[1].contains("Calories"));
        assert!(errors[2].contains("Sleep"));

        let errors = validate_entry(MAX_STEPS + 1, MAX_CALORIES + 1, 24.5);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_validate_collects_all_reasons() {
        // one good field does not mask the bad ones
        let errors = validate_entry(5000, -10, 30.0);
        assert_eq!(errors.len(), 2);
    }
}
