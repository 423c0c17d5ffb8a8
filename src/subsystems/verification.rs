//! Email verification for registration.
//!
//! One `VerificationSession` row exists per email while a registration is in
//! flight. The session is a small state machine: issued once, confirmable
//! until the code expires, re-issuable after a cooldown, and discarded on
//! confirmation or abandonment. All timing decisions are pure functions of a
//! `now` argument in epoch seconds; nothing here reads the clock.

use crate::core::broker::DbBroker;
use crate::core::db;
use crate::core::error;
use crate::core::store::Store;
use rand::Rng;
use rusqlite::{OptionalExtension, params};
use serde::{Deserialize, Serialize};

/// Codes are valid for ten minutes from issue (or re-issue).
pub const CODE_TTL_SECS: i64 = 10 * 60;
/// Minimum interval between resends.
pub const RESEND_COOLDOWN_SECS: i64 = 60;

/// Uniform 6-digit decimal code, leading zeros allowed.
pub fn generate_code() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{:06}", n)
}

/// The profile a user submitted at registration. Held verbatim (password
/// included) until confirmation, at which point the password is hashed and
/// the row becomes an account.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PendingRegistration {
    pub email: String,
    pub username: String,
    pub password: String,
    pub age: i64,
    pub height_cm: f64,
    pub weight_kg: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VerificationSession {
    pub email: String,
    pub code: String,
    pub issued_at: i64,
    pub expires_at: i64,
    pub last_sent_at: i64,
}

impl VerificationSession {
    pub fn issue(email: &str, code: &str, now: i64) -> Self {
        Self {
            email: email.to_string(),
            code: code.to_string(),
            issued_at: now,
            expires_at: now + CODE_TTL_SECS,
            last_sent_at: now,
        }
    }

    /// Check an entered code. Expiry wins over mismatch; neither outcome
    /// mutates the session, so retries are unlimited until expiry. A code is
    /// dead at the exact expiry instant.
    pub fn confirm(&self, input: &str, now: i64) -> Result<(), error::WellnestError> {
        if now >= self.expires_at {
            return Err(error::WellnestError::CodeExpired);
        }
        if input != self.code {
            return Err(error::WellnestError::CodeMismatch);
        }
        Ok(())
    }

    /// Replace the code and restart the timers, subject to the cooldown.
    pub fn resend(&mut self, new_code: &str, now: i64) -> Result<(), error::WellnestError> {
        let elapsed = now - self.last_sent_at;
        if elapsed < RESEND_COOLDOWN_SECS {
            return Err(error::WellnestError::CooldownActive(
                RESEND_COOLDOWN_SECS - elapsed,
            ));
        }
        self.code = new_code.to_string();
        self.expires_at = now + CODE_TTL_SECS;
        self.last_sent_at = now;
        Ok(())
    }

    pub fn seconds_until_expiry(&self, now: i64) -> i64 {
        self.expires_at - now
    }
}

/// Upsert the pending registration and its session timers. The primary key
/// on email keeps at most one active session per address.
pub fn save_session(
    store: &Store,
    pending: &PendingRegistration,
    session: &VerificationSession,
) -> Result<(), error::WellnestError> {
    db::initialize_wellnest_db(&store.root)?;
    let broker = DbBroker::new(&store.root);
    let db_path = db::wellnest_db_path(&store.root);

    broker.with_conn(&db_path, &pending.email, "verification.save", |conn| {
        conn.execute(
            "INSERT OR REPLACE INTO pending_registrations
             (email, username, password, age, height_cm, weight_kg, code, issued_at, expires_at, last_sent_at)
             VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                pending.email,
                pending.username,
                pending.password,
                pending.age,
                pending.height_cm,
                pending.weight_kg,
                session.code,
                session.issued_at,
                session.expires_at,
                session.last_sent_at
            ],
        )?;
        Ok(())
    })
}

pub fn load_session(
    store: &Store,
    email: &str,
) -> Result<Option<(PendingRegistration, VerificationSession)>, error::WellnestError> {
    db::initialize_wellnest_db(&store.root)?;
    let broker = DbBroker::new(&store.root);
    let db_path = db::wellnest_db_path(&store.root);

    broker.with_conn(&db_path, email, "verification.load", |conn| {
        let row = conn
            .query_row(
                "SELECT email, username, password, age, height_cm, weight_kg,
                        code, issued_at, expires_at, last_sent_at
                 FROM pending_registrations WHERE email = ?1",
                params![email],
                |row| {
                    Ok((
                        PendingRegistration {
                            email: row.get(0)?,
                            username: row.get(1)?,
                            password: row.get(2)?,
                            age: row.get(3)?,
                            height_cm: row.get(4)?,
                            weight_kg: row.get(5)?,
                        },
                        VerificationSession {
                            email: row.get(0)?,
                            code: row.get(6)?,
                            issued_at: row.get(7)?,
                            expires_at: row.get(8)?,
                            last_sent_at: row.get(9)?,
                        },
                    ))
                },
            )
            .optional()?;
        Ok(row)
    })
}

/// Discard the session and its pending registration (confirmation completed
/// or the user abandoned registration). Deleting a missing row is fine.
pub fn delete_session(store: &Store, email: &str) -> Result<(), error::WellnestError> {
    db::initialize_wellnest_db(&store.root)?;
    let broker = DbBroker::new(&store.root);
    let db_path = db::wellnest_db_path(&store.root);

    broker.with_conn(&db_path, email, "verification.delete", |conn| {
        conn.execute(
            "DELETE FROM pending_registrations WHERE email = ?1",
            params![email],
        )?;
        Ok(())
    })
}
