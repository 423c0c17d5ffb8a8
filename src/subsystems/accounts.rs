//! Credential store: verified accounts, password hashing, profile edits.
//!
//! Accounts are created only by the verification subsystem materializing a
//! confirmed registration; nothing here ever inserts an unverified user.

use crate::core::broker::DbBroker;
use crate::core::db;
use crate::core::error;
use crate::core::store::Store;
use crate::core::time;
use rusqlite::{OptionalExtension, params};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A verified account as stored. The email is the identity key and never
/// changes; `bmi` is derived and rewritten on every height/weight change.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserProfile {
    pub email: String,
    pub username: String,
    pub age: i64,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub bmi: f64,
    pub registered_on: String,
}

/// Input to `register`: the profile fields of a confirmed registration plus
/// the already-hashed password.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub username: String,
    pub age: i64,
    pub height_cm: f64,
    pub weight_kg: f64,
}

/// Partial profile edit. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub username: Option<String>,
    pub age: Option<i64>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
}

pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn verify_password(password: &str, hashed: &str) -> bool {
    hash_password(password) == hashed
}

pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

pub fn bmi_category(bmi: f64) -> &'static str {
    if bmi < 18.5 {
        "Underweight"
    } else if bmi < 25.0 {
        "Normal weight"
    } else if bmi < 30.0 {
        "Overweight"
    } else {
        "Obese"
    }
}

/// Insert a new verified account. Fails with `DuplicateEmail` if a row for
/// this email already exists; the check and the insert run under the same
/// broker lock, so two racing registrations cannot both succeed.
pub fn register(store: &Store, account: &NewAccount) -> Result<(), error::WellnestError> {
    db::initialize_wellnest_db(&store.root)?;
    let broker = DbBroker::new(&store.root);
    let db_path = db::wellnest_db_path(&store.root);
    let registered_on = time::now_epoch_z();

    broker.with_conn(&db_path, &account.email, "accounts.register", |conn| {
        let exists: Option<String> = conn
            .query_row(
                "SELECT email FROM accounts WHERE email = ?1",
                params![account.email],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_some() {
            return Err(error::WellnestError::DuplicateEmail(account.email.clone()));
        }

        let bmi = calculate_bmi(account.weight_kg, account.height_cm);
        conn.execute(
            "INSERT INTO accounts(email, password_hash, username, age, height_cm, weight_kg, bmi, registered_on)
             VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                account.email,
                account.password_hash,
                account.username,
                account.age,
                account.height_cm,
                account.weight_kg,
                bmi,
                registered_on
            ],
        )?;
        Ok(())
    })
}

pub fn authenticate(
    store: &Store,
    email: &str,
    password: &str,
) -> Result<UserProfile, error::WellnestError> {
    db::initialize_wellnest_db(&store.root)?;
    let broker = DbBroker::new(&store.root);
    let db_path = db::wellnest_db_path(&store.root);

    broker.with_conn(&db_path, email, "accounts.authenticate", |conn| {
        let row: Option<(String, UserProfile)> = conn
            .query_row(
                "SELECT email, password_hash, username, age, height_cm, weight_kg, bmi, registered_on
                 FROM accounts WHERE email = ?1",
                params![email],
                |row| {
                    Ok((
                        row.get::<_, String>(1)?,
                        UserProfile {
                            email: row.get(0)?,
                            username: row.get(2)?,
                            age: row.get(3)?,
                            height_cm: row.get(4)?,
                            weight_kg: row.get(5)?,
                            bmi: row.get(6)?,
                            registered_on: row.get(7)?,
                        },
                    ))
                },
            )
            .optional()?;

        let (stored_hash, profile) = match row {
            Some(found) => found,
            None => return Err(error::WellnestError::AccountNotFound(email.to_string())),
        };

        if !verify_password(password, &stored_hash) {
            return Err(error::WellnestError::InvalidPassword);
        }
        Ok(profile)
    })
}

pub fn get_profile(store: &Store, email: &str) -> Result<UserProfile, error::WellnestError> {
    db::initialize_wellnest_db(&store.root)?;
    let broker = DbBroker::new(&store.root);
    let db_path = db::wellnest_db_path(&store.root);

    broker.with_conn(&db_path, email, "accounts.get", |conn| {
        fetch_profile(conn, email)
    })
}

/// Apply a partial edit and recompute BMI from the resulting height/weight.
pub fn update_profile(
    store: &Store,
    email: &str,
    patch: &ProfilePatch,
) -> Result<UserProfile, error::WellnestError> {
    db::initialize_wellnest_db(&store.root)?;
    let broker = DbBroker::new(&store.root);
    let db_path = db::wellnest_db_path(&store.root);

    broker.with_conn(&db_path, email, "accounts.update_profile", |conn| {
        let current = fetch_profile(conn, email)?;

        let username = patch.username.clone().unwrap_or(current.username);
        let age = patch.age.unwrap_or(current.age);
        let height_cm = patch.height_cm.unwrap_or(current.height_cm);
        let weight_kg = patch.weight_kg.unwrap_or(current.weight_kg);
        let bmi = calculate_bmi(weight_kg, height_cm);

        conn.execute(
            "UPDATE accounts SET username = ?2, age = ?3, height_cm = ?4, weight_kg = ?5, bmi = ?6
             WHERE email = ?1",
            params![email, username, age, height_cm, weight_kg, bmi],
        )?;

        fetch_profile(conn, email)
    })
}

fn fetch_profile(
    conn: &rusqlite::Connection,
    email: &str,
) -> Result<UserProfile, error::WellnestError> {
    conn.query_row(
        "SELECT email, username, age, height_cm, weight_kg, bmi, registered_on
         FROM accounts WHERE email = ?1",
        params![email],
        |row| {
            Ok(UserProfile {
                email: row.get(0)?,
                username: row.get(1)?,
                age: row.get(2)?,
                height_cm: row.get(3)?,
                weight_kg: row.get(4)?,
                bmi: row.get(5)?,
                registered_on: row.get(6)?,
            })
        },
    )
    .optional()?
    .ok_or_else(|| error::WellnestError::AccountNotFound(email.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_is_sha256_hex() {
        let h = hash_password("secret1");
        assert_eq!(h.len(), 64);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(h, hash_password("secret1"));
        assert_ne!(h, hash_password("secret2"));
    }

    #[test]
    fn test_verify_password_round_trip() {
        let h = hash_password("hunter22");
        assert!(verify_password("hunter22", &h));
        assert!(!verify_password("hunter2", &h));
    }

    #[test]
    fn test_calculate_bmi() {
        let bmi = calculate_bmi(70.0, 170.0);
        assert!((bmi - 24.2214).abs() < 0.001);
    }

    #[test]
    fn test_bmi_category_boundaries() {
        assert_eq!(bmi_category(18.4), "Underweight");
        assert_eq!(bmi_category(18.5), "Normal weight");
        assert_eq!(bmi_category(24.9), "Normal weight");
        assert_eq!(bmi_category(25.0), "Overweight");
        assert_eq!(bmi_category(30.0), "Obese");
    }
}
