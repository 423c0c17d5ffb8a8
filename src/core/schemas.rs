//! Centralized database schema definitions for the WellNest store.
//!
//! WellNest keeps all durable state in a single SQLite database:
//! - accounts: verified user accounts keyed by email.
//! - pending_registrations: at most one in-flight verification per email.
//! - activity_log: the append-only daily ledger, keyed by (email, date).
//! - awarded_badges: the monotone set of achievements per user.

pub const WELLNEST_DB_NAME: &str = "wellnest.db";

pub const ACCOUNTS_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS accounts (
        email TEXT PRIMARY KEY,
        password_hash TEXT NOT NULL,
        username TEXT NOT NULL,
        age INTEGER NOT NULL,
        height_cm REAL NOT NULL,
        weight_kg REAL NOT NULL,
        bmi REAL NOT NULL,
        registered_on TEXT NOT NULL
    )
";

pub const PENDING_REGISTRATIONS_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS pending_registrations (
        email TEXT PRIMARY KEY,
        username TEXT NOT NULL,
        password TEXT NOT NULL,
        age INTEGER NOT NULL,
        height_cm REAL NOT NULL,
        weight_kg REAL NOT NULL,
        code TEXT NOT NULL,
        issued_at INTEGER NOT NULL,
        expires_at INTEGER NOT NULL,
        last_sent_at INTEGER NOT NULL
    )
";

pub const ACTIVITY_LOG_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS activity_log (
        email TEXT NOT NULL,
        date TEXT NOT NULL,
        steps INTEGER NOT NULL,
        calories INTEGER NOT NULL,
        sleep_hours REAL NOT NULL,
        logged_at TEXT NOT NULL,
        PRIMARY KEY (email, date)
    )
";

pub const AWARDED_BADGES_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS awarded_badges (
        email TEXT NOT NULL,
        badge TEXT NOT NULL,
        awarded_at TEXT NOT NULL,
        PRIMARY KEY (email, badge)
    )
";
