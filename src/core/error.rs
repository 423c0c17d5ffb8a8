use rusqlite;
use std::io;
use thiserror::Error;

/// Every failure the core can report. All variants are recoverable and meant
/// for user-facing display; the SQLite/I/O variants are the storage class the
/// caller may retry.
#[derive(Error, Debug)]
pub enum WellnestError {
    #[error("SQLite error: {0}")]
    RusqliteError(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("Failed to initialize database: {0}")]
    DatabaseInitializationError(String),
    #[error("An account already exists for {0}")]
    DuplicateEmail(String),
    #[error("No account found for {0}")]
    AccountNotFound(String),
    #[error("Invalid password")]
    InvalidPassword,
    #[error("Incorrect code. Please check your email and try again.")]
    CodeMismatch,
    #[error("Verification code has expired. Please request a new one.")]
    CodeExpired,
    #[error("Please wait {0}s before requesting another code")]
    CooldownActive(i64),
    #[error("Unable to send verification code: {0}")]
    DeliveryFailed(String),
    #[error("Validation failed: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),
    #[error("An entry for {0} already exists. Please choose a different date.")]
    DuplicateDate(String),
    #[error("No pending registration for {0}")]
    NoPendingRegistration(String),
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),
}
