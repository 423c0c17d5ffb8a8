//! WellNest: the verified-account, activity-ledger, and achievement core of
//! a personal health dashboard.
//!
//! The surrounding UI (pages, charts, population comparisons) is a thin
//! layer over this crate. What lives here is the invariant-bearing logic:
//!
//! - **Registration and verification**: a registration produces a pending
//!   record plus a one-time 6-digit code (10-minute expiry, 60-second resend
//!   cooldown); only a confirmed code materializes a durable account.
//! - **Credential store**: one account per email, SHA-256 password digests,
//!   BMI derived on every height/weight change.
//! - **Activity ledger**: validated, append-only daily entries with a
//!   one-entry-per-date rule enforced against the persisted store.
//! - **Badge engine**: pure evaluation of achievement rules (including the
//!   7-day consistency streak) returning only the newly earned delta.
//!
//! All durable state sits in one SQLite database per store root; every
//! mutation routes through [`core::broker::DbBroker`], which serializes
//! access and appends an audit event. Expiry and cooldown are decided lazily
//! by comparing stored timestamps against a `now` argument — no background
//! timer drives any state.
//!
//! # Crate structure
//!
//! - [`cli`]: clap types and dispatch for the `wellnest` binary
//! - [`core`]: store handle, database access, broker, schemas, errors, time
//! - [`subsystems`]: accounts, verification, notify, activity, badges, and
//!   the [`subsystems::session::Dashboard`] facade the application calls

pub mod cli;
pub mod core;
pub mod subsystems;
