//! Shared plumbing for the WellNest core: store handle, database access,
//! the mutation broker, schema DDL, timestamps, and the error taxonomy.

pub mod broker;
pub mod db;
pub mod error;
pub mod schemas;
pub mod store;
pub mod time;
