//! Domain subsystems: credential store, verification state machine,
//! notification port, activity ledger, badge engine, and the per-user
//! operation facade.

pub mod accounts;
pub mod activity;
pub mod badges;
pub mod notify;
pub mod session;
pub mod verification;
