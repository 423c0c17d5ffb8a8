//! Per-user operation facade.
//!
//! `Dashboard` is the surface the surrounding application (CLI, web UI)
//! calls. It owns nothing global: every operation names the user it acts
//! for, takes the wall clock as an argument where timing matters, and goes
//! straight to the persisted store. There is no process-wide mutable
//! session; two users (or two requests) never share state.

use crate::core::error::WellnestError;
use crate::core::store::Store;
use crate::subsystems::accounts::{self, NewAccount, ProfilePatch, UserProfile};
use crate::subsystems::activity::{self, ActivityEntry, ActivitySummary};
use crate::subsystems::badges::{self, Badge};
use crate::subsystems::notify::NotificationPort;
use crate::subsystems::verification::{self, PendingRegistration, VerificationSession};

pub const MIN_PASSWORD_LEN: usize = 6;

pub struct Dashboard<N: NotificationPort> {
    store: Store,
    notifier: N,
}

/// Registration-form checks run before a code is issued. All violations are
/// collected.
pub fn validate_registration(pending: &PendingRegistration) -> Vec<String> {
    let mut errors = Vec::new();

    let parts: Vec<&str> = pending.email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        errors.push("Please enter a valid email address".to_string());
    }
    if pending.username.is_empty() {
        errors.push("Please enter a username".to_string());
    }
    if pending.password.len() < MIN_PASSWORD_LEN {
        errors.push("Password must be at least 6 characters long".to_string());
    }

    errors
}

impl<N: NotificationPort> Dashboard<N> {
    pub fn new(store: Store, notifier: N) -> Self {
        Self { store, notifier }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Validate the form, issue a code, persist the pending registration,
    /// and hand the code to the notification port. A delivery failure rolls
    /// the session back so issuance never happened; the caller may retry
    /// immediately with no cooldown.
    pub fn start_registration(
        &self,
        pending: &PendingRegistration,
        now: i64,
    ) -> Result<VerificationSession, WellnestError> {
        let errors = validate_registration(pending);
        if !errors.is_empty() {
            return Err(WellnestError::ValidationFailed(errors));
        }
        match accounts::get_profile(&self.store, &pending.email) {
            Ok(_) => return Err(WellnestError::DuplicateEmail(pending.email.clone())),
            Err(WellnestError::AccountNotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let code = verification::generate_code();
        let session = VerificationSession::issue(&pending.email, &code, now);
        verification::save_session(&self.store, pending, &session)?;

        if let Err(e) = self.notifier.send(&pending.email, &code) {
            verification::delete_session(&self.store, &pending.email)?;
            return Err(e);
        }
        Ok(session)
    }

    /// Check the entered code and, on success, materialize the pending
    /// registration into a verified account. The plaintext password is
    /// hashed here and nowhere earlier persists a digest.
    pub fn confirm_code(
        &self,
        email: &str,
        input: &str,
        now: i64,
    ) -> Result<UserProfile, WellnestError> {
        let (pending, session) = verification::load_session(&self.store, email)?
            .ok_or_else(|| WellnestError::NoPendingRegistration(email.to_string()))?;

        session.confirm(input, now)?;

        accounts::register(
            &self.store,
            &NewAccount {
                email: pending.email.clone(),
                password_hash: accounts::hash_password(&pending.password),
                username: pending.username.clone(),
                age: pending.age,
                height_cm: pending.height_cm,
                weight_kg: pending.weight_kg,
            },
        )?;
        verification::delete_session(&self.store, email)?;

        accounts::get_profile(&self.store, email)
    }

    /// Re-issue the code after the cooldown. A delivery failure restores the
    /// previous code and timers, so an undelivered resend does not burn the
    /// cooldown or invalidate the code the user may still have.
    pub fn resend_code(&self, email: &str, now: i64) -> Result<VerificationSession, WellnestError> {
        let (pending, mut session) = verification::load_session(&self.store, email)?
            .ok_or_else(|| WellnestError::NoPendingRegistration(email.to_string()))?;
        let previous = session.clone();

        let code = verification::generate_code();
        session.resend(&code, now)?;
        verification::save_session(&self.store, &pending, &session)?;

        if let Err(e) = self.notifier.send(email, &code) {
            verification::save_session(&self.store, &pending, &previous)?;
            return Err(e);
        }
        Ok(session)
    }

    /// Discard the in-flight registration, if any.
    pub fn abandon_registration(&self, email: &str) -> Result<(), WellnestError> {
        verification::delete_session(&self.store, email)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<UserProfile, WellnestError> {
        accounts::authenticate(&self.store, email, password)
    }

    pub fn update_profile(
        &self,
        email: &str,
        patch: &ProfilePatch,
    ) -> Result<UserProfile, WellnestError> {
        accounts::update_profile(&self.store, email, patch)
    }

    /// Append one entry and re-run the achievement rules over the full
    /// ledger. Returns the badges earned by this append, already merged into
    /// the persisted set; the caller only has to show them.
    pub fn log_activity(
        &self,
        email: &str,
        entry: &ActivityEntry,
    ) -> Result<Vec<Badge>, WellnestError> {
        activity::append(&self.store, email, entry)?;

        let snapshot = activity::all(&self.store, email)?;
        let already = badges::load_awarded(&self.store, email)?;
        let earned = badges::evaluate(&snapshot, &already);
        badges::record_awarded(&self.store, email, &earned)?;
        Ok(earned)
    }

    pub fn reset_activity(&self, email: &str) -> Result<(), WellnestError> {
        activity::reset(&self.store, email)
    }

    pub fn list_activity(&self, email: &str) -> Result<Vec<ActivityEntry>, WellnestError> {
        activity::all(&self.store, email)
    }

    pub fn activity_summary(&self, email: &str) -> Result<ActivitySummary, WellnestError> {
        activity::summary(&self.store, email)
    }

    /// Every badge the user holds, in declaration order.
    pub fn current_badges(&self, email: &str) -> Result<Vec<Badge>, WellnestError> {
        let awarded = badges::load_awarded(&self.store, email)?;
        Ok(Badge::ALL
            .into_iter()
            .filter(|b| awarded.contains(b))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(email: &str, password: &str) -> PendingRegistration {
        PendingRegistration {
            email: email.to_string(),
            username: "tester".to_string(),
            password: password.to_string(),
            age: 30,
            height_cm: 170.0,
            weight_kg: 70.0,
        }
    }

    #[test]
    fn test_validate_registration_ok() {
        assert!(validate_registration(&pending("a@x.com", "secret1")).is_empty());
    }

    #[test]
    fn test_validate_registration_bad_email() {
        assert!(!validate_registration(&pending("ax.com", "secret1")).is_empty());
        assert!(!validate_registration(&pending("@x.com", "secret1")).is_empty());
        assert!(!validate_registration(&pending("a@", "secret1")).is_empty());
        assert!(!validate_registration(&pending("a@x@y.com", "secret1")).is_empty());
    }

    #[test]
    fn test_validate_registration_short_password() {
        let errors = validate_registration(&pending("a@x.com", "abc"));
        assert!(errors.iter().any(|e| e.contains("at least 6")));
    }

    #[test]
    fn test_validate_registration_collects_all() {
        let mut bad = pending("nope", "abc");
        bad.username.clear();
        assert_eq!(validate_registration(&bad).len(), 3);
    }
}
