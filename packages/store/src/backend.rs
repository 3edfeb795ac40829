//! # Backend traits — the hosted auth and data services
//!
//! The session store never talks HTTP itself. It goes through two async traits,
//! so the same logic runs against the hosted service client (`api::HostedService`)
//! and against the in-memory fakes in [`crate::memory`].
//!
//! ## [`AuthProvider`]
//!
//! Identity operations plus a change feed. `on_auth_state_change` registers a
//! listener that receives an [`AuthEvent`] for every sign-in, sign-out, token
//! refresh or user update. The returned [`Subscription`] detaches the listener when
//! it is dropped or unsubscribed.
//!
//! ## [`DataService`]
//!
//! Row-level reads and writes against the `users`, `injuries` and `appointments`
//! collections. A missing row is `Ok(None)`, never an error.

use std::future::Future;

use crate::error::Result;
use crate::listeners::Subscription;
use crate::models::{
    Appointment, Injury, InjuryStatus, NewInjury, NewProfile, Profile, ProfileChanges, Role,
    Session, User,
};

/// Kind of auth-state change reported by the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthChangeEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
}

/// A single auth-state change and the session that resulted from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthEvent {
    pub kind: AuthChangeEvent,
    pub session: Option<Session>,
}

impl AuthEvent {
    pub fn signed_in(session: Session) -> Self {
        Self {
            kind: AuthChangeEvent::SignedIn,
            session: Some(session),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            kind: AuthChangeEvent::SignedOut,
            session: None,
        }
    }
}

/// Async interface to the external authentication provider.
pub trait AuthProvider {
    /// The session the provider currently considers active, if any.
    fn get_session(&self) -> impl Future<Output = Result<Option<Session>>>;

    fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Session>>;

    /// Create a new identity. `Ok(None)` means the provider accepted the request
    /// but returned no user.
    fn sign_up(&self, email: &str, password: &str) -> impl Future<Output = Result<Option<User>>>;

    fn sign_out(&self) -> impl Future<Output = Result<()>>;

    /// Remove an identity. Used to undo a half-finished registration.
    fn delete_user(&self, user_id: &str) -> impl Future<Output = Result<()>>;

    fn on_auth_state_change(&self, listener: impl Fn(&AuthEvent) + 'static) -> Subscription;
}

/// Async interface to the external data service.
pub trait DataService {
    fn fetch_profile(&self, user_id: &str) -> impl Future<Output = Result<Option<Profile>>>;

    fn insert_profile(&self, profile: &NewProfile) -> impl Future<Output = Result<Profile>>;

    fn update_profile(
        &self,
        user_id: &str,
        changes: &ProfileChanges,
    ) -> impl Future<Output = Result<Profile>>;

    fn insert_injury(&self, injury: &NewInjury) -> impl Future<Output = Result<Injury>>;

    fn fetch_injury(&self, injury_id: &str) -> impl Future<Output = Result<Option<Injury>>>;

    /// Most recent injuries of one student, newest first.
    fn recent_injuries(
        &self,
        student_id: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Injury>>>;

    /// Injuries in a given status, oldest report first.
    fn injuries_with_status(
        &self,
        status: InjuryStatus,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Injury>>>;

    /// Appointments from now on, soonest first, with the practitioner's name embedded.
    fn upcoming_appointments(
        &self,
        student_id: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Appointment>>>;

    fn count_profiles(&self, role: Role) -> impl Future<Output = Result<u64>>;

    fn count_injuries_with_status(&self, status: InjuryStatus) -> impl Future<Output = Result<u64>>;

    /// Injuries that are not yet resolved.
    fn count_open_injuries(&self) -> impl Future<Output = Result<u64>>;
}
