//! In-memory auth provider and data service for tests.
//!
//! Both fakes are cheap `Clone` handles over shared state, so a test can keep one
//! handle to inspect recorded calls or inject failures while the
//! [`crate::SessionStore`] owns another.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use chrono::{Duration, Utc};
use tokio::sync::Notify;

use crate::backend::{AuthEvent, AuthProvider, DataService};
use crate::error::{Error, Result};
use crate::listeners::{Listeners, Subscription};
use crate::models::{
    Appointment, Injury, InjuryStatus, NewInjury, NewProfile, Profile, ProfileChanges, Role,
    Session, User,
};

#[derive(Default)]
struct AuthInner {
    /// email -> (password, identity)
    accounts: RefCell<HashMap<String, (String, User)>>,
    session: RefCell<Option<Session>>,
    listeners: Listeners<AuthEvent>,
    deleted: RefCell<Vec<String>>,
    sign_in_error: RefCell<Option<Error>>,
    sign_up_returns_no_user: Cell<bool>,
    sign_out_fails: Cell<bool>,
    next_id: Cell<u64>,
}

/// In-memory [`AuthProvider`].
///
/// Sign in, sign up and sign out emit the same events a hosted provider would.
/// [`MemoryAuth::emit`] delivers arbitrary events to simulate provider pushes.
#[derive(Clone, Default)]
pub struct MemoryAuth {
    inner: Rc<AuthInner>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an identity that can sign in with `password`.
    pub fn add_account(&self, email: &str, password: &str) -> User {
        let user = User {
            id: self.next_user_id(),
            email: email.to_string(),
        };
        self.inner
            .accounts
            .borrow_mut()
            .insert(email.to_string(), (password.to_string(), user.clone()));
        user
    }

    /// A one hour session for `user`.
    pub fn session_for(user: &User) -> Session {
        Session {
            access_token: format!("access-{}", user.id),
            refresh_token: format!("refresh-{}", user.id),
            expires_at: Utc::now() + Duration::hours(1),
            user: user.clone(),
        }
    }

    /// Set the session returned by `get_session` without emitting anything.
    pub fn set_session(&self, session: Option<Session>) {
        *self.inner.session.borrow_mut() = session;
    }

    /// Deliver `event` to every listener, as the provider would on its own.
    pub fn emit(&self, event: AuthEvent) {
        *self.inner.session.borrow_mut() = event.session.clone();
        self.inner.listeners.emit(&event);
    }

    pub fn fail_sign_in_with(&self, error: Error) {
        *self.inner.sign_in_error.borrow_mut() = Some(error);
    }

    pub fn return_no_user_on_sign_up(&self) {
        self.inner.sign_up_returns_no_user.set(true);
    }

    pub fn fail_sign_out(&self) {
        self.inner.sign_out_fails.set(true);
    }

    /// Ids passed to `delete_user`, in call order.
    pub fn deleted_users(&self) -> Vec<String> {
        self.inner.deleted.borrow().clone()
    }

    pub fn has_account(&self, email: &str) -> bool {
        self.inner.accounts.borrow().contains_key(email)
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }

    fn next_user_id(&self) -> String {
        let id = self.inner.next_id.get() + 1;
        self.inner.next_id.set(id);
        format!("user-{id}")
    }
}

impl AuthProvider for MemoryAuth {
    async fn get_session(&self) -> Result<Option<Session>> {
        Ok(self.inner.session.borrow().clone())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        if let Some(error) = self.inner.sign_in_error.borrow().clone() {
            return Err(error);
        }
        let user = match self.inner.accounts.borrow().get(email) {
            Some((stored, user)) if stored == password => user.clone(),
            _ => return Err(Error::Auth("Invalid login credentials".to_string())),
        };
        let session = Self::session_for(&user);
        self.emit(AuthEvent::signed_in(session.clone()));
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<User>> {
        if self.has_account(email) {
            return Err(Error::Auth("User already registered".to_string()));
        }
        if self.inner.sign_up_returns_no_user.get() {
            return Ok(None);
        }
        let user = self.add_account(email, password);
        self.emit(AuthEvent::signed_in(Self::session_for(&user)));
        Ok(Some(user))
    }

    async fn sign_out(&self) -> Result<()> {
        if self.inner.sign_out_fails.get() {
            return Err(Error::Transport("connection reset".to_string()));
        }
        self.emit(AuthEvent::signed_out());
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> Result<()> {
        self.inner.deleted.borrow_mut().push(user_id.to_string());
        self.inner
            .accounts
            .borrow_mut()
            .retain(|_, (_, user)| user.id != user_id);
        Ok(())
    }

    fn on_auth_state_change(&self, listener: impl Fn(&AuthEvent) + 'static) -> Subscription {
        self.inner.listeners.add(listener)
    }
}

#[derive(Default)]
struct DataInner {
    profiles: RefCell<HashMap<String, Profile>>,
    injuries: RefCell<Vec<Injury>>,
    appointments: RefCell<Vec<(String, Appointment)>>,
    inserted_injuries: RefCell<Vec<NewInjury>>,
    profile_insert_error: RefCell<Option<Error>>,
    profile_fetch_error: RefCell<Option<Error>>,
    injury_insert_error: RefCell<Option<Error>>,
    injury_fetch_error: RefCell<Option<Error>>,
    profile_fetches: Cell<usize>,
    profile_gate: RefCell<Option<Rc<Notify>>>,
    next_id: Cell<u64>,
}

/// In-memory [`DataService`].
#[derive(Clone, Default)]
pub struct MemoryData {
    inner: Rc<DataInner>,
}

impl MemoryData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a profile row for `user` directly.
    pub fn add_profile(&self, user: &User, full_name: &str, role: Role) -> Profile {
        let now = Utc::now();
        let profile = Profile {
            id: user.id.clone(),
            full_name: full_name.to_string(),
            email: user.email.clone(),
            role,
            profile_pic_url: None,
            sport: None,
            specialization: None,
            phone: None,
            student_number: None,
            created_at: now,
            updated_at: now,
        };
        self.inner
            .profiles
            .borrow_mut()
            .insert(profile.id.clone(), profile.clone());
        profile
    }

    pub fn profile(&self, user_id: &str) -> Option<Profile> {
        self.inner.profiles.borrow().get(user_id).cloned()
    }

    pub fn add_appointment(&self, student_id: &str, appointment: Appointment) {
        self.inner
            .appointments
            .borrow_mut()
            .push((student_id.to_string(), appointment));
    }

    pub fn fail_next_profile_insert(&self, error: Error) {
        *self.inner.profile_insert_error.borrow_mut() = Some(error);
    }

    pub fn fail_next_profile_fetch(&self, error: Error) {
        *self.inner.profile_fetch_error.borrow_mut() = Some(error);
    }

    pub fn fail_next_injury_insert(&self, error: Error) {
        *self.inner.injury_insert_error.borrow_mut() = Some(error);
    }

    pub fn fail_next_injury_fetch(&self, error: Error) {
        *self.inner.injury_fetch_error.borrow_mut() = Some(error);
    }

    /// Every injury payload passed to `insert_injury`, including failed ones.
    pub fn inserted_injuries(&self) -> Vec<NewInjury> {
        self.inner.inserted_injuries.borrow().clone()
    }

    pub fn profile_fetch_count(&self) -> usize {
        self.inner.profile_fetches.get()
    }

    /// Make the next profile fetch answer only once the returned [`Notify`] is
    /// notified, with the row as it was when the fetch started.
    pub fn hold_profile_fetches(&self) -> Rc<Notify> {
        let gate = Rc::new(Notify::new());
        *self.inner.profile_gate.borrow_mut() = Some(gate.clone());
        gate
    }

    fn next_id(&self, prefix: &str) -> String {
        let id = self.inner.next_id.get() + 1;
        self.inner.next_id.set(id);
        format!("{prefix}-{id}")
    }
}

impl DataService for MemoryData {
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        self.inner
            .profile_fetches
            .set(self.inner.profile_fetches.get() + 1);
        // read now, answer when the gate opens
        let profile = self.profile(user_id);
        let gate = self.inner.profile_gate.borrow_mut().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if let Some(error) = self.inner.profile_fetch_error.borrow_mut().take() {
            return Err(error);
        }
        Ok(profile)
    }

    async fn insert_profile(&self, profile: &NewProfile) -> Result<Profile> {
        if let Some(error) = self.inner.profile_insert_error.borrow_mut().take() {
            return Err(error);
        }
        if self.inner.profiles.borrow().contains_key(&profile.id) {
            return Err(Error::Data {
                message: "duplicate key value violates unique constraint \"users_pkey\""
                    .to_string(),
                code: Some("23505".to_string()),
            });
        }
        let now = Utc::now();
        let row = Profile {
            id: profile.id.clone(),
            full_name: profile.full_name.clone(),
            email: profile.email.clone(),
            role: profile.role,
            profile_pic_url: None,
            sport: profile.sport.clone(),
            specialization: profile.specialization.clone(),
            phone: profile.phone.clone(),
            student_number: profile.student_number.clone(),
            created_at: now,
            updated_at: now,
        };
        self.inner
            .profiles
            .borrow_mut()
            .insert(row.id.clone(), row.clone());
        Ok(row)
    }

    async fn update_profile(&self, user_id: &str, changes: &ProfileChanges) -> Result<Profile> {
        let mut profiles = self.inner.profiles.borrow_mut();
        let profile = profiles
            .get_mut(user_id)
            .ok_or_else(|| Error::data(format!("No profile for user {user_id}")))?;
        changes.apply_to(profile);
        profile.updated_at = Utc::now();
        Ok(profile.clone())
    }

    async fn insert_injury(&self, injury: &NewInjury) -> Result<Injury> {
        self.inner
            .inserted_injuries
            .borrow_mut()
            .push(injury.clone());
        if let Some(error) = self.inner.injury_insert_error.borrow_mut().take() {
            return Err(error);
        }
        let now = Utc::now();
        let row = Injury {
            id: self.next_id("injury"),
            student_id: injury.student_id.clone(),
            injury_type: injury.injury_type.clone(),
            body_part: injury.body_part.clone(),
            severity: injury.severity,
            description: injury.description.clone(),
            date_reported: now,
            date_occurred: injury.date_occurred,
            status: injury.status,
            created_at: now,
            updated_at: now,
        };
        self.inner.injuries.borrow_mut().push(row.clone());
        Ok(row)
    }

    async fn fetch_injury(&self, injury_id: &str) -> Result<Option<Injury>> {
        if let Some(error) = self.inner.injury_fetch_error.borrow_mut().take() {
            return Err(error);
        }
        Ok(self
            .inner
            .injuries
            .borrow()
            .iter()
            .find(|i| i.id == injury_id)
            .cloned())
    }

    async fn recent_injuries(&self, student_id: &str, limit: usize) -> Result<Vec<Injury>> {
        let mut rows: Vec<Injury> = self
            .inner
            .injuries
            .borrow()
            .iter()
            .rev()
            .filter(|i| i.student_id == student_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn injuries_with_status(
        &self,
        status: InjuryStatus,
        limit: usize,
    ) -> Result<Vec<Injury>> {
        let mut rows: Vec<Injury> = self
            .inner
            .injuries
            .borrow()
            .iter()
            .filter(|i| i.status == status)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.date_reported.cmp(&b.date_reported));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn upcoming_appointments(
        &self,
        student_id: &str,
        limit: usize,
    ) -> Result<Vec<Appointment>> {
        let now = Utc::now();
        let mut rows: Vec<Appointment> = self
            .inner
            .appointments
            .borrow()
            .iter()
            .filter(|(student, a)| student == student_id && a.appointment_date >= now)
            .map(|(_, a)| a.clone())
            .collect();
        rows.sort_by(|a, b| a.appointment_date.cmp(&b.appointment_date));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn count_profiles(&self, role: Role) -> Result<u64> {
        Ok(self
            .inner
            .profiles
            .borrow()
            .values()
            .filter(|p| p.role == role)
            .count() as u64)
    }

    async fn count_injuries_with_status(&self, status: InjuryStatus) -> Result<u64> {
        Ok(self
            .inner
            .injuries
            .borrow()
            .iter()
            .filter(|i| i.status == status)
            .count() as u64)
    }

    async fn count_open_injuries(&self) -> Result<u64> {
        Ok(self
            .inner
            .injuries
            .borrow()
            .iter()
            .filter(|i| i.status.is_open())
            .count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;
    use chrono::NaiveDate;

    fn new_injury(student_id: &str, injury_type: &str) -> NewInjury {
        NewInjury {
            student_id: student_id.to_string(),
            injury_type: injury_type.to_string(),
            body_part: "Knee".to_string(),
            severity: Severity::Moderate,
            description: "Landed badly".to_string(),
            date_occurred: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            status: InjuryStatus::Reported,
        }
    }

    #[tokio::test]
    async fn test_sign_in_checks_password_and_emits() {
        let auth = MemoryAuth::new();
        let user = auth.add_account("a@example.com", "secret1");
        let events = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let events = events.clone();
            auth.on_auth_state_change(move |e| events.borrow_mut().push(e.kind))
        };

        assert!(auth.sign_in_with_password("a@example.com", "nope").await.is_err());
        assert!(events.borrow().is_empty());

        let session = auth
            .sign_in_with_password("a@example.com", "secret1")
            .await
            .unwrap();
        assert_eq!(session.user, user);
        assert_eq!(events.borrow().len(), 1);
        assert_eq!(auth.get_session().await.unwrap(), Some(session));
    }

    #[tokio::test]
    async fn test_sign_up_rejects_duplicates() {
        let auth = MemoryAuth::new();
        auth.add_account("dup@example.com", "pw");
        let err = auth.sign_up("dup@example.com", "pw").await.unwrap_err();
        assert_eq!(err, Error::Auth("User already registered".to_string()));
    }

    #[tokio::test]
    async fn test_recent_injuries_newest_first_and_limited() {
        let data = MemoryData::new();
        for kind in ["Sprain", "Strain", "Fracture"] {
            data.insert_injury(&new_injury("s-1", kind)).await.unwrap();
        }
        data.insert_injury(&new_injury("s-2", "Other")).await.unwrap();

        let rows = data.recent_injuries("s-1", 2).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].injury_type, "Fracture");
        assert_eq!(rows[1].injury_type, "Strain");
        assert_eq!(data.count_open_injuries().await.unwrap(), 4);
        assert_eq!(
            data.count_injuries_with_status(InjuryStatus::Resolved)
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_update_profile_applies_changes() {
        let data = MemoryData::new();
        let user = User {
            id: "p-1".to_string(),
            email: "p@example.com".to_string(),
        };
        data.add_profile(&user, "Dr. Naidoo", Role::Practitioner);

        let changes = ProfileChanges {
            specialization: Some("Physiotherapy".to_string()),
            ..Default::default()
        };
        let updated = data.update_profile("p-1", &changes).await.unwrap();
        assert_eq!(updated.specialization.as_deref(), Some("Physiotherapy"));
        assert_eq!(data.count_profiles(Role::Practitioner).await.unwrap(), 1);
        assert!(data.update_profile("missing", &changes).await.is_err());
    }
}
