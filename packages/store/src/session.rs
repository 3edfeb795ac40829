//! # Session store — who is signed in, and as what
//!
//! [`SessionStore`] is the single source of truth for the signed-in identity and
//! its profile. It mirrors the auth provider's session, fetches the matching
//! [`Profile`] from the data service, and exposes the result as a
//! [`SessionState`] with four fields: `user`, `profile`, `session`, `loading`.
//!
//! ## Lifecycle
//!
//! | Step | Method | What happens |
//! |------|--------|--------------|
//! | construct | [`SessionStore::new`] | Subscribes to the provider's auth-state changes. Events are queued on an unbounded channel. `loading` starts `true`. |
//! | start | [`SessionStore::run`] | Resolves the existing session (and its profile), sets `loading = false`, then applies queued and future auth events in order until teardown. |
//! | stop | [`SessionStore::teardown`] | Drops the provider subscription, which closes the channel and ends `run`. |
//!
//! The store is a cheap `Clone` handle. State lives behind `Rc<RefCell<..>>`: the
//! store is meant for a single-threaded event loop, and no borrow is ever held
//! across an `.await`.
//!
//! ## Actions
//!
//! [`sign_in`](SessionStore::sign_in) and [`sign_out`](SessionStore::sign_out)
//! delegate to the provider. `sign_in` never touches local state; the provider's
//! `SignedIn` event does. `sign_out` clears local state even if the provider call
//! fails. [`sign_up`](SessionStore::sign_up) creates the identity and then the
//! profile row, deleting the identity again if the profile insert fails.
//!
//! A profile fetch that resolves after the session moved on to another user (or
//! to nobody) is discarded, and so is one overtaken by a later fetch.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::Utc;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::backend::{AuthEvent, AuthProvider, DataService};
use crate::error::{Error, Result};
use crate::injury::InjuryReport;
use crate::listeners::{Listeners, Subscription};
use crate::models::{Injury, Profile, ProfileChanges, Registration, Role, Session, User};

/// Minimum password length accepted by the hosted auth provider.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Snapshot of the session as seen by the UI.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    pub profile: Option<Profile>,
    pub session: Option<Session>,
    /// `true` until the initial session is resolved, and again while the profile
    /// of a newly signed-in user is being fetched.
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            profile: None,
            session: None,
            loading: true,
        }
    }
}

impl SessionState {
    pub fn role(&self) -> Option<Role> {
        self.profile.as_ref().map(|p| p.role)
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }
}

/// Check an email/password pair before it is sent to the provider.
pub fn validate_credentials(email: &str, password: &str) -> Result<()> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(Error::Invalid("Please enter a valid email".to_string()));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(Error::Invalid(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

struct Inner<A, D> {
    auth: A,
    data: D,
    state: RefCell<SessionState>,
    changes: Listeners<SessionState>,
    subscription: RefCell<Option<Subscription>>,
    events: RefCell<Option<UnboundedReceiver<AuthEvent>>>,
    /// Sequence number of the most recently started profile load.
    profile_load: Cell<u64>,
}

/// Owner of the session state and of the auth-state subscription.
pub struct SessionStore<A, D> {
    inner: Rc<Inner<A, D>>,
}

impl<A, D> Clone for SessionStore<A, D> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<A, D> PartialEq for SessionStore<A, D> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<A: AuthProvider, D: DataService> SessionStore<A, D> {
    /// Create the store and subscribe to `auth`'s state changes.
    pub fn new(auth: A, data: D) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = auth.on_auth_state_change(move |event| {
            if tx.send(event.clone()).is_err() {
                tracing::debug!("Session store gone, dropping auth event");
            }
        });

        Self {
            inner: Rc::new(Inner {
                auth,
                data,
                state: RefCell::new(SessionState::default()),
                changes: Listeners::new(),
                subscription: RefCell::new(Some(subscription)),
                events: RefCell::new(Some(rx)),
                profile_load: Cell::new(0),
            }),
        }
    }

    pub fn auth(&self) -> &A {
        &self.inner.auth
    }

    /// The data service, for views that read or write rows directly.
    pub fn data(&self) -> &D {
        &self.inner.data
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn user_id(&self) -> Option<String> {
        self.inner.state.borrow().user_id().map(str::to_string)
    }

    /// Call `listener` with the new state after every change.
    pub fn watch(&self, listener: impl Fn(&SessionState) + 'static) -> Subscription {
        self.inner.changes.add(listener)
    }

    /// Resolve the initial session, then apply auth events until [`teardown`](Self::teardown).
    pub async fn run(&self) {
        self.initialize().await;

        let Some(mut events) = self.inner.events.borrow_mut().take() else {
            tracing::warn!("Session store is already running or was torn down");
            return;
        };
        while let Some(event) = events.recv().await {
            self.handle_auth_event(event).await;
        }
        tracing::debug!("Auth event stream closed");
    }

    /// Ask the provider for an existing session and load its profile.
    pub async fn initialize(&self) {
        tracing::info!("Initializing auth session");
        let session = match self.inner.auth.get_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Could not restore session");
                None
            }
        };
        if session.is_none() {
            tracing::info!("No user in session");
        }
        self.apply_session(session).await;
    }

    /// Apply auth events that were already delivered, without waiting for more.
    ///
    /// Returns how many events were applied. Does nothing while [`run`](Self::run)
    /// owns the event stream.
    pub async fn process_pending_events(&self) -> usize {
        let pending: Vec<AuthEvent> = {
            let mut events = self.inner.events.borrow_mut();
            let mut pending = Vec::new();
            if let Some(rx) = events.as_mut() {
                while let Ok(event) = rx.try_recv() {
                    pending.push(event);
                }
            }
            pending
        };
        let count = pending.len();
        for event in pending {
            self.handle_auth_event(event).await;
        }
        count
    }

    /// Replace session and user from `event` and re-fetch the profile.
    pub async fn handle_auth_event(&self, event: AuthEvent) {
        tracing::info!(event = ?event.kind, "Auth state changed");
        self.apply_session(event.session).await;
    }

    /// Detach from the provider. A running [`run`](Self::run) loop returns.
    pub fn teardown(&self) {
        if let Some(subscription) = self.inner.subscription.borrow_mut().take() {
            subscription.unsubscribe();
        }
        self.inner.events.borrow_mut().take();
        tracing::debug!("Session store torn down");
    }

    /// Check credentials with the provider.
    ///
    /// Local state is updated only by the `SignedIn` event that follows.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<()> {
        let email = email.trim();
        tracing::info!(email, "Signing in");
        match self.inner.auth.sign_in_with_password(email, password).await {
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::warn!(email, error = %e, "Sign in failed");
                Err(e)
            }
        }
    }

    /// Create an identity and its profile row.
    ///
    /// If the profile insert fails the identity is deleted again, best effort,
    /// and the insert error is returned.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        registration: Registration,
    ) -> Result<Profile> {
        let email = email.trim();
        validate_credentials(email, password)?;
        registration.validate()?;
        tracing::info!(email, role = %registration.role, "Starting sign up");

        let user = match self.inner.auth.sign_up(email, password).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::error!(email, "No user returned from sign up");
                return Err(Error::MissingIdentity);
            }
            Err(e) => {
                tracing::warn!(email, error = %e, "Auth sign up failed");
                return Err(e);
            }
        };
        tracing::info!(user_id = %user.id, "Auth user created");

        let new_profile = registration.into_new_profile(&user.id, email);
        match self.inner.data.insert_profile(&new_profile).await {
            Ok(profile) => {
                tracing::info!(user_id = %user.id, "User registration completed");
                self.refresh_profile().await;
                Ok(profile)
            }
            Err(e) => {
                tracing::error!(user_id = %user.id, error = %e, "Profile creation failed");
                if let Err(cleanup) = self.inner.auth.delete_user(&user.id).await {
                    tracing::warn!(
                        user_id = %user.id,
                        error = %cleanup,
                        "Could not remove identity left without a profile"
                    );
                }
                Err(e)
            }
        }
    }

    /// End the session at the provider and clear local state either way.
    pub async fn sign_out(&self) {
        tracing::info!("Signing out user");
        if let Err(e) = self.inner.auth.sign_out().await {
            tracing::error!(error = %e, "Sign out failed at provider, clearing locally");
        }
        self.update(|state| {
            state.user = None;
            state.profile = None;
            state.session = None;
            state.loading = false;
        });
    }

    /// Re-fetch the profile of the current user.
    pub async fn refresh_profile(&self) {
        let Some(user_id) = self.user_id() else {
            return;
        };
        let load = self.begin_profile_load();
        let profile = self.load_profile(&user_id).await;
        let latest = self.is_latest_profile_load(load);
        self.update(|state| {
            if latest && state.user_id() == Some(user_id.as_str()) {
                state.profile = profile;
                state.loading = false;
            }
        });
    }

    /// Write `changes` to the current user's profile and resynchronize.
    pub async fn update_profile(&self, changes: &ProfileChanges) -> Result<Profile> {
        let user_id = self.user_id().ok_or(Error::NotSignedIn)?;
        if changes.is_empty() {
            return self
                .inner
                .state
                .borrow()
                .profile
                .clone()
                .ok_or(Error::NotSignedIn);
        }
        let updated = self.inner.data.update_profile(&user_id, changes).await?;
        self.refresh_profile().await;
        Ok(updated)
    }

    /// Validate `report` and insert it for the current user with status `reported`.
    pub async fn report_injury(&self, report: InjuryReport) -> Result<Injury> {
        let student_id = self.user_id().ok_or(Error::NotSignedIn)?;
        report.validate(Utc::now().date_naive())?;
        let injury = report.into_new_injury(&student_id);
        match self.inner.data.insert_injury(&injury).await {
            Ok(row) => {
                tracing::info!(injury_id = %row.id, "Injury reported");
                Ok(row)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to report injury");
                Err(e)
            }
        }
    }

    async fn apply_session(&self, session: Option<Session>) {
        let user = session.as_ref().map(|s| s.user.clone());
        let user_id = user.as_ref().map(|u| u.id.clone());

        self.update(|state| {
            let same_user = state.user_id() == user_id.as_deref();
            if !same_user {
                state.profile = None;
                state.loading = user_id.is_some();
            }
            state.session = session;
            state.user = user;
        });

        let Some(user_id) = user_id else {
            self.update(|state| state.loading = false);
            return;
        };

        tracing::debug!(user_id = %user_id, "User authenticated, fetching profile");
        let load = self.begin_profile_load();
        let profile = self.load_profile(&user_id).await;
        let latest = self.is_latest_profile_load(load);
        self.update(|state| {
            if state.user_id() != Some(user_id.as_str()) {
                tracing::debug!(user_id = %user_id, "Discarding profile of a previous session");
                if latest {
                    state.loading = false;
                }
            } else if latest {
                state.profile = profile;
                state.loading = false;
            } else {
                tracing::debug!(user_id = %user_id, "Discarding superseded profile fetch");
            }
        });
    }

    fn begin_profile_load(&self) -> u64 {
        let load = self.inner.profile_load.get() + 1;
        self.inner.profile_load.set(load);
        load
    }

    fn is_latest_profile_load(&self, load: u64) -> bool {
        self.inner.profile_load.get() == load
    }

    async fn load_profile(&self, user_id: &str) -> Option<Profile> {
        match self.inner.data.fetch_profile(user_id).await {
            Ok(Some(profile)) => Some(profile),
            Ok(None) => {
                tracing::warn!(user_id, "No profile data found for user");
                None
            }
            Err(e) => {
                tracing::error!(user_id, error = %e, "Error fetching profile");
                None
            }
        }
    }

    fn update(&self, change: impl FnOnce(&mut SessionState)) {
        let snapshot = {
            let mut state = self.inner.state.borrow_mut();
            let before = state.clone();
            change(&mut state);
            if *state == before {
                return;
            }
            state.clone()
        };
        self.inner.changes.emit(&snapshot);
    }
}
