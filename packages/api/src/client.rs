//! # Hosted service client
//!
//! [`HostedService`] implements both [`AuthProvider`] and [`DataService`] over HTTP
//! against a hosted backend that exposes an auth API under `/auth/v1` and a row
//! API under `/rest/v1`.
//!
//! ## Requests
//!
//! Every request carries the project's anon key as `apikey` and a bearer token:
//! the access token of the current session, or the anon key when nobody is signed
//! in. Row writes ask for `Prefer: return=representation` so the stored row comes
//! back; counts use `HEAD` with `Prefer: count=exact` and read `Content-Range`.
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | sign in | `POST /auth/v1/token?grant_type=password` |
//! | refresh | `POST /auth/v1/token?grant_type=refresh_token` |
//! | sign up | `POST /auth/v1/signup` |
//! | sign out | `POST /auth/v1/logout` |
//! | delete user | `DELETE /auth/v1/admin/users/{id}` |
//! | rows | `GET/POST/PATCH/HEAD /rest/v1/{table}` |
//!
//! ## Session
//!
//! The current session lives in memory and is mirrored into a [`SessionCache`].
//! `get_session` restores it from the cache, refreshing it first if it has expired.
//! Row requests and counts refresh a session that is about to expire before they are
//! sent; if that refresh fails the session is dropped and `SignedOut` is emitted.
//! Sign in, sign up, refresh and sign out emit an [`AuthEvent`] to every listener
//! after the local session has been updated.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{Duration, Utc};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use store::{
    Appointment, AuthChangeEvent, AuthEvent, AuthProvider, DataService, Error, Injury,
    InjuryStatus, Listeners, NewInjury, NewProfile, Profile, ProfileChanges, Result, Role,
    ServiceConfig, Session, Subscription, User,
};

use crate::cache::SessionCache;
use crate::error::ServiceError;
use crate::query::{parse_content_range, Order, Query};
use crate::wire::{Credentials, RefreshGrant, SignUpResponse, TokenResponse};

const PROFILE_COLUMNS: &str = "id,full_name,email,role,profile_pic_url,sport,specialization,phone,student_number,created_at,updated_at";
const APPOINTMENT_COLUMNS: &str = "*,practitioner:users!appointments_practitioner_id_fkey(full_name)";
/// Sessions expiring within this many seconds are refreshed before a row request.
const EXPIRY_MARGIN_SECS: i64 = 30;

struct Inner {
    http: Client,
    config: ServiceConfig,
    session: RefCell<Option<Session>>,
    cache: Box<dyn SessionCache>,
    listeners: Listeners<AuthEvent>,
}

/// Client for the hosted auth and data service. Clones share one session.
#[derive(Clone)]
pub struct HostedService {
    inner: Rc<Inner>,
}

impl HostedService {
    pub fn new(config: ServiceConfig, cache: impl SessionCache + 'static) -> Self {
        Self {
            inner: Rc::new(Inner {
                http: Client::new(),
                config,
                session: RefCell::new(None),
                cache: Box::new(cache),
                listeners: Listeners::new(),
            }),
        }
    }

    /// Client with the platform's session cache: `localStorage` in the browser,
    /// memory elsewhere.
    pub fn from_config(config: ServiceConfig) -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            let cache = crate::cache::LocalStorageCache::new(config.session.storage_key.clone());
            Self::new(config, cache)
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            Self::new(config, crate::cache::MemoryCache::default())
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.inner.config
    }

    /// Session held in memory right now, without consulting the cache.
    pub fn current_session(&self) -> Option<Session> {
        self.inner.session.borrow().clone()
    }

    /// Exchange the current refresh token for a new session.
    pub async fn refresh_session(&self) -> Result<Session> {
        let refresh_token = self
            .current_session()
            .or_else(|| self.inner.cache.load())
            .map(|s| s.refresh_token)
            .ok_or(Error::NotSignedIn)?;
        self.refresh_with(&refresh_token).await
    }

    async fn refresh_with(&self, refresh_token: &str) -> Result<Session> {
        let request = self
            .request(Method::POST, "/auth/v1/token")
            .query(&[("grant_type", "refresh_token")])
            .json(&RefreshGrant { refresh_token });
        let tokens: TokenResponse = self.auth_call(request).await?;
        let session = tokens.into_session(Utc::now());
        tracing::debug!(user_id = %session.user.id, "Session refreshed");
        self.set_session(Some(session.clone()), AuthChangeEvent::TokenRefreshed);
        Ok(session)
    }

    fn set_session(&self, session: Option<Session>, kind: AuthChangeEvent) {
        match &session {
            Some(s) => self.inner.cache.save(s),
            None => self.inner.cache.clear(),
        }
        *self.inner.session.borrow_mut() = session.clone();
        self.inner.listeners.emit(&AuthEvent { kind, session });
    }

    fn bearer(&self) -> String {
        self.inner
            .session
            .borrow()
            .as_ref()
            .map(|s| s.access_token.clone())
            .unwrap_or_else(|| self.inner.config.service.anon_key.clone())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.inner.config.base_url(), path);
        self.inner
            .http
            .request(method, url)
            .header("apikey", &self.inner.config.service.anon_key)
    }

    /// Refresh the session if it expires within the margin. A failed refresh
    /// signs the user out locally.
    async fn ensure_fresh_session(&self) {
        let Some(session) = self.current_session() else {
            return;
        };
        if !session.is_expired(Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS)) {
            return;
        }
        tracing::debug!(user_id = %session.user.id, "Session about to expire, refreshing");
        if let Err(e) = self.refresh_with(&session.refresh_token).await {
            tracing::warn!(user_id = %session.user.id, error = %e, "Session expired and could not be refreshed");
            self.set_session(None, AuthChangeEvent::SignedOut);
        }
    }

    fn table(&self, method: Method, table: &str, query: &Query) -> RequestBuilder {
        self.request(method, &format!("/rest/v1/{table}"))
            .query(query.pairs())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ServiceError> {
        let response = request.bearer_auth(self.bearer()).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let err = ServiceError::rejected(status.as_u16(), &body);
        tracing::debug!(status = status.as_u16(), error = %err, "Request rejected");
        Err(err)
    }

    async fn auth_call<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await.map_err(ServiceError::into_auth)?;
        response
            .json()
            .await
            .map_err(|e| ServiceError::from(e).into_auth())
    }

    async fn rows<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Vec<T>> {
        self.ensure_fresh_session().await;
        let response = self.send(request).await.map_err(ServiceError::into_data)?;
        response
            .json()
            .await
            .map_err(|e| ServiceError::from(e).into_data())
    }

    async fn select<T: DeserializeOwned>(&self, table: &str, query: &Query) -> Result<Vec<T>> {
        self.rows(self.table(Method::GET, table, query)).await
    }

    async fn write<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        table: &str,
        query: &Query,
        body: &B,
    ) -> Result<T> {
        let request = self
            .table(method, table, query)
            .header("Prefer", "return=representation")
            .json(body);
        self.rows(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::data(format!("No {table} row returned")))
    }

    async fn count(&self, table: &str, query: &Query) -> Result<u64> {
        let request = self
            .table(Method::HEAD, table, query)
            .header("Prefer", "count=exact");
        self.ensure_fresh_session().await;
        let response = self.send(request).await.map_err(ServiceError::into_data)?;
        response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range)
            .ok_or_else(|| Error::data(format!("No row count for {table}")))
    }
}

impl AuthProvider for HostedService {
    async fn get_session(&self) -> Result<Option<Session>> {
        let Some(session) = self.current_session().or_else(|| self.inner.cache.load()) else {
            return Ok(None);
        };
        if !session.is_expired(Utc::now()) {
            *self.inner.session.borrow_mut() = Some(session.clone());
            return Ok(Some(session));
        }

        tracing::debug!(user_id = %session.user.id, "Stored session expired, refreshing");
        match self.refresh_with(&session.refresh_token).await {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!(error = %e, "Could not refresh stored session");
                self.inner.session.borrow_mut().take();
                self.inner.cache.clear();
                Ok(None)
            }
        }
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let request = self
            .request(Method::POST, "/auth/v1/token")
            .query(&[("grant_type", "password")])
            .json(&Credentials { email, password });
        let tokens: TokenResponse = self.auth_call(request).await?;
        let session = tokens.into_session(Utc::now());
        tracing::info!(user_id = %session.user.id, "Signed in");
        self.set_session(Some(session.clone()), AuthChangeEvent::SignedIn);
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<User>> {
        let request = self
            .request(Method::POST, "/auth/v1/signup")
            .json(&Credentials { email, password });
        match self.auth_call(request).await? {
            SignUpResponse::Session(tokens) => {
                let session = tokens.into_session(Utc::now());
                let user = session.user.clone();
                tracing::info!(user_id = %user.id, "Signed up");
                self.set_session(Some(session), AuthChangeEvent::SignedIn);
                Ok(Some(user))
            }
            SignUpResponse::User(user) if user.id.is_empty() => Ok(None),
            SignUpResponse::User(user) => {
                tracing::info!(user_id = %user.id, "Signed up, awaiting confirmation");
                Ok(Some(user.into()))
            }
        }
    }

    async fn sign_out(&self) -> Result<()> {
        let result = match self.current_session() {
            Some(_) => self
                .send(self.request(Method::POST, "/auth/v1/logout"))
                .await
                .map(drop)
                .map_err(ServiceError::into_auth),
            None => Ok(()),
        };
        self.set_session(None, AuthChangeEvent::SignedOut);
        result
    }

    async fn delete_user(&self, user_id: &str) -> Result<()> {
        let request = self.request(Method::DELETE, &format!("/auth/v1/admin/users/{user_id}"));
        self.send(request).await.map_err(ServiceError::into_auth)?;
        Ok(())
    }

    fn on_auth_state_change(&self, listener: impl Fn(&AuthEvent) + 'static) -> Subscription {
        self.inner.listeners.add(listener)
    }
}

impl DataService for HostedService {
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        let query = Query::new()
            .select(PROFILE_COLUMNS)
            .eq("id", user_id)
            .limit(1);
        Ok(self.select("users", &query).await?.into_iter().next())
    }

    async fn insert_profile(&self, profile: &NewProfile) -> Result<Profile> {
        self.write(Method::POST, "users", &Query::new(), profile).await
    }

    async fn update_profile(&self, user_id: &str, changes: &ProfileChanges) -> Result<Profile> {
        let query = Query::new().eq("id", user_id);
        self.write(Method::PATCH, "users", &query, changes).await
    }

    async fn insert_injury(&self, injury: &NewInjury) -> Result<Injury> {
        self.write(Method::POST, "injuries", &Query::new(), injury).await
    }

    async fn fetch_injury(&self, injury_id: &str) -> Result<Option<Injury>> {
        let query = Query::new().select("*").eq("id", injury_id).limit(1);
        Ok(self.select("injuries", &query).await?.into_iter().next())
    }

    async fn recent_injuries(&self, student_id: &str, limit: usize) -> Result<Vec<Injury>> {
        let query = Query::new()
            .select("*")
            .eq("student_id", student_id)
            .order("created_at", Order::Desc)
            .limit(limit);
        self.select("injuries", &query).await
    }

    async fn injuries_with_status(
        &self,
        status: InjuryStatus,
        limit: usize,
    ) -> Result<Vec<Injury>> {
        let query = Query::new()
            .select("*")
            .eq("status", status.as_str())
            .order("date_reported", Order::Asc)
            .limit(limit);
        self.select("injuries", &query).await
    }

    async fn upcoming_appointments(
        &self,
        student_id: &str,
        limit: usize,
    ) -> Result<Vec<Appointment>> {
        let now = Utc::now().to_rfc3339();
        let query = Query::new()
            .select(APPOINTMENT_COLUMNS)
            .eq("student_id", student_id)
            .gte("appointment_date", &now)
            .order("appointment_date", Order::Asc)
            .limit(limit);
        self.select("appointments", &query).await
    }

    async fn count_profiles(&self, role: Role) -> Result<u64> {
        self.count("users", &Query::new().select("id").eq("role", role.as_str()))
            .await
    }

    async fn count_injuries_with_status(&self, status: InjuryStatus) -> Result<u64> {
        let query = Query::new().select("id").eq("status", status.as_str());
        self.count("injuries", &query).await
    }

    async fn count_open_injuries(&self) -> Result<u64> {
        let query = Query::new()
            .select("id")
            .neq("status", InjuryStatus::Resolved.as_str());
        self.count("injuries", &query).await
    }
}

impl PartialEq for HostedService {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;

    fn config() -> ServiceConfig {
        ServiceConfig::new("https://demo.example.co", "anon")
    }

    fn session(expires_in: Duration) -> Session {
        Session {
            access_token: "at".into(),
            refresh_token: "rt".into(),
            expires_at: Utc::now() + expires_in,
            user: User {
                id: "user-1".into(),
                email: "sam@uni.example".into(),
            },
        }
    }

    fn recorded(service: &HostedService) -> (Rc<RefCell<Vec<AuthEvent>>>, Subscription) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sub = {
            let events = events.clone();
            service.on_auth_state_change(move |e| events.borrow_mut().push(e.clone()))
        };
        (events, sub)
    }

    #[tokio::test]
    async fn test_get_session_empty() {
        let service = HostedService::new(config(), MemoryCache::default());
        assert_eq!(service.get_session().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_session_restores_from_cache() {
        let cache = MemoryCache::default();
        let stored = session(Duration::hours(1));
        cache.save(&stored);
        let service = HostedService::new(config(), cache);

        assert_eq!(service.current_session(), None);
        assert_eq!(service.get_session().await.unwrap(), Some(stored.clone()));
        assert_eq!(service.current_session(), Some(stored));
        assert_eq!(service.bearer(), "at");
    }

    #[tokio::test]
    async fn test_sign_out_without_session_clears_and_emits() {
        let service = HostedService::new(config(), MemoryCache::default());
        let (events, _sub) = recorded(&service);

        service.sign_out().await.unwrap();
        assert_eq!(*events.borrow(), vec![AuthEvent::signed_out()]);
        assert_eq!(service.bearer(), "anon");
    }

    #[tokio::test]
    async fn test_refresh_without_session_is_not_signed_in() {
        let service = HostedService::new(config(), MemoryCache::default());
        assert_eq!(service.refresh_session().await, Err(Error::NotSignedIn));
    }

    #[test]
    fn test_set_session_mirrors_into_cache() {
        let service = HostedService::new(config(), MemoryCache::default());
        let (events, _sub) = recorded(&service);
        let s = session(Duration::hours(1));

        service.set_session(Some(s.clone()), AuthChangeEvent::SignedIn);
        assert_eq!(service.inner.cache.load(), Some(s.clone()));
        assert_eq!(events.borrow()[0], AuthEvent::signed_in(s));

        service.set_session(None, AuthChangeEvent::SignedOut);
        assert_eq!(service.inner.cache.load(), None);
        assert_eq!(events.borrow().len(), 2);
    }

    /// A service whose host refuses connections, so every call fails fast.
    fn unreachable() -> HostedService {
        HostedService::new(
            ServiceConfig::new("http://127.0.0.1:9", "anon"),
            MemoryCache::default(),
        )
    }

    #[tokio::test]
    async fn test_expired_session_is_dropped_when_refresh_fails() {
        let service = unreachable();
        service.set_session(Some(session(Duration::seconds(-5))), AuthChangeEvent::SignedIn);
        let (events, _sub) = recorded(&service);

        let result = service.count_injuries_with_status(InjuryStatus::Reported).await;
        assert!(result.is_err());
        assert_eq!(*events.borrow(), vec![AuthEvent::signed_out()]);
        assert_eq!(service.current_session(), None);
        assert_eq!(service.inner.cache.load(), None);
        assert_eq!(service.bearer(), "anon");
    }

    #[tokio::test]
    async fn test_session_near_expiry_is_refreshed_before_rows() {
        let service = unreachable();
        service.set_session(Some(session(Duration::seconds(10))), AuthChangeEvent::SignedIn);
        let (events, _sub) = recorded(&service);

        assert!(service.fetch_injury("injury-1").await.is_err());
        assert_eq!(*events.borrow(), vec![AuthEvent::signed_out()]);
    }

    #[tokio::test]
    async fn test_valid_session_is_kept_when_request_fails() {
        let service = unreachable();
        let s = session(Duration::hours(1));
        service.set_session(Some(s.clone()), AuthChangeEvent::SignedIn);
        let (events, _sub) = recorded(&service);

        assert!(service.recent_injuries("user-1", 5).await.is_err());
        assert!(events.borrow().is_empty());
        assert_eq!(service.current_session(), Some(s));
    }

    #[test]
    fn test_clones_share_session() {
        let service = HostedService::new(config(), MemoryCache::default());
        let other = service.clone();
        service.set_session(Some(session(Duration::hours(1))), AuthChangeEvent::SignedIn);
        assert!(other.current_session().is_some());
        assert!(service == other);
    }
}
