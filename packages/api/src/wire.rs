//! Response bodies of the auth endpoints.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use store::{Session, User};

#[derive(Debug, Serialize)]
pub(crate) struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RefreshGrant<'a> {
    pub refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireUser {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl From<WireUser> for User {
    fn from(user: WireUser) -> Self {
        User {
            id: user.id,
            email: user.email.unwrap_or_default(),
        }
    }
}

/// Body of a successful token grant.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: i64,
    /// Unix seconds. Older deployments only send `expires_in`.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: WireUser,
}

impl TokenResponse {
    pub fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .unwrap_or_else(|| now + Duration::seconds(self.expires_in));
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user.into(),
        }
    }
}

/// Sign up answers with a full session when no email confirmation is required,
/// and with the bare user otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SignUpResponse {
    Session(TokenResponse),
    User(WireUser),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_uses_expires_at() {
        let body = r#"{
            "access_token": "at",
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": 1735689600,
            "refresh_token": "rt",
            "user": {"id": "u-1", "email": "sam@uni.example", "role": "authenticated"}
        }"#;
        let tokens: TokenResponse = serde_json::from_str(body).unwrap();
        let session = tokens.into_session(Utc::now());
        assert_eq!(session.expires_at.timestamp(), 1735689600);
        assert_eq!(session.user.id, "u-1");
        assert_eq!(session.refresh_token, "rt");
    }

    #[test]
    fn test_token_response_falls_back_to_expires_in() {
        let body = r#"{"access_token":"at","refresh_token":"rt","expires_in":60,"user":{"id":"u-1"}}"#;
        let now = Utc::now();
        let session = serde_json::from_str::<TokenResponse>(body)
            .unwrap()
            .into_session(now);
        assert_eq!(session.expires_at, now + Duration::seconds(60));
        assert_eq!(session.user.email, "");
    }

    #[test]
    fn test_sign_up_shapes() {
        let with_session = r#"{"access_token":"at","refresh_token":"rt","expires_in":60,"user":{"id":"u-1"}}"#;
        assert!(matches!(
            serde_json::from_str::<SignUpResponse>(with_session).unwrap(),
            SignUpResponse::Session(_)
        ));

        let user_only = r#"{"id":"u-2","email":"new@uni.example","confirmation_sent_at":"2025-01-01T00:00:00Z"}"#;
        match serde_json::from_str::<SignUpResponse>(user_only).unwrap() {
            SignUpResponse::User(user) => assert_eq!(user.id, "u-2"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
