//! Error type shared by the session store and the backend traits.
//!
//! Every variant carries only owned strings so the error is `Clone + PartialEq`.
//! Views keep the last error in a signal and tests compare results directly.

use thiserror::Error;

/// Errors surfaced by [`crate::AuthProvider`], [`crate::DataService`] and
/// [`crate::SessionStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The auth provider rejected the request (bad credentials, duplicate
    /// registration, expired refresh token...).
    #[error("{0}")]
    Auth(String),

    /// The data service rejected a read or write.
    #[error("{message}")]
    Data {
        message: String,
        code: Option<String>,
    },

    /// Sign up succeeded at the provider but no identity came back.
    #[error("No user returned from sign up")]
    MissingIdentity,

    /// The operation needs a signed-in user.
    #[error("You must be signed in to do that")]
    NotSignedIn,

    /// Client-side validation failed before anything was sent.
    #[error("{0}")]
    Invalid(String),

    /// The request never produced a usable response.
    #[error("Network error: {0}")]
    Transport(String),
}

impl Error {
    /// Build a [`Error::Data`] without a service error code.
    pub fn data(message: impl Into<String>) -> Self {
        Error::Data {
            message: message.into(),
            code: None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
