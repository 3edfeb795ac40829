//! # Client configuration — `sportcare.toml`
//!
//! Describes where the hosted auth/data service lives and how the browser keeps the
//! session between reloads (filename: [`ServiceConfig::filename`] = `"sportcare.toml"`).
//!
//! ## Structure
//!
//! ```toml
//! [service]
//! url = "https://project.example.co"   # base URL, no trailing slash needed
//! anon_key = "public-anon-key"
//!
//! [session]
//! storage_key = "sportcare.session"    # localStorage key for the persisted session
//! ```
//!
//! ## Types
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`ServiceConfig`] | Top-level config with TOML (de)serialisation, environment loading on native targets, and override helpers. |
//! | [`ServiceSection`] | Base URL and anonymous API key of the hosted service. |
//! | [`SessionSection`] | Storage key for the persisted session. Defaults to **`sportcare.session`**. |
//!
//! Missing sections fall back to their defaults; an empty `url` means the client is
//! not configured.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Top-level configuration stored in `sportcare.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub service: ServiceSection,
    #[serde(default)]
    pub session: SessionSection,
}

/// Hosted service endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceSection {
    /// Base URL, e.g. `https://project.example.co`.
    #[serde(default)]
    pub url: String,
    /// Public key sent as `apikey` on every request.
    #[serde(default)]
    pub anon_key: String,
}

/// Session persistence settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSection {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_storage_key() -> String {
    "sportcare.session".to_string()
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
        }
    }
}

impl ServiceConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            service: ServiceSection {
                url: url.into(),
                anon_key: anon_key.into(),
            },
            session: SessionSection::default(),
        }
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "sportcare.toml"
    }

    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Replace URL and key with the given values when they are present and non-empty.
    pub fn with_overrides(mut self, url: Option<&str>, anon_key: Option<&str>) -> Self {
        if let Some(url) = url.filter(|u| !u.is_empty()) {
            self.service.url = url.to_string();
        }
        if let Some(key) = anon_key.filter(|k| !k.is_empty()) {
            self.service.anon_key = key.to_string();
        }
        self
    }

    /// Load from `SPORTCARE_URL` / `SPORTCARE_ANON_KEY`, reading `.env` first.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let url = std::env::var("SPORTCARE_URL")
            .map_err(|_| Error::Invalid("SPORTCARE_URL not set".to_string()))?;
        let anon_key = std::env::var("SPORTCARE_ANON_KEY")
            .map_err(|_| Error::Invalid("SPORTCARE_ANON_KEY not set".to_string()))?;
        let mut config = Self::new(url, anon_key);
        if let Ok(key) = std::env::var("SPORTCARE_SESSION_KEY") {
            config.session.storage_key = key;
        }
        config.validate()?;
        Ok(config)
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.service.url.trim_end_matches('/')
    }

    pub fn is_configured(&self) -> bool {
        !self.service.url.trim().is_empty() && !self.service.anon_key.trim().is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        if !self.is_configured() {
            return Err(Error::Invalid(
                "Service URL and anon key must both be set".to_string(),
            ));
        }
        let url = self.base_url();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(Error::Invalid(format!("Service URL must be http(s): {url}")));
        }
        Ok(())
    }
}
