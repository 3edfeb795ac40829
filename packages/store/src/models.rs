//! # Domain models for identities, profiles and injuries
//!
//! Defines the records exchanged with the hosted auth and data services. All types are
//! `Serialize + Deserialize` so the HTTP client can send and parse them as-is, and
//! `Clone + PartialEq` so they can live in UI signals.
//!
//! ## Types
//!
//! | Type | Represents |
//! |------|-----------|
//! | [`User`] | Minimal identity owned by the auth provider (`id`, `email`). |
//! | [`Session`] | Provider proof of an active login: access + refresh token, expiry, and the [`User`] it belongs to. |
//! | [`Profile`] | Row of the `users` table, keyed by the identity id. Carries the [`Role`] that drives routing. |
//! | [`Registration`] | What the register form collects besides email and password. Turned into a [`NewProfile`] once the identity exists. |
//! | [`NewProfile`] / [`ProfileChanges`] | Insert and partial-update payloads for the `users` table. |
//! | [`Injury`] / [`NewInjury`] | Row and insert payload of the `injuries` table. |
//! | [`Appointment`] | The subset of an `appointments` row the student dashboard shows. |

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Identity record owned by the auth provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: String,
}

/// An active login as reported by the auth provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Absolute expiry, sent by the provider as unix seconds.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Application role stored on the profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Practitioner,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Student, Role::Practitioner, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Practitioner => "practitioner",
            Role::Admin => "admin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Practitioner => "Practitioner",
            Role::Admin => "Administrator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "practitioner" => Ok(Role::Practitioner),
            "admin" => Ok(Role::Admin),
            other => Err(Error::Invalid(format!("Unknown role: {other}"))),
        }
    }
}

/// Application-level user record from the `users` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub profile_pic_url: Option<String>,
    #[serde(default)]
    pub sport: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub student_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile fields collected by the registration form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registration {
    pub full_name: String,
    pub role: Role,
    pub sport: Option<String>,
    pub specialization: Option<String>,
    pub student_number: Option<String>,
    pub phone: Option<String>,
}

impl Registration {
    pub fn new(full_name: impl Into<String>, role: Role) -> Self {
        Self {
            full_name: full_name.into(),
            role,
            sport: None,
            specialization: None,
            student_number: None,
            phone: None,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.full_name.trim().is_empty() {
            return Err(Error::Invalid("Full name is required".to_string()));
        }
        Ok(())
    }

    /// Build the profile row for a freshly created identity.
    ///
    /// Blank optional fields become `None` so they are stored as null.
    pub fn into_new_profile(self, user_id: &str, email: &str) -> NewProfile {
        NewProfile {
            id: user_id.to_string(),
            email: email.to_string(),
            full_name: self.full_name.trim().to_string(),
            role: self.role,
            sport: non_blank(self.sport),
            specialization: non_blank(self.specialization),
            student_number: non_blank(self.student_number),
            phone: non_blank(self.phone),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Insert payload for the `users` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProfile {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub sport: Option<String>,
    pub specialization: Option<String>,
    pub student_number: Option<String>,
    pub phone: Option<String>,
}

/// Partial update for the `users` table. Only fields that are `Some` are sent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_number: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self == &ProfileChanges::default()
    }

    pub fn apply_to(&self, profile: &mut Profile) {
        if let Some(name) = &self.full_name {
            profile.full_name = name.clone();
        }
        if let Some(sport) = &self.sport {
            profile.sport = Some(sport.clone());
        }
        if let Some(specialization) = &self.specialization {
            profile.specialization = Some(specialization.clone());
        }
        if let Some(phone) = &self.phone {
            profile.phone = Some(phone.clone());
        }
        if let Some(number) = &self.student_number {
            profile.student_number = Some(number.clone());
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Mild, Severity::Moderate, Severity::Severe];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mild" => Ok(Severity::Mild),
            "moderate" => Ok(Severity::Moderate),
            "severe" => Ok(Severity::Severe),
            other => Err(Error::Invalid(format!("Unknown severity: {other}"))),
        }
    }
}

/// Treatment lifecycle of a reported injury.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjuryStatus {
    Reported,
    Assigned,
    InTreatment,
    Recovering,
    Resolved,
}

impl InjuryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InjuryStatus::Reported => "reported",
            InjuryStatus::Assigned => "assigned",
            InjuryStatus::InTreatment => "in_treatment",
            InjuryStatus::Recovering => "recovering",
            InjuryStatus::Resolved => "resolved",
        }
    }

    /// Human readable form, e.g. `in treatment`.
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, InjuryStatus::Resolved)
    }
}

/// Row of the `injuries` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Injury {
    pub id: String,
    pub student_id: String,
    pub injury_type: String,
    pub body_part: String,
    pub severity: Severity,
    pub description: String,
    pub date_reported: DateTime<Utc>,
    pub date_occurred: NaiveDate,
    pub status: InjuryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for the `injuries` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInjury {
    pub student_id: String,
    pub injury_type: String,
    pub body_part: String,
    pub severity: Severity,
    pub description: String,
    pub date_occurred: NaiveDate,
    pub status: InjuryStatus,
}

/// Upcoming appointment as shown on the student dashboard.
///
/// Only the columns the dashboard reads are modelled; the rest of the
/// `appointments` row is ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub appointment_date: DateTime<Utc>,
    pub status: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub practitioner: Option<PractitionerName>,
}

/// Embedded practitioner name joined onto an [`Appointment`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PractitionerName {
    pub full_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_blank_fields_become_none() {
        let mut registration = Registration::new("  Thandi Nkosi ", Role::Student);
        registration.sport = Some("Rugby".to_string());
        registration.phone = Some("   ".to_string());
        registration.student_number = Some(String::new());

        assert!(registration.validate().is_ok());
        let profile = registration.into_new_profile("u-1", "student@example.com");
        assert_eq!(profile.id, "u-1");
        assert_eq!(profile.email, "student@example.com");
        assert_eq!(profile.full_name, "Thandi Nkosi");
        assert_eq!(profile.sport.as_deref(), Some("Rugby"));
        assert!(profile.phone.is_none());
        assert!(profile.student_number.is_none());
    }

    #[test]
    fn test_registration_requires_name() {
        assert!(Registration::new("  ", Role::Admin).validate().is_err());
    }

    #[test]
    fn test_role_parse_and_display() {
        assert_eq!("practitioner".parse::<Role>().unwrap(), Role::Practitioner);
        assert_eq!(Role::Admin.to_string(), "admin");
        assert!("coach".parse::<Role>().is_err());
    }

    #[test]
    fn test_status_label() {
        assert_eq!(InjuryStatus::InTreatment.label(), "in treatment");
        assert!(InjuryStatus::Recovering.is_open());
        assert!(!InjuryStatus::Resolved.is_open());
    }

    #[test]
    fn test_profile_changes_only_serializes_set_fields() {
        let changes = ProfileChanges {
            phone: Some("0831234567".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&changes).unwrap();
        assert_eq!(json, serde_json::json!({ "phone": "0831234567" }));
        assert!(ProfileChanges::default().is_empty());
    }

    #[test]
    fn test_session_expiry() {
        let now = Utc::now();
        let session = Session {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_at: now,
            user: User {
                id: "u".to_string(),
                email: String::new(),
            },
        };
        assert!(session.is_expired(now));
        assert!(!session.is_expired(now - chrono::Duration::seconds(5)));
    }
}
