//! Injury report form: choices, validation and conversion to an insert payload.

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::models::{InjuryStatus, NewInjury, Severity};

pub const INJURY_TYPES: &[&str] = &[
    "Sprain",
    "Strain",
    "Fracture",
    "Dislocation",
    "Concussion",
    "Contusion",
    "Laceration",
    "Tendinitis",
    "Ligament Tear",
    "Other",
];

pub const BODY_PARTS: &[&str] = &[
    "Ankle",
    "Knee",
    "Hip",
    "Lower Back",
    "Upper Back",
    "Shoulder",
    "Elbow",
    "Wrist",
    "Hand",
    "Neck",
    "Head",
    "Hamstring",
    "Calf",
    "Quad",
    "Other",
];

/// What a student fills in on the report form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InjuryReport {
    pub injury_type: String,
    pub body_part: String,
    pub severity: Severity,
    pub description: String,
    pub date_occurred: NaiveDate,
}

impl InjuryReport {
    /// Empty form dated `date_occurred`, with moderate severity preselected.
    pub fn new(date_occurred: NaiveDate) -> Self {
        Self {
            injury_type: String::new(),
            body_part: String::new(),
            severity: Severity::Moderate,
            description: String::new(),
            date_occurred,
        }
    }

    /// Reject empty required fields and injuries dated after `today`.
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        if self.injury_type.trim().is_empty() {
            return Err(Error::Invalid("Please select an injury type".to_string()));
        }
        if self.body_part.trim().is_empty() {
            return Err(Error::Invalid("Please select the affected body part".to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(Error::Invalid("Please describe how the injury happened".to_string()));
        }
        if self.date_occurred > today {
            return Err(Error::Invalid(
                "The injury date cannot be in the future".to_string(),
            ));
        }
        Ok(())
    }

    /// Insert payload for `student_id`. Every new report starts as `reported`.
    pub fn into_new_injury(self, student_id: &str) -> NewInjury {
        NewInjury {
            student_id: student_id.to_string(),
            injury_type: self.injury_type,
            body_part: self.body_part,
            severity: self.severity,
            description: self.description,
            date_occurred: self.date_occurred,
            status: InjuryStatus::Reported,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn filled() -> InjuryReport {
        InjuryReport {
            injury_type: "Sprain".to_string(),
            body_part: "Ankle".to_string(),
            severity: Severity::Mild,
            description: "Rolled it during practice".to_string(),
            date_occurred: date("2025-03-10"),
        }
    }

    #[test]
    fn test_new_report_defaults() {
        let report = InjuryReport::new(date("2025-03-10"));
        assert_eq!(report.severity, Severity::Moderate);
        assert!(report.injury_type.is_empty());
    }

    #[test]
    fn test_validate_requires_fields() {
        let today = date("2025-03-11");
        assert!(filled().validate(today).is_ok());

        let mut missing_type = filled();
        missing_type.injury_type = " ".to_string();
        assert!(matches!(missing_type.validate(today), Err(Error::Invalid(_))));

        let mut missing_part = filled();
        missing_part.body_part.clear();
        assert!(missing_part.validate(today).is_err());

        let mut missing_description = filled();
        missing_description.description.clear();
        assert!(missing_description.validate(today).is_err());
    }

    #[test]
    fn test_validate_rejects_future_dates() {
        let report = filled();
        assert!(report.validate(date("2025-03-10")).is_ok());
        assert!(report.validate(date("2025-03-09")).is_err());
    }

    #[test]
    fn test_into_new_injury_sets_reported_status() {
        let injury = filled().into_new_injury("student-1");
        assert_eq!(injury.student_id, "student-1");
        assert_eq!(injury.status, InjuryStatus::Reported);
        assert_eq!(injury.description, "Rolled it during practice");
    }
}
