use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::UserId;

/// Areas a volunteer can apply for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Specialty {
    Informatics,
    Legal,
    Psychology,
    Nursing,
    Other,
}

impl Specialty {
    pub const ALL: [Specialty; 5] = [
        Specialty::Informatics,
        Specialty::Legal,
        Specialty::Psychology,
        Specialty::Nursing,
        Specialty::Other,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            Specialty::Informatics => "informatics",
            Specialty::Legal => "legal",
            Specialty::Psychology => "psychology",
            Specialty::Nursing => "nursing",
            Specialty::Other => "other",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Specialty::Informatics => "Informática",
            Specialty::Legal => "Advocacia",
            Specialty::Psychology => "Psicologia",
            Specialty::Nursing => "Enfermagem",
            Specialty::Other => "Outros",
        }
    }

    /// Exact, case-sensitive match on [`code`](Self::code).
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|specialty| specialty.code() == code)
    }
}

/// Unpersisted form contents as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolunteerApplicationDraft {
    #[serde(default)]
    pub specialty: String,
    #[serde(default)]
    pub availability: String,
    #[serde(default)]
    pub experience: String,
}

impl VolunteerApplicationDraft {
    pub fn new(
        specialty: impl Into<String>,
        availability: impl Into<String>,
        experience: impl Into<String>,
    ) -> Self {
        Self {
            specialty: specialty.into(),
            availability: availability.into(),
            experience: experience.into(),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Row of the `volunteers` table. Timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolunteerRecord {
    pub user_id: UserId,
    pub specialty: Specialty,
    pub availability: String,
    pub experience: String,
    #[serde(default)]
    pub approved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Result of one call to the intake workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Success,
    ValidationFailed(Vec<super::validation::FieldError>),
    AuthRequired,
    RemoteError(String),
}

impl SubmissionOutcome {
    pub const fn label(&self) -> &'static str {
        match self {
            SubmissionOutcome::Success => "success",
            SubmissionOutcome::ValidationFailed(_) => "validation_failed",
            SubmissionOutcome::AuthRequired => "auth_required",
            SubmissionOutcome::RemoteError(_) => "remote_error",
        }
    }
}
