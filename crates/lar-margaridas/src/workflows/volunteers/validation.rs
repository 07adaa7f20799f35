use serde::Serialize;

use super::domain::{Specialty, VolunteerApplicationDraft};

pub const MIN_AVAILABILITY_CHARS: usize = 10;
pub const MIN_EXPERIENCE_CHARS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    Specialty,
    Availability,
    Experience,
}

impl DraftField {
    pub const fn name(self) -> &'static str {
        match self {
            DraftField::Specialty => "specialty",
            DraftField::Availability => "availability",
            DraftField::Experience => "experience",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldErrorKind {
    Required,
    TooShort { minimum: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: DraftField,
    #[serde(flatten)]
    pub kind: FieldErrorKind,
}

impl FieldError {
    /// Wording shown next to the field on the signup page.
    pub const fn message(&self) -> &'static str {
        match self.field {
            DraftField::Specialty => "Selecione uma área de atuação",
            DraftField::Availability => "Descreva sua disponibilidade com mais detalhes",
            DraftField::Experience => "Conte-nos mais sobre sua experiência",
        }
    }
}

/// Draft that passed every rule. Free text is kept as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidDraft {
    pub(crate) specialty: Specialty,
    pub(crate) availability: String,
    pub(crate) experience: String,
}

/// Check every rule independently; errors come back in field order.
pub fn validate(draft: &VolunteerApplicationDraft) -> Vec<FieldError> {
    check(draft).err().unwrap_or_default()
}

pub(crate) fn check(draft: &VolunteerApplicationDraft) -> Result<ValidDraft, Vec<FieldError>> {
    let mut errors = Vec::new();

    let specialty = Specialty::from_code(&draft.specialty);
    if specialty.is_none() {
        errors.push(FieldError {
            field: DraftField::Specialty,
            kind: FieldErrorKind::Required,
        });
    }

    let availability = draft.availability.trim();
    if availability.chars().count() < MIN_AVAILABILITY_CHARS {
        errors.push(FieldError {
            field: DraftField::Availability,
            kind: FieldErrorKind::TooShort {
                minimum: MIN_AVAILABILITY_CHARS,
            },
        });
    }

    let experience = draft.experience.trim();
    if experience.chars().count() < MIN_EXPERIENCE_CHARS {
        errors.push(FieldError {
            field: DraftField::Experience,
            kind: FieldErrorKind::TooShort {
                minimum: MIN_EXPERIENCE_CHARS,
            },
        });
    }

    match specialty {
        Some(specialty) if errors.is_empty() => Ok(ValidDraft {
            specialty,
            availability: draft.availability.clone(),
            experience: draft.experience.clone(),
        }),
        _ => Err(errors),
    }
}
