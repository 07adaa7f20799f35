//! Volunteer signup: draft validation, login-gated submission and the page-side form model.

pub mod domain;
pub mod form;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{Specialty, SubmissionOutcome, VolunteerApplicationDraft, VolunteerRecord};
pub use form::{FormView, VolunteerForm};
pub use router::{volunteer_router, VolunteerRoutes};
pub use service::VolunteerApplicationWorkflow;
pub use validation::{
    validate, DraftField, FieldError, FieldErrorKind, MIN_AVAILABILITY_CHARS,
    MIN_EXPERIENCE_CHARS,
};
