use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;

use super::domain::{Specialty, SubmissionOutcome, VolunteerApplicationDraft};
use super::service::VolunteerApplicationWorkflow;
use super::validation::FieldError;
use crate::session::{snapshot_from_headers, IdentityProvider};
use crate::store::RecordStore;

/// Shared state behind the volunteer endpoints.
pub struct VolunteerRoutes<S, I> {
    pub workflow: VolunteerApplicationWorkflow<S>,
    pub identity: Arc<I>,
}

#[derive(Debug, Serialize)]
struct FieldErrorView {
    #[serde(flatten)]
    error: FieldError,
    message: &'static str,
}

impl From<&FieldError> for FieldErrorView {
    fn from(error: &FieldError) -> Self {
        Self {
            error: *error,
            message: error.message(),
        }
    }
}

fn error_views(errors: &[FieldError]) -> Vec<FieldErrorView> {
    errors.iter().map(FieldErrorView::from).collect()
}

/// Router exposing specialty listing, validation and application intake.
pub fn volunteer_router<S, I>(routes: Arc<VolunteerRoutes<S, I>>) -> Router
where
    S: RecordStore + 'static,
    I: IdentityProvider + 'static,
{
    Router::new()
        .route("/api/v1/volunteers/specialties", get(specialties_handler))
        .route(
            "/api/v1/volunteers/validate",
            post(validate_handler::<S, I>),
        )
        .route(
            "/api/v1/volunteers/applications",
            post(submit_handler::<S, I>),
        )
        .with_state(routes)
}

pub(crate) async fn specialties_handler() -> Json<serde_json::Value> {
    let specialties: Vec<_> = Specialty::ALL
        .into_iter()
        .map(|specialty| json!({ "code": specialty.code(), "label": specialty.label() }))
        .collect();
    Json(json!({ "specialties": specialties }))
}

pub(crate) async fn validate_handler<S, I>(
    State(routes): State<Arc<VolunteerRoutes<S, I>>>,
    Json(draft): Json<VolunteerApplicationDraft>,
) -> Response
where
    S: RecordStore + 'static,
    I: IdentityProvider + 'static,
{
    let errors = routes.workflow.validate(&draft);
    let payload = json!({
        "valid": errors.is_empty(),
        "errors": error_views(&errors),
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn submit_handler<S, I>(
    State(routes): State<Arc<VolunteerRoutes<S, I>>>,
    headers: HeaderMap,
    Json(draft): Json<VolunteerApplicationDraft>,
) -> Response
where
    S: RecordStore + 'static,
    I: IdentityProvider + 'static,
{
    let session = snapshot_from_headers(routes.identity.as_ref(), &headers).await;
    let outcome = routes.workflow.submit(&draft, &session).await;
    let notice = outcome.notice();

    match &outcome {
        SubmissionOutcome::Success => {
            let payload = json!({ "outcome": outcome.label(), "notice": notice });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        SubmissionOutcome::AuthRequired => {
            let payload = json!({ "outcome": outcome.label(), "notice": notice });
            (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
        }
        SubmissionOutcome::ValidationFailed(errors) => {
            let payload = json!({
                "outcome": outcome.label(),
                "notice": notice,
                "errors": error_views(errors),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        SubmissionOutcome::RemoteError(message) => {
            let payload = json!({
                "outcome": outcome.label(),
                "notice": notice,
                "error": message,
            });
            (StatusCode::BAD_GATEWAY, Json(payload)).into_response()
        }
    }
}
