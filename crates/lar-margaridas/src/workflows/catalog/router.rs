use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::{Course, EnrollmentOutcome, Highlights, Project};
use super::enrollment::CourseEnrollmentWorkflow;
use super::service::CatalogService;
use crate::error::AppError;
use crate::session::{snapshot_from_headers, IdentityProvider};
use crate::store::RecordStore;

/// Shared state behind the catalog endpoints.
pub struct CatalogRoutes<S, I> {
    pub catalog: CatalogService<S>,
    pub enrollment: CourseEnrollmentWorkflow<S>,
    pub identity: Arc<I>,
}

pub fn catalog_router<S, I>(routes: Arc<CatalogRoutes<S, I>>) -> Router
where
    S: RecordStore + 'static,
    I: IdentityProvider + 'static,
{
    Router::new()
        .route("/api/v1/projects", get(projects_handler::<S, I>))
        .route("/api/v1/courses", get(courses_handler::<S, I>))
        .route("/api/v1/highlights", get(highlights_handler::<S, I>))
        .route(
            "/api/v1/courses/{course_id}/enrollments",
            post(enroll_handler::<S, I>),
        )
        .with_state(routes)
}

pub(crate) async fn projects_handler<S, I>(
    State(routes): State<Arc<CatalogRoutes<S, I>>>,
) -> Result<Json<Vec<Project>>, AppError>
where
    S: RecordStore + 'static,
    I: IdentityProvider + 'static,
{
    Ok(Json(routes.catalog.projects().await?))
}

pub(crate) async fn courses_handler<S, I>(
    State(routes): State<Arc<CatalogRoutes<S, I>>>,
) -> Result<Json<Vec<Course>>, AppError>
where
    S: RecordStore + 'static,
    I: IdentityProvider + 'static,
{
    Ok(Json(routes.catalog.courses().await?))
}

pub(crate) async fn highlights_handler<S, I>(
    State(routes): State<Arc<CatalogRoutes<S, I>>>,
) -> Json<Highlights>
where
    S: RecordStore + 'static,
    I: IdentityProvider + 'static,
{
    Json(routes.catalog.highlights().await)
}

pub(crate) async fn enroll_handler<S, I>(
    State(routes): State<Arc<CatalogRoutes<S, I>>>,
    Path(course_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    S: RecordStore + 'static,
    I: IdentityProvider + 'static,
{
    let session = snapshot_from_headers(routes.identity.as_ref(), &headers).await;
    let outcome = routes.enrollment.enroll(&course_id, &session).await;

    let status = match &outcome {
        EnrollmentOutcome::Enrolled => StatusCode::CREATED,
        EnrollmentOutcome::AuthRequired => StatusCode::UNAUTHORIZED,
        EnrollmentOutcome::AlreadyEnrolled => StatusCode::CONFLICT,
        EnrollmentOutcome::RemoteError(_) => StatusCode::BAD_GATEWAY,
    };

    let payload = json!({
        "course_id": course_id,
        "outcome": outcome.label(),
        "notice": outcome.notice(),
    });
    (status, Json(payload)).into_response()
}
