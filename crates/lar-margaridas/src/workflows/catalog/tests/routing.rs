use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::store::{tables, StoreError};
use crate::workflows::catalog::catalog_router;

async fn read_json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("valid json")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request builds")
}

fn enroll(course_id: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(format!("/api/v1/courses/{course_id}/enrollments"));
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request builds")
}

#[tokio::test]
async fn highlights_route_returns_three_lists() {
    let router = catalog_router(routes(Arc::new(seeded_store())));

    let response = router
        .oneshot(get("/api/v1/highlights"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["projects"].as_array().map(Vec::len), Some(3));
    assert_eq!(payload["courses"][0]["status"], json!("open"));
    assert_eq!(payload["announcements"][0]["title"], json!("Feira de doações"));
    assert!(payload.get("unavailable").is_none());
}

#[tokio::test]
async fn highlights_route_reports_unavailable_sections_with_ok() {
    let router = catalog_router(routes(Arc::new(FailingTable {
        inner: seeded_store(),
        table: tables::COURSES,
    })));

    let response = router
        .oneshot(get("/api/v1/highlights"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["courses"], json!([]));
    assert_eq!(payload["unavailable"], json!(["courses"]));
    assert_eq!(payload["projects"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn courses_route_maps_store_failures_to_bad_gateway() {
    let router = catalog_router(routes(Arc::new(BrokenStore(StoreError::new(
        "service unavailable",
    )))));

    let response = router
        .oneshot(get("/api/v1/courses"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("service unavailable"));
}

#[tokio::test]
async fn enrollment_route_covers_created_conflict_and_unauthorized() {
    let router = catalog_router(routes(Arc::new(seeded_store())));

    let created = router
        .clone()
        .oneshot(enroll("c-1", Some("user-1")))
        .await
        .expect("route executes");
    assert_eq!(created.status(), StatusCode::CREATED);
    let payload = read_json_body(created).await;
    assert_eq!(payload["outcome"], json!("enrolled"));
    assert_eq!(payload["course_id"], json!("c-1"));

    let conflict = router
        .clone()
        .oneshot(enroll("c-1", Some("user-1")))
        .await
        .expect("route executes");
    assert_eq!(conflict.status(), StatusCode::CONFLICT);

    let anonymous = router
        .oneshot(enroll("c-1", None))
        .await
        .expect("route executes");
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
    let payload = read_json_body(anonymous).await;
    assert_eq!(payload["notice"]["title"], json!("Login necessário"));
}
