use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::session::{AccessToken, IdentityError, IdentityProvider, Session, SessionSnapshot};
use crate::store::{tables, ListQuery, MemoryRecordStore, RecordStore, StoreError};
use crate::workflows::catalog::{CatalogRoutes, CatalogService, CourseEnrollmentWorkflow};

pub(super) fn authenticated(user_id: &str) -> SessionSnapshot {
    SessionSnapshot::Authenticated(Session::new(user_id))
}

pub(super) fn seeded_store() -> MemoryRecordStore {
    let store = MemoryRecordStore::default()
        .with_unique(tables::COURSE_ENROLLMENTS, &["course_id", "user_id"]);

    store.seed(
        tables::PROJECTS,
        vec![
            project("p-1", "Horta comunitária", "active", "2025-02-01T10:00:00Z"),
            project("p-2", "Bazar beneficente", "completed", "2025-03-01T10:00:00Z"),
            project("p-3", "Reforma da sede", "planned", "2025-04-01T10:00:00Z"),
            project("p-4", "Coral", "active", "2025-05-01T10:00:00Z"),
            project("p-5", "Biblioteca", "active", "2025-06-01T10:00:00Z"),
            project("p-6", "Mutirão", "active", "2025-07-01T10:00:00Z"),
        ],
    );
    store.seed(
        tables::COURSES,
        vec![
            course("c-1", "Informática básica", "open", "2025-01-10T09:00:00Z"),
            course("c-2", "Costura", "full", "2025-02-10T09:00:00Z"),
            course("c-3", "Culinária", "closed", "2025-03-10T09:00:00Z"),
        ],
    );
    store.seed(
        tables::ANNOUNCEMENTS,
        vec![
            announcement("a-1", "Feira de doações", true, "2025-05-05T08:00:00Z"),
            announcement("a-2", "Recesso", false, "2025-06-05T08:00:00Z"),
        ],
    );
    store
}

fn project(id: &str, title: &str, status: &str, created_at: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": "Projeto da comunidade",
        "category": "social",
        "image_url": null,
        "status": status,
        "created_at": created_at,
        "updated_at": created_at,
    })
}

fn course(id: &str, title: &str, status: &str, created_at: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": "Curso gratuito",
        "duration": "8 semanas",
        "instructor": "Equipe",
        "schedule": "Sábados 9h",
        "max_participants": 20,
        "current_participants": 12,
        "status": status,
        "created_at": created_at,
    })
}

fn announcement(id: &str, title: &str, active: bool, created_at: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "content": "Detalhes no site",
        "priority": "normal",
        "active": active,
        "created_at": created_at,
    })
}

/// Store that fails every call with the given error.
pub(super) struct BrokenStore(pub(super) StoreError);

#[async_trait]
impl RecordStore for BrokenStore {
    async fn list(&self, _query: &ListQuery) -> Result<Vec<Value>, StoreError> {
        Err(self.0.clone())
    }

    async fn insert(
        &self,
        _table: &str,
        _record: Value,
        _access_token: Option<&AccessToken>,
    ) -> Result<Value, StoreError> {
        Err(self.0.clone())
    }
}

/// Seeded store whose listings of one table fail.
pub(super) struct FailingTable {
    pub(super) inner: MemoryRecordStore,
    pub(super) table: &'static str,
}

#[async_trait]
impl RecordStore for FailingTable {
    async fn list(&self, query: &ListQuery) -> Result<Vec<Value>, StoreError> {
        if query.table == self.table {
            return Err(StoreError::new(format!("relation \"{}\" is locked", self.table)));
        }
        self.inner.list(query).await
    }

    async fn insert(
        &self,
        table: &str,
        record: Value,
        access_token: Option<&AccessToken>,
    ) -> Result<Value, StoreError> {
        self.inner.insert(table, record, access_token).await
    }
}

/// Identity fake where every non-empty token names its user.
pub(super) struct TokenIsUser;

#[async_trait]
impl IdentityProvider for TokenIsUser {
    async fn session_for_token(
        &self,
        access_token: &str,
    ) -> Result<Option<Session>, IdentityError> {
        Ok(Some(Session::new(access_token)))
    }
}

pub(super) fn routes<S: RecordStore + 'static>(store: Arc<S>) -> Arc<CatalogRoutes<S, TokenIsUser>> {
    Arc::new(CatalogRoutes {
        catalog: CatalogService::new(store.clone()),
        enrollment: CourseEnrollmentWorkflow::new(store),
        identity: Arc::new(TokenIsUser),
    })
}
