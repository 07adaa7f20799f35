use async_trait::async_trait;
use chrono::{Duration, SecondsFormat, Utc};
use lar_margaridas::session::{IdentityError, IdentityProvider, Session};
use lar_margaridas::store::{tables, MemoryRecordStore};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{json, Value};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

const DEV_TOKEN_PREFIX: &str = "dev:";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Accepts bearer tokens of the form `dev:<user_id>` so the API can be
/// exercised locally without a hosted auth service.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct DevIdentityProvider;

#[async_trait]
impl IdentityProvider for DevIdentityProvider {
    async fn session_for_token(
        &self,
        access_token: &str,
    ) -> Result<Option<Session>, IdentityError> {
        Ok(access_token
            .strip_prefix(DEV_TOKEN_PREFIX)
            .map(str::trim)
            .filter(|user_id| !user_id.is_empty())
            .map(Session::new))
    }
}

/// In-memory store with the production unique constraints and a small catalog.
pub(crate) fn development_store() -> MemoryRecordStore {
    let store = MemoryRecordStore::default()
        .with_unique(tables::VOLUNTEERS, &["user_id"])
        .with_unique(tables::COURSE_ENROLLMENTS, &["course_id", "user_id"]);

    store.seed(
        tables::PROJECTS,
        vec![
            catalog_row(
                json!({
                    "id": "project-horta",
                    "title": "Horta comunitária",
                    "description": "Cultivo de alimentos com as famílias atendidas",
                    "category": "sustentabilidade",
                    "status": "active",
                }),
                3,
            ),
            catalog_row(
                json!({
                    "id": "project-leitura",
                    "title": "Clube de leitura",
                    "description": "Encontros semanais de leitura para crianças",
                    "category": "educação",
                    "status": "active",
                }),
                2,
            ),
            catalog_row(
                json!({
                    "id": "project-bazar",
                    "title": "Bazar solidário",
                    "description": "Venda de doações para manter a casa",
                    "category": "arrecadação",
                    "status": "completed",
                }),
                1,
            ),
        ],
    );
    store.seed(
        tables::COURSES,
        vec![
            catalog_row(
                json!({
                    "id": "course-informatica",
                    "title": "Informática básica",
                    "description": "Primeiros passos com computador e internet",
                    "duration": "8 semanas",
                    "instructor": "Equipe de voluntários",
                    "schedule": "Sábados, 9h",
                    "max_participants": 20,
                    "current_participants": 8,
                    "status": "open",
                }),
                2,
            ),
            catalog_row(
                json!({
                    "id": "course-costura",
                    "title": "Costura criativa",
                    "description": "Técnicas de costura para geração de renda",
                    "duration": "6 semanas",
                    "max_participants": 12,
                    "current_participants": 12,
                    "status": "full",
                }),
                1,
            ),
        ],
    );
    store.seed(
        tables::ANNOUNCEMENTS,
        vec![catalog_row(
            json!({
                "id": "announcement-campanha",
                "title": "Campanha do agasalho",
                "content": "Recebemos doações de roupas de inverno até o fim do mês",
                "priority": "high",
                "active": true,
            }),
            1,
        )],
    );

    store
}

fn catalog_row(mut row: Value, days_ago: i64) -> Value {
    let stamp = (Utc::now() - Duration::days(days_ago)).to_rfc3339_opts(SecondsFormat::Secs, true);
    if let Some(fields) = row.as_object_mut() {
        fields.insert("created_at".to_string(), Value::String(stamp.clone()));
        fields.insert("updated_at".to_string(), Value::String(stamp));
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use lar_margaridas::store::{ListQuery, RecordStore};

    #[tokio::test]
    async fn dev_identity_accepts_prefixed_tokens_only() {
        let identity = DevIdentityProvider;

        let session = identity
            .session_for_token("dev:maria")
            .await
            .expect("dev identity never fails");
        assert_eq!(session, Some(Session::new("maria")));

        for token in ["maria", "dev:", "dev:   "] {
            let session = identity
                .session_for_token(token)
                .await
                .expect("dev identity never fails");
            assert!(session.is_none(), "token {token:?} should not resolve");
        }
    }

    #[tokio::test]
    async fn development_store_rejects_second_volunteer_application() {
        let store = development_store();
        let record = json!({ "user_id": "maria", "specialty": "legal" });

        store
            .insert(tables::VOLUNTEERS, record.clone(), None)
            .await
            .expect("first application stored");
        let error = store
            .insert(tables::VOLUNTEERS, record, None)
            .await
            .expect_err("duplicate rejected");
        assert!(error.is_unique_violation());
    }

    #[tokio::test]
    async fn development_store_lists_seeded_catalog() {
        let store = development_store();
        let courses = store
            .list(&ListQuery::table(tables::COURSES))
            .await
            .expect("courses listed");
        assert_eq!(courses.len(), 2);
        assert!(courses.iter().all(|row| row.get("created_at").is_some()));
    }
}
