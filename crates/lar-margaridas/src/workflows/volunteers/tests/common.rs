use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::to_bytes;
use axum::response::Response;
use serde_json::Value;

use crate::session::{AccessToken, IdentityError, IdentityProvider, Session, SessionSnapshot};
use crate::store::{ListQuery, RecordStore, StoreError};
use crate::workflows::volunteers::{
    VolunteerApplicationDraft, VolunteerApplicationWorkflow, VolunteerRoutes,
};

pub(super) const VALID_AVAILABILITY: &str = "weekday evenings only";
pub(super) const VALID_EXPERIENCE: &str =
    "I have five years of volunteer teaching experience in adult literacy";

pub(super) fn valid_draft() -> VolunteerApplicationDraft {
    VolunteerApplicationDraft::new("informatics", VALID_AVAILABILITY, VALID_EXPERIENCE)
}

pub(super) fn authenticated(user_id: &str) -> SessionSnapshot {
    SessionSnapshot::Authenticated(Session::new(user_id))
}

/// Store fake recording every insert and answering with a fixed result.
#[derive(Default)]
pub(super) struct RecordingStore {
    inserts: Mutex<Vec<(String, Value)>>,
    tokens: Mutex<Vec<Option<String>>>,
    failure: Option<StoreError>,
}

impl RecordingStore {
    pub(super) fn failing(error: StoreError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub(super) fn inserts(&self) -> Vec<(String, Value)> {
        self.inserts.lock().expect("store mutex poisoned").clone()
    }

    /// Access token forwarded with each insert, in call order.
    pub(super) fn tokens(&self) -> Vec<Option<String>> {
        self.tokens.lock().expect("store mutex poisoned").clone()
    }
}

#[async_trait]
impl RecordStore for RecordingStore {
    async fn list(&self, _query: &ListQuery) -> Result<Vec<Value>, StoreError> {
        Ok(Vec::new())
    }

    async fn insert(
        &self,
        table: &str,
        record: Value,
        access_token: Option<&AccessToken>,
    ) -> Result<Value, StoreError> {
        self.tokens
            .lock()
            .expect("store mutex poisoned")
            .push(access_token.map(|token| token.as_str().to_string()));
        self.inserts
            .lock()
            .expect("store mutex poisoned")
            .push((table.to_string(), record.clone()));
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(record),
        }
    }
}

/// Identity fake mapping known tokens to user ids.
#[derive(Default)]
pub(super) struct TokenTable {
    tokens: HashMap<String, String>,
}

impl TokenTable {
    pub(super) fn with(mut self, token: &str, user_id: &str) -> Self {
        self.tokens.insert(token.to_string(), user_id.to_string());
        self
    }
}

#[async_trait]
impl IdentityProvider for TokenTable {
    async fn session_for_token(
        &self,
        access_token: &str,
    ) -> Result<Option<Session>, IdentityError> {
        Ok(self.tokens.get(access_token).map(Session::new))
    }
}

pub(super) fn workflow(store: Arc<RecordingStore>) -> VolunteerApplicationWorkflow<RecordingStore> {
    VolunteerApplicationWorkflow::new(store)
}

pub(super) fn routes(
    store: Arc<RecordingStore>,
) -> Arc<VolunteerRoutes<RecordingStore, TokenTable>> {
    Arc::new(VolunteerRoutes {
        workflow: workflow(store),
        identity: Arc::new(TokenTable::default().with("token-ana", "user-ana")),
    })
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("valid json")
}
