use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{Direction, ListQuery, RecordStore, StoreError};
use crate::config::SupabaseConfig;
use crate::session::AccessToken;

/// Record store speaking PostgREST, as exposed by Supabase under `/rest/v1`.
///
/// Reads use the anon key. Writes carry the caller's access token so row-level
/// policies see the user; the service role key is only used for writes made
/// without a caller.
#[derive(Clone)]
pub struct PostgrestStore {
    client: Client,
    rest_url: String,
    anon_key: String,
    service_role_key: Option<String>,
}

/// Error body returned by PostgREST.
#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    code: Option<String>,
    message: Option<String>,
}

impl PostgrestStore {
    pub fn new(client: Client, config: &SupabaseConfig) -> Self {
        Self {
            client,
            rest_url: config.rest_url(),
            anon_key: config.anon_key.clone(),
            service_role_key: config.service_role_key.clone(),
        }
    }

    /// `(apikey, bearer)` pair for a write.
    fn write_credentials<'a>(
        &'a self,
        access_token: Option<&'a AccessToken>,
    ) -> (&'a str, &'a str) {
        match (access_token, self.service_role_key.as_deref()) {
            (Some(token), _) => (self.anon_key.as_str(), token.as_str()),
            (None, Some(service_key)) => (service_key, service_key),
            (None, None) => (self.anon_key.as_str(), self.anon_key.as_str()),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }
}

/// Query-string pairs for a list request, e.g. `status=eq.open&order=created_at.desc`.
pub(crate) fn query_params(query: &ListQuery) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];

    for filter in &query.filters {
        params.push((filter.column.clone(), format!("eq.{}", literal(&filter.value))));
    }

    if let Some(order) = &query.order {
        let direction = match order.direction {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        };
        params.push(("order".to_string(), format!("{}.{}", order.column, direction)));
    }

    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }

    params
}

fn literal(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

async fn error_from_response(response: Response) -> StoreError {
    let status = response.status();
    match response.json::<PostgrestErrorBody>().await {
        Ok(PostgrestErrorBody {
            code,
            message: Some(message),
        }) => StoreError { code, message },
        Ok(PostgrestErrorBody { code, message: None }) => StoreError {
            code,
            message: format!("record store answered with status {status}"),
        },
        Err(_) => StoreError::new(format!("record store answered with status {status}")),
    }
}

#[async_trait]
impl RecordStore for PostgrestStore {
    async fn list(&self, query: &ListQuery) -> Result<Vec<Value>, StoreError> {
        debug!(table = %query.table, "listing records");
        let response = self
            .client
            .get(self.table_url(&query.table))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .query(&query_params(query))
            .send()
            .await
            .map_err(|err| StoreError::new(err.to_string()))?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        response
            .json::<Vec<Value>>()
            .await
            .map_err(|err| StoreError::new(format!("unreadable rows from {}: {err}", query.table)))
    }

    async fn insert(
        &self,
        table: &str,
        record: Value,
        access_token: Option<&AccessToken>,
    ) -> Result<Value, StoreError> {
        debug!(%table, as_caller = access_token.is_some(), "inserting record");
        let (api_key, bearer) = self.write_credentials(access_token);
        let response = self
            .client
            .post(self.table_url(table))
            .header("apikey", api_key)
            .bearer_auth(bearer)
            .header("Prefer", "return=representation")
            .json(&record)
            .send()
            .await
            .map_err(|err| StoreError::new(err.to_string()))?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let mut rows = response
            .json::<Vec<Value>>()
            .await
            .map_err(|err| StoreError::new(format!("unreadable insert result from {table}: {err}")))?;

        match rows.len() {
            0 => Ok(record),
            _ => Ok(rows.swap_remove(0)),
        }
    }
}
