use std::cmp::Ordering as CmpOrdering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use super::{Direction, ListQuery, RecordStore, StoreError, UNIQUE_VIOLATION};
use crate::session::AccessToken;

/// Process-local store used in development mode, the CLI demo and tests.
///
/// Inserted rows receive an `id` and `created_at`/`updated_at` timestamps when
/// absent. Unique constraints registered with [`with_unique`](Self::with_unique)
/// reject duplicates with SQLSTATE `23505`, as Postgres would.
#[derive(Default, Clone)]
pub struct MemoryRecordStore {
    tables: Arc<Mutex<HashMap<String, Vec<Value>>>>,
    unique: Arc<Vec<(String, Vec<String>)>>,
    sequence: Arc<AtomicU64>,
}

impl MemoryRecordStore {
    pub fn with_unique(mut self, table: &str, columns: &[&str]) -> Self {
        let mut unique = self.unique.as_ref().clone();
        unique.push((
            table.to_string(),
            columns.iter().map(|column| column.to_string()).collect(),
        ));
        self.unique = Arc::new(unique);
        self
    }

    /// Append rows verbatim, bypassing defaults and constraints.
    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        self.lock()
            .entry(table.to_string())
            .or_default()
            .extend(rows);
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.lock().get(table).cloned().unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<Value>>> {
        self.tables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn violated_constraint(&self, table: &str, existing: &[Value], record: &Value) -> Option<String> {
        self.unique
            .iter()
            .filter(|(constrained, _)| constrained == table)
            .find(|(_, columns)| {
                existing.iter().any(|row| {
                    columns
                        .iter()
                        .all(|column| row.get(column) == record.get(column))
                })
            })
            .map(|(_, columns)| format!("{}_{}_key", table, columns.join("_")))
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list(&self, query: &ListQuery) -> Result<Vec<Value>, StoreError> {
        let tables = self.lock();
        let mut rows: Vec<Value> = tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| {
                        query
                            .filters
                            .iter()
                            .all(|filter| row.get(&filter.column) == Some(&filter.value))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(tables);

        if let Some(order) = &query.order {
            rows.sort_by(|left, right| {
                let ordering = compare_nulls_last(left.get(&order.column), right.get(&order.column));
                match order.direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        Ok(rows)
    }

    async fn insert(
        &self,
        table: &str,
        record: Value,
        _access_token: Option<&AccessToken>,
    ) -> Result<Value, StoreError> {
        let Value::Object(mut fields) = record else {
            return Err(StoreError::new(format!(
                "insert into {table} expects a JSON object"
            )));
        };

        let mut tables = self.lock();
        let rows = tables.entry(table.to_string()).or_default();

        let candidate = Value::Object(fields.clone());
        if let Some(constraint) = self.violated_constraint(table, rows, &candidate) {
            return Err(StoreError::with_code(
                UNIQUE_VIOLATION,
                format!("duplicate key value violates unique constraint \"{constraint}\""),
            ));
        }

        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        fields
            .entry("id")
            .or_insert_with(|| Value::String(format!("{table}-{id:06}")));
        fields
            .entry("created_at")
            .or_insert_with(|| Value::String(now.clone()));
        fields
            .entry("updated_at")
            .or_insert_with(|| Value::String(now));

        let stored = Value::Object(fields);
        rows.push(stored.clone());
        Ok(stored)
    }
}

/// Postgres sorts NULL above every value, so it trails ascending order.
fn compare_nulls_last(left: Option<&Value>, right: Option<&Value>) -> CmpOrdering {
    let left = left.filter(|value| !value.is_null());
    let right = right.filter(|value| !value.is_null());

    match (left, right) {
        (None, None) => CmpOrdering::Equal,
        (None, Some(_)) => CmpOrdering::Greater,
        (Some(_), None) => CmpOrdering::Less,
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let a = a.as_f64().unwrap_or_default();
            let b = b.as_f64().unwrap_or_default();
            a.partial_cmp(&b).unwrap_or(CmpOrdering::Equal)
        }
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
    }
}
