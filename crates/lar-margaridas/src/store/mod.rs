//! Remote record store seam: list and insert against named tables.

mod memory;
mod postgrest;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::session::AccessToken;

pub use memory::MemoryRecordStore;
pub use postgrest::PostgrestStore;

/// Table names of the hosted schema.
pub mod tables {
    pub const ANNOUNCEMENTS: &str = "announcements";
    pub const COURSES: &str = "courses";
    pub const COURSE_ENROLLMENTS: &str = "course_enrollments";
    pub const PROJECTS: &str = "projects";
    pub const VOLUNTEERS: &str = "volunteers";
}

/// Postgres SQLSTATE for unique constraint violations.
pub const UNIQUE_VIOLATION: &str = "23505";

/// Storage abstraction so workflows can be exercised in isolation.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list(&self, query: &ListQuery) -> Result<Vec<Value>, StoreError>;

    /// Insert one row. `access_token` is the verified caller, when there is one;
    /// stores with row-level policies write on their behalf.
    async fn insert(
        &self,
        table: &str,
        record: Value,
        access_token: Option<&AccessToken>,
    ) -> Result<Value, StoreError>;
}

/// Failure reported by the store. `message` is surfaced to users verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct StoreError {
    pub code: Option<String>,
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        self.code.as_deref() == Some(UNIQUE_VIOLATION)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: String,
    pub direction: Direction,
}

/// `select *` over one table with equality filters, an optional order and limit.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub table: String,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl ListQuery {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order = Some(Order {
            column: column.into(),
            direction,
        });
        self
    }

    pub fn newest_first(self) -> Self {
        self.order_by("created_at", Direction::Descending)
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// List rows and decode them into `T`. Undecodable rows fail the whole call.
pub async fn list_as<T, S>(store: &S, query: &ListQuery) -> Result<Vec<T>, StoreError>
where
    T: DeserializeOwned,
    S: RecordStore + ?Sized,
{
    store
        .list(query)
        .await?
        .into_iter()
        .map(|row| {
            serde_json::from_value(row).map_err(|err| {
                StoreError::new(format!("malformed row in {}: {err}", query.table))
            })
        })
        .collect()
}
