//! Document store collaborator trait and its update/query value model.

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;

/// One field mutation inside a partial document update.
///
/// `Increment` carries the store's atomic numeric increment semantics:
/// concurrent increments never lose updates, unlike read-modify-write.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOp {
    /// Overwrite the field with a value.
    Set(Value),
    /// Atomically add to a numeric field (missing fields start at 0).
    Increment(i64),
    /// Append elements not already present in an array field.
    ArrayUnion(Vec<Value>),
}

/// An equality filter on a document field.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, Value),
}

/// Result ordering for a query.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub descending: bool,
}

impl OrderBy {
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }
}

/// Collection-style remote document storage.
///
/// The wire protocol behind this trait is out of scope for the core; all
/// callers treat it as opaque.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document; the store assigns and returns its id.  The
    /// assigned id is also injected into the stored document under `"id"`.
    async fn add_document(&self, collection: &str, data: Value) -> Result<String>;

    /// Fetch a document by id.  Absence is `Ok(None)`, not an error.
    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Value>>;

    /// Insert a document under a caller-chosen id, replacing any existing
    /// document with that id.
    async fn set_document(&self, collection: &str, id: &str, data: Value) -> Result<()>;

    /// Apply a partial update to an existing document.
    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        updates: Vec<(String, FieldOp)>,
    ) -> Result<()>;

    /// Query a collection with equality filters and optional ordering.
    async fn query(
        &self,
        collection: &str,
        filters: Vec<Filter>,
        order_by: Option<OrderBy>,
    ) -> Result<Vec<Value>>;
}
