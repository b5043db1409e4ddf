//! In-memory collaborator implementations.
//!
//! Used by tests and local development.  Both stores can be switched into
//! failing modes so callers' fail-open and swallow-on-permission-denied
//! policies can be exercised.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::blob::{BlobMetadata, BlobStore};
use crate::document::{DocumentStore, FieldOp, Filter, OrderBy};
use crate::{RemoteError, Result};

// ---------------------------------------------------------------------------
// Document store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: Mutex<HashMap<String, BTreeMap<String, Value>>>,
    failing: AtomicBool,
    deny_writes: AtomicBool,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail with `Unavailable`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Make every mutation fail with `PermissionDenied` (reads still work).
    pub fn set_deny_writes(&self, deny: bool) {
        self.deny_writes.store(deny, Ordering::SeqCst);
    }

    /// Number of documents in a collection (test helper).
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .map_or(0, |c| c.len())
    }

    fn check_available(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable("store offline".into()));
        }
        Ok(())
    }

    fn check_writable(&self) -> Result<()> {
        self.check_available()?;
        if self.deny_writes.load(Ordering::SeqCst) {
            return Err(RemoteError::PermissionDenied);
        }
        Ok(())
    }
}

/// Apply one field op to a document in place.
fn apply_op(doc: &mut Value, field: &str, op: FieldOp) {
    let obj = match doc.as_object_mut() {
        Some(obj) => obj,
        None => return,
    };
    match op {
        FieldOp::Set(value) => {
            obj.insert(field.to_string(), value);
        }
        FieldOp::Increment(delta) => {
            let current = obj.get(field).and_then(Value::as_i64).unwrap_or(0);
            obj.insert(field.to_string(), Value::from(current + delta));
        }
        FieldOp::ArrayUnion(values) => {
            let arr = obj
                .entry(field.to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(items) = arr {
                for value in values {
                    if !items.contains(&value) {
                        items.push(value);
                    }
                }
            }
        }
    }
}

/// Compare two documents on a field for ordering.  RFC 3339 timestamps are
/// stored as strings, so lexical comparison matches chronological order.
fn cmp_field(a: &Value, b: &Value, field: &str) -> std::cmp::Ordering {
    let av = a.get(field);
    let bv = b.get(field);
    match (av, bv) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(std::cmp::Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, Some(_)) => std::cmp::Ordering::Less,
        _ => std::cmp::Ordering::Equal,
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn add_document(&self, collection: &str, mut data: Value) -> Result<String> {
        self.check_writable()?;
        let id = Uuid::new_v4().to_string();
        if let Some(obj) = data.as_object_mut() {
            obj.insert("id".to_string(), Value::String(id.clone()));
        }
        self.collections
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), data);
        Ok(id)
    }

    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        self.check_available()?;
        Ok(self
            .collections
            .lock()
            .unwrap()
            .get(collection)
            .and_then(|c| c.get(id))
            .cloned())
    }

    async fn set_document(&self, collection: &str, id: &str, mut data: Value) -> Result<()> {
        self.check_writable()?;
        if let Some(obj) = data.as_object_mut() {
            obj.insert("id".to_string(), Value::String(id.to_string()));
        }
        self.collections
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
        Ok(())
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        updates: Vec<(String, FieldOp)>,
    ) -> Result<()> {
        self.check_writable()?;
        let mut collections = self.collections.lock().unwrap();
        let doc = collections
            .get_mut(collection)
            .and_then(|c| c.get_mut(id))
            .ok_or_else(|| RemoteError::NotFound(format!("{collection}/{id}")))?;
        for (field, op) in updates {
            apply_op(doc, &field, op);
        }
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        filters: Vec<Filter>,
        order_by: Option<OrderBy>,
    ) -> Result<Vec<Value>> {
        self.check_available()?;
        let collections = self.collections.lock().unwrap();
        let mut results: Vec<Value> = collections
            .get(collection)
            .map(|c| {
                c.values()
                    .filter(|doc| {
                        filters.iter().all(|f| match f {
                            Filter::Eq(field, value) => doc.get(field) == Some(value),
                        })
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = order_by {
            results.sort_by(|a, b| {
                let ord = cmp_field(a, b, &order.field);
                if order.descending {
                    ord.reverse()
                } else {
                    ord
                }
            });
        }
        Ok(results)
    }
}

// ---------------------------------------------------------------------------
// Blob store
// ---------------------------------------------------------------------------

struct StoredBlob {
    bytes: Vec<u8>,
    metadata: BlobMetadata,
}

#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, StoredBlob>>,
    failing: AtomicBool,
    /// Puts whose path contains this substring fail (partial-upload tests).
    fail_put_containing: Mutex<Option<String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Fail any subsequent `put` whose path contains `needle`.
    pub fn fail_puts_containing(&self, needle: impl Into<String>) {
        *self.fail_put_containing.lock().unwrap() = Some(needle.into());
    }

    /// Whether a blob currently exists at `path` (test helper).
    pub fn contains(&self, path: &str) -> bool {
        self.blobs.lock().unwrap().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored bytes of a blob (test helper).
    pub fn bytes(&self, path: &str) -> Option<Vec<u8>> {
        self.blobs.lock().unwrap().get(path).map(|b| b.bytes.clone())
    }

    /// Metadata of a stored blob (test helper).
    pub fn metadata(&self, path: &str) -> Option<BlobMetadata> {
        self.blobs
            .lock()
            .unwrap()
            .get(path)
            .map(|b| b.metadata.clone())
    }

    fn check_available(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable("blob store offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, path: &str, bytes: &[u8], metadata: BlobMetadata) -> Result<()> {
        self.check_available()?;
        if let Some(needle) = self.fail_put_containing.lock().unwrap().as_deref() {
            if path.contains(needle) {
                return Err(RemoteError::Transport(format!(
                    "simulated upload failure for {path}"
                )));
            }
        }
        self.blobs.lock().unwrap().insert(
            path.to_string(),
            StoredBlob {
                bytes: bytes.to_vec(),
                metadata,
            },
        );
        Ok(())
    }

    async fn download_url(&self, path: &str) -> Result<String> {
        self.check_available()?;
        let blobs = self.blobs.lock().unwrap();
        if !blobs.contains_key(path) {
            return Err(RemoteError::NotFound(path.to_string()));
        }
        Ok(format!("memory://{path}"))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.check_available()?;
        // Absent objects are treated as already deleted.
        self.blobs.lock().unwrap().remove(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use groupshot_shared::{GroupId, ImageType, UserId};
    use serde_json::json;

    fn meta() -> BlobMetadata {
        BlobMetadata {
            content_type: "image/jpeg".into(),
            group_id: GroupId::parse("beach24").unwrap(),
            user_id: UserId("u1".into()),
            image_type: ImageType::Main,
            uploaded_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn add_assigns_and_injects_id() {
        let store = MemoryDocumentStore::new();
        let id = store
            .add_document("posts", json!({ "caption": "hi" }))
            .await
            .unwrap();
        let doc = store.get_document("posts", &id).await.unwrap().unwrap();
        assert_eq!(doc["id"], id);
        assert_eq!(doc["caption"], "hi");
    }

    #[tokio::test]
    async fn increment_starts_from_zero_and_accumulates() {
        let store = MemoryDocumentStore::new();
        store
            .set_document("groups", "G1", json!({ "name": "beach" }))
            .await
            .unwrap();
        for _ in 0..3 {
            store
                .update_document("groups", "G1", vec![("total_posts".into(), FieldOp::Increment(1))])
                .await
                .unwrap();
        }
        let doc = store.get_document("groups", "G1").await.unwrap().unwrap();
        assert_eq!(doc["total_posts"], 3);
    }

    #[tokio::test]
    async fn array_union_skips_duplicates() {
        let store = MemoryDocumentStore::new();
        store
            .set_document("groups", "G1", json!({ "members": ["u1"] }))
            .await
            .unwrap();
        store
            .update_document(
                "groups",
                "G1",
                vec![("members".into(), FieldOp::ArrayUnion(vec![json!("u1"), json!("u2")]))],
            )
            .await
            .unwrap();
        let doc = store.get_document("groups", "G1").await.unwrap().unwrap();
        assert_eq!(doc["members"], json!(["u1", "u2"]));
    }

    #[tokio::test]
    async fn update_missing_document_is_not_found() {
        let store = MemoryDocumentStore::new();
        let err = store
            .update_document("groups", "NOPE", vec![("x".into(), FieldOp::Increment(1))])
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::NotFound(_)));
    }

    #[tokio::test]
    async fn query_filters_and_orders_descending() {
        let store = MemoryDocumentStore::new();
        for (group, ts) in [("g1", "2026-01-01T00:00:00Z"), ("g1", "2026-01-03T00:00:00Z"), ("g2", "2026-01-02T00:00:00Z")] {
            store
                .add_document("posts", json!({ "group_id": group, "created_at": ts }))
                .await
                .unwrap();
        }
        let results = store
            .query(
                "posts",
                vec![Filter::Eq("group_id".into(), json!("g1"))],
                Some(OrderBy::desc("created_at")),
            )
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["created_at"], "2026-01-03T00:00:00Z");
    }

    #[tokio::test]
    async fn deny_writes_leaves_reads_working() {
        let store = MemoryDocumentStore::new();
        store
            .set_document("groups", "G1", json!({ "total_posts": 0 }))
            .await
            .unwrap();
        store.set_deny_writes(true);
        let err = store
            .update_document("groups", "G1", vec![("total_posts".into(), FieldOp::Increment(1))])
            .await
            .unwrap_err();
        assert!(err.is_permission_denied());
        assert!(store.get_document("groups", "G1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn blob_round_trip_and_idempotent_delete() {
        let store = MemoryBlobStore::new();
        store.put("groups/G1/photos/a.jpg", b"data", meta()).await.unwrap();
        assert!(store.download_url("groups/G1/photos/a.jpg").await.is_ok());

        store.delete("groups/G1/photos/a.jpg").await.unwrap();
        assert!(!store.contains("groups/G1/photos/a.jpg"));
        // Deleting again is still success.
        store.delete("groups/G1/photos/a.jpg").await.unwrap();
    }

    #[tokio::test]
    async fn download_url_for_missing_blob_fails() {
        let store = MemoryBlobStore::new();
        assert!(store.download_url("groups/G1/photos/missing.jpg").await.is_err());
    }
}
