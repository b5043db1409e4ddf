//! HTTP clients for the hosted document and blob stores.
//!
//! The backend speaks a small JSON dialect; these clients only translate
//! between it and the collaborator traits.  No retries happen here: the
//! calling layers decide which failures are terminal.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::blob::{BlobMetadata, BlobStore};
use crate::document::{DocumentStore, FieldOp, Filter, OrderBy};
use crate::{RemoteError, Result};

/// Map a non-success HTTP status onto the remote error taxonomy.
fn status_error(status: StatusCode) -> RemoteError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteError::PermissionDenied,
        StatusCode::NOT_FOUND => RemoteError::NotFound("resource".into()),
        s if s.is_server_error() => RemoteError::Unavailable(format!("HTTP {s}")),
        s => RemoteError::Transport(format!("HTTP {s}")),
    }
}

// ---------------------------------------------------------------------------
// Document store
// ---------------------------------------------------------------------------

pub struct HttpDocumentStore {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct IdResponse {
    id: String,
}

#[derive(Deserialize)]
struct QueryResponse {
    documents: Vec<Value>,
}

impl HttpDocumentStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}/v1/{suffix}", self.base_url)
    }
}

/// Encode one field op as the backend's JSON update form.
fn encode_op(field: &str, op: &FieldOp) -> Value {
    match op {
        FieldOp::Set(value) => json!({ "field": field, "set": value }),
        FieldOp::Increment(delta) => json!({ "field": field, "increment": delta }),
        FieldOp::ArrayUnion(values) => json!({ "field": field, "arrayUnion": values }),
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn add_document(&self, collection: &str, data: Value) -> Result<String> {
        let resp = self
            .client
            .post(self.url(collection))
            .json(&data)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(status_error(resp.status()));
        }
        let body: IdResponse = resp.json().await?;
        Ok(body.id)
    }

    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let resp = self
            .client
            .get(self.url(&format!("{collection}/{id}")))
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(status_error(resp.status()));
        }
        Ok(Some(resp.json().await?))
    }

    async fn set_document(&self, collection: &str, id: &str, data: Value) -> Result<()> {
        let resp = self
            .client
            .put(self.url(&format!("{collection}/{id}")))
            .json(&data)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(status_error(resp.status()));
        }
        Ok(())
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        updates: Vec<(String, FieldOp)>,
    ) -> Result<()> {
        let ops: Vec<Value> = updates
            .iter()
            .map(|(field, op)| encode_op(field, op))
            .collect();
        let resp = self
            .client
            .patch(self.url(&format!("{collection}/{id}")))
            .json(&json!({ "updates": ops }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(status_error(resp.status()));
        }
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        filters: Vec<Filter>,
        order_by: Option<OrderBy>,
    ) -> Result<Vec<Value>> {
        let filters: Vec<Value> = filters
            .iter()
            .map(|Filter::Eq(field, value)| json!({ "field": field, "eq": value }))
            .collect();
        let order = order_by.map(|o| json!({ "field": o.field, "descending": o.descending }));
        let resp = self
            .client
            .post(self.url(&format!("{collection}:query")))
            .json(&json!({ "filters": filters, "orderBy": order }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(status_error(resp.status()));
        }
        let body: QueryResponse = resp.json().await?;
        Ok(body.documents)
    }
}

// ---------------------------------------------------------------------------
// Blob store
// ---------------------------------------------------------------------------

pub struct HttpBlobStore {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct UrlResponse {
    url: String,
}

impl HttpBlobStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/blobs/{path}", self.base_url)
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn put(&self, path: &str, bytes: &[u8], metadata: BlobMetadata) -> Result<()> {
        let resp = self
            .client
            .put(self.url(path))
            .header("content-type", &metadata.content_type)
            .header("x-groupshot-group", metadata.group_id.as_str())
            .header("x-groupshot-user", metadata.user_id.as_str())
            .header("x-groupshot-image-type", metadata.image_type.as_str())
            .header("x-groupshot-uploaded-at", metadata.uploaded_at.to_rfc3339())
            .body(bytes.to_vec())
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(status_error(resp.status()));
        }
        Ok(())
    }

    async fn download_url(&self, path: &str) -> Result<String> {
        let resp = self
            .client
            .get(format!("{}/url", self.url(path)))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(status_error(resp.status()));
        }
        let body: UrlResponse = resp.json().await?;
        Ok(body.url)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let resp = self.client.delete(self.url(path)).send().await?;
        // Already-absent objects count as deleted.
        if resp.status() == StatusCode::NOT_FOUND || resp.status().is_success() {
            return Ok(());
        }
        Err(status_error(resp.status()))
    }
}
