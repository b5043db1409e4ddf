//! Blob store collaborator trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use groupshot_shared::{GroupId, ImageType, UserId};

use crate::Result;

/// Custom metadata attached to every uploaded blob.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlobMetadata {
    pub content_type: String,
    pub group_id: GroupId,
    pub user_id: UserId,
    pub image_type: ImageType,
    pub uploaded_at: DateTime<Utc>,
}

/// Remote binary object storage.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write bytes under a path, attaching content-type and custom metadata.
    async fn put(&self, path: &str, bytes: &[u8], metadata: BlobMetadata) -> Result<()>;

    /// Resolve a durable retrieval URL for a stored blob.
    async fn download_url(&self, path: &str) -> Result<String>;

    /// Delete a blob.  Idempotent: deleting an absent object succeeds.
    async fn delete(&self, path: &str) -> Result<()>;
}
