//! Shared fixtures for the client test modules.

use std::sync::{Arc, Mutex};

use base64::Engine;
use chrono::Utc;
use tempfile::TempDir;

use groupshot_remote::{DocumentStore, MemoryBlobStore, MemoryDocumentStore};
use groupshot_shared::constants::GROUPS_COLLECTION;
use groupshot_shared::{Group, GroupId, Post, UserId, UserProfile};
use groupshot_store::ProfileCache;

use crate::client::GroupshotClient;
use crate::composer::NewPost;
use crate::error::ClientError;

/// A client wired to in-memory collaborators and a tempdir-backed cache.
pub struct TestHarness {
    pub client: GroupshotClient,
    pub docs: Arc<MemoryDocumentStore>,
    pub blobs: Arc<MemoryBlobStore>,
    pub user_id: UserId,
    pub group_id: GroupId,
    _dir: TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let cache = ProfileCache::open_at(&dir.path().join("cache.db")).unwrap();
        let docs = Arc::new(MemoryDocumentStore::new());
        let blobs = Arc::new(MemoryBlobStore::new());

        let client = GroupshotClient::new(docs.clone(), blobs.clone(), Arc::new(Mutex::new(cache)));

        Self {
            client,
            docs,
            blobs,
            user_id: UserId("u1".into()),
            group_id: GroupId::parse("g1aaa").unwrap(),
            _dir: dir,
        }
    }

    /// Store a fresh profile for `user_id` in the cache.
    pub fn seed_profile(&self, name: &str) {
        let mut profile = UserProfile::new(name);
        profile.id = self.user_id.clone();
        let cache = self.client.profile.lock().unwrap();
        cache.set(&profile).unwrap();
    }

    /// Create the harness group document with `user_id` as a member.
    pub async fn seed_group(&self) {
        self.seed_group_members([self.user_id.clone()]).await;
    }

    /// Create the harness group document without `user_id` in it.
    pub async fn seed_group_without(&self, excluded: &UserId) {
        let other = UserId(format!("not-{}", excluded.as_str()));
        self.seed_group_members([other]).await;
    }

    async fn seed_group_members(&self, members: impl IntoIterator<Item = UserId>) {
        let now = Utc::now();
        let group = Group {
            id: self.group_id.clone(),
            name: "Test Group".into(),
            members: members.into_iter().collect(),
            member_count: 1,
            total_posts: 0,
            created_by: self.user_id.clone(),
            created_at: now,
            last_activity: now,
        };
        self.docs
            .set_document(
                GROUPS_COLLECTION,
                self.group_id.as_str(),
                serde_json::to_value(&group).unwrap(),
            )
            .await
            .unwrap();
    }

    /// Single-image post into the harness group.
    pub async fn create_single_post(&self, caption: &str) -> Result<Post, ClientError> {
        self.create_single_post_in(&self.group_id.clone(), caption).await
    }

    /// Single-image post into an arbitrary group.
    pub async fn create_single_post_in(
        &self,
        group_id: &GroupId,
        caption: &str,
    ) -> Result<Post, ClientError> {
        self.client
            .create_post(NewPost {
                back_image: data_uri(caption.as_bytes()),
                caption: caption.into(),
                author_name: "Alice".into(),
                author_id: self.user_id.clone(),
                group_id: group_id.clone(),
                front_image: None,
            })
            .await
    }
}

/// Encode bytes as a JPEG data URI.
pub fn data_uri(bytes: &[u8]) -> String {
    format!(
        "data:image/jpeg;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}
