//! Post store gateway: the post write plus the feed queries.
//!
//! Write failures propagate -- the caller must know the post was not
//! persisted.  Query failures do not: feed screens must never hard-fail on
//! read, so every query catches store errors and returns an empty list.

use serde_json::{json, Value};
use tracing::warn;

use groupshot_shared::constants::POSTS_COLLECTION;
use groupshot_shared::{GroupId, Post, PostId, UserId};

use groupshot_remote::{Filter, OrderBy};

use crate::client::GroupshotClient;
use crate::error::ClientError;

impl GroupshotClient {
    /// Persist a post.  This is the commit point of post creation.
    pub(crate) async fn write_post(&self, post: &Post) -> Result<PostId, ClientError> {
        let mut value =
            serde_json::to_value(post).map_err(|e| ClientError::StoreWrite(e.to_string()))?;
        if let Some(obj) = value.as_object_mut() {
            // The store assigns the id.
            obj.remove("id");
        }

        let id = self
            .docs
            .add_document(POSTS_COLLECTION, value)
            .await
            .map_err(|e| ClientError::StoreWrite(e.to_string()))?;

        Ok(PostId(id))
    }

    /// All posts in a group, newest first.  Fails open.
    pub async fn group_posts(&self, group_id: &GroupId) -> Vec<Post> {
        self.query_posts(
            vec![Filter::Eq("group_id".into(), json!(group_id.as_str()))],
            "group feed",
        )
        .await
    }

    /// All posts by a user across groups, newest first.  Fails open.
    pub async fn user_posts(&self, user_id: &UserId) -> Vec<Post> {
        self.query_posts(
            vec![Filter::Eq("author_id".into(), json!(user_id.as_str()))],
            "user feed",
        )
        .await
    }

    /// Posts by a user within one group, newest first.  Fails open.
    pub async fn user_posts_in_group(&self, user_id: &UserId, group_id: &GroupId) -> Vec<Post> {
        self.query_posts(
            vec![
                Filter::Eq("author_id".into(), json!(user_id.as_str())),
                Filter::Eq("group_id".into(), json!(group_id.as_str())),
            ],
            "user posts in group",
        )
        .await
    }

    /// Whether the user has at least one post in the group, per the remote
    /// store.  The local unlock predicate reads the cached profile instead;
    /// this is the remote-truth variant used after cache resets.
    pub async fn has_user_posted_in_group(&self, user_id: &UserId, group_id: &GroupId) -> bool {
        !self.user_posts_in_group(user_id, group_id).await.is_empty()
    }

    async fn query_posts(&self, filters: Vec<Filter>, context: &'static str) -> Vec<Post> {
        let result = self
            .docs
            .query(POSTS_COLLECTION, filters, Some(OrderBy::desc("created_at")))
            .await;

        match result {
            Ok(documents) => decode_posts(documents),
            Err(e) => {
                // Fail open: an empty feed beats an error screen.
                warn!(context, error = %e, "post query failed, returning empty feed");
                Vec::new()
            }
        }
    }
}

/// Decode documents into posts, dropping (and logging) any that no longer
/// match the current schema rather than poisoning the whole feed.
fn decode_posts(documents: Vec<Value>) -> Vec<Post> {
    documents
        .into_iter()
        .filter_map(|doc| match serde_json::from_value::<Post>(doc) {
            Ok(post) => Some(post),
            Err(e) => {
                warn!(error = %e, "skipping undecodable post document");
                None
            }
        })
        .collect()
}
