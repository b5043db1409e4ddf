//! Post engagement: like toggles and comment appends.
//!
//! These are the only mutations a post document accepts after creation.

use chrono::Utc;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use groupshot_remote::FieldOp;
use groupshot_shared::constants::POSTS_COLLECTION;
use groupshot_shared::{Comment, PostId, UserId};

use crate::client::GroupshotClient;
use crate::error::ClientError;

impl GroupshotClient {
    /// Toggle the user's like on a post.  Returns whether the post is liked
    /// after the toggle.
    ///
    /// The likes set is read-modify-written as a whole: the store's atomic
    /// op only unions, and a toggle must also be able to remove.
    pub async fn toggle_like(&self, post_id: &PostId, user_id: &UserId) -> Result<bool, ClientError> {
        let doc = self
            .docs
            .get_document(POSTS_COLLECTION, post_id.as_str())
            .await
            .map_err(|e| ClientError::Remote(e.to_string()))?
            .ok_or_else(|| ClientError::NotFound(format!("post {post_id}")))?;

        let mut likes: Vec<String> = doc
            .get("likes")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default();

        let liked_now = if let Some(pos) = likes.iter().position(|u| u == user_id.as_str()) {
            likes.remove(pos);
            false
        } else {
            likes.push(user_id.as_str().to_string());
            true
        };

        self.docs
            .update_document(
                POSTS_COLLECTION,
                post_id.as_str(),
                vec![("likes".into(), FieldOp::Set(json!(likes)))],
            )
            .await
            .map_err(|e| ClientError::Remote(e.to_string()))?;

        Ok(liked_now)
    }

    /// Append a comment to a post.
    pub async fn add_comment(
        &self,
        post_id: &PostId,
        user_id: &UserId,
        user_name: &str,
        text: &str,
    ) -> Result<Comment, ClientError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ClientError::Validation(
                groupshot_shared::ValidationError::EmptyField("text"),
            ));
        }

        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.clone(),
            user_name: user_name.trim().to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
        };

        let value =
            serde_json::to_value(&comment).map_err(|e| ClientError::Remote(e.to_string()))?;
        self.docs
            .update_document(
                POSTS_COLLECTION,
                post_id.as_str(),
                vec![("comments".into(), FieldOp::ArrayUnion(vec![value]))],
            )
            .await
            .map_err(|e| match e {
                groupshot_remote::RemoteError::NotFound(_) => {
                    ClientError::NotFound(format!("post {post_id}"))
                }
                other => ClientError::Remote(other.to_string()),
            })?;

        info!(post = %post_id, user = %user_id, "comment added");
        Ok(comment)
    }
}
