//! Dual-image post composition.
//!
//! The composer orchestrates one or two media uploads, writes the post
//! document, and hands off to the statistics synchronizer.  Every failure
//! before the document write leaves nothing persisted; the paired-upload
//! path deletes the already-stored back image when the front upload fails so
//! partially-completed dual captures never leave orphaned blobs.

use std::collections::HashSet;

use chrono::Utc;
use tracing::{info, warn};

use groupshot_shared::{GroupId, ImageRefs, ImageType, Post, PostId, PostKind, UserId, ValidationError};

use crate::client::GroupshotClient;
use crate::error::ClientError;

/// Caller input for one post.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// Back-camera image reference (data URI, file path or URL).
    pub back_image: String,
    pub caption: String,
    pub author_name: String,
    pub author_id: UserId,
    pub group_id: GroupId,
    /// Optional front-camera image reference.
    pub front_image: Option<String>,
}

impl NewPost {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.back_image.trim().is_empty() {
            return Err(ValidationError::EmptyField("back_image"));
        }
        if self.caption.trim().is_empty() {
            return Err(ValidationError::EmptyField("caption"));
        }
        if self.author_name.trim().is_empty() {
            return Err(ValidationError::EmptyField("author_name"));
        }
        if self.author_id.as_str().trim().is_empty() {
            return Err(ValidationError::EmptyField("author_id"));
        }
        Ok(())
    }
}

impl GroupshotClient {
    /// Create a post from one or two captured images.
    ///
    /// The document write is the commit point: once it succeeds the post
    /// exists, and statistics failures are logged but never surfaced.
    pub async fn create_post(&self, input: NewPost) -> Result<Post, ClientError> {
        input.validate()?;

        // Membership gating is advisory: a lookup failure or non-membership
        // is logged and the post proceeds.
        self.check_membership(&input).await;

        let main = self
            .uploader
            .upload(
                &input.back_image,
                &input.group_id,
                &input.author_id,
                ImageType::Main,
            )
            .await?;

        let front = match &input.front_image {
            None => None,
            Some(front_ref) => {
                match self
                    .uploader
                    .upload(front_ref, &input.group_id, &input.author_id, ImageType::Front)
                    .await
                {
                    Ok(descriptor) => Some(descriptor),
                    Err(e) => {
                        // The back image is already durable; remove it so the
                        // failed dual capture leaves no orphaned blob.
                        if let Err(del) = self.blobs.delete(&main.path).await {
                            warn!(path = %main.path, error = %del, "orphan cleanup failed");
                        }
                        return Err(e.into());
                    }
                }
            }
        };

        let kind = if front.is_some() {
            PostKind::DualCamera
        } else {
            PostKind::SingleCamera
        };

        let mut post = Post {
            id: PostId(String::new()),
            author_id: input.author_id.clone(),
            author_name: input.author_name.trim().to_string(),
            group_id: input.group_id.clone(),
            caption: input.caption.trim().to_string(),
            image: ImageRefs {
                url: main.download_url,
                path: main.path,
                size: main.size,
            },
            front_image: front.map(|d| ImageRefs {
                url: d.download_url,
                path: d.path,
                size: d.size,
            }),
            kind,
            likes: HashSet::new(),
            comments: Vec::new(),
            created_at: Utc::now(),
        };

        post.id = self.write_post(&post).await?;

        info!(
            post_id = %post.id,
            group = %post.group_id,
            kind = ?post.kind,
            "post created"
        );

        // The post exists; bookkeeping failures must not un-report it.
        if let Err(e) = self
            .stats
            .record_post(&input.author_id, &input.group_id, &post)
            .await
        {
            warn!(post_id = %post.id, error = %e, "statistics update failed after post commit");
        }

        Ok(post)
    }

    async fn check_membership(&self, input: &NewPost) {
        match self.get_group(&input.group_id).await {
            Ok(Some(group)) => {
                if !group.members.contains(&input.author_id) {
                    warn!(
                        group = %input.group_id,
                        user = %input.author_id,
                        "posting without group membership"
                    );
                }
            }
            Ok(None) => {
                warn!(group = %input.group_id, "posting into unknown group");
            }
            Err(e) => {
                warn!(group = %input.group_id, error = %e, "membership check failed, proceeding");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{data_uri, TestHarness};
    use groupshot_media::UploadError;

    // Scenario A: single-image post.
    #[tokio::test]
    async fn single_image_post_unlocks_group() {
        let h = TestHarness::new();
        h.seed_profile("Alice");

        let post = h
            .client
            .create_post(NewPost {
                back_image: data_uri(b"img1"),
                caption: "hello".into(),
                author_name: "Alice".into(),
                author_id: h.user_id.clone(),
                group_id: h.group_id.clone(),
                front_image: None,
            })
            .await
            .unwrap();

        assert!(!post.id.as_str().is_empty());
        assert_eq!(post.kind, PostKind::SingleCamera);
        assert!(post.front_image.is_none());
        assert_eq!(post.caption, "hello");

        assert!(h.client.has_user_posted_in_group(&h.user_id, &h.group_id).await);
        let profile = h.client.cached_profile().unwrap().unwrap();
        assert!(profile.groups_posted.contains(&h.group_id));
    }

    #[tokio::test]
    async fn dual_image_post_keeps_both_blobs() {
        let h = TestHarness::new();
        h.seed_profile("Alice");

        let post = h
            .client
            .create_post(NewPost {
                back_image: data_uri(b"back-bytes"),
                caption: "both sides".into(),
                author_name: "Alice".into(),
                author_id: h.user_id.clone(),
                group_id: h.group_id.clone(),
                front_image: Some(data_uri(b"front-bytes")),
            })
            .await
            .unwrap();

        assert_eq!(post.kind, PostKind::DualCamera);
        let front = post.front_image.as_ref().expect("front image present");
        assert!(h.blobs.contains(&post.image.path));
        assert!(h.blobs.contains(&front.path));
        assert_ne!(post.image.path, front.path);
    }

    // Scenario B: front upload fails; back blob cleaned up, nothing written.
    #[tokio::test]
    async fn front_failure_cleans_up_back_blob() {
        let h = TestHarness::new();
        h.seed_profile("Alice");
        h.blobs.fail_puts_containing("_front_");

        let err = h
            .client
            .create_post(NewPost {
                back_image: data_uri(b"back-bytes"),
                caption: "doomed".into(),
                author_name: "Alice".into(),
                author_id: h.user_id.clone(),
                group_id: h.group_id.clone(),
                front_image: Some(data_uri(b"front-bytes")),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Upload(UploadError::Storage(_))));
        // Back blob deleted, no post document written.
        assert!(h.blobs.is_empty());
        assert!(h.client.group_posts(&h.group_id).await.is_empty());
        // And no statistics recorded.
        let profile = h.client.cached_profile().unwrap().unwrap();
        assert_eq!(profile.total_posts, 0);
        assert!(!profile.groups_posted.contains(&h.group_id));
    }

    #[tokio::test]
    async fn validation_fails_fast_without_uploading() {
        let h = TestHarness::new();
        h.seed_profile("Alice");

        let err = h
            .client
            .create_post(NewPost {
                back_image: data_uri(b"img"),
                caption: "   ".into(),
                author_name: "Alice".into(),
                author_id: h.user_id.clone(),
                group_id: h.group_id.clone(),
                front_image: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Validation(_)));
        assert!(h.blobs.is_empty());
    }

    #[tokio::test]
    async fn store_write_failure_propagates_as_store_error() {
        let h = TestHarness::new();
        h.seed_profile("Alice");
        h.docs.set_deny_writes(true);

        let err = h.create_single_post("hello").await.unwrap_err();
        assert!(matches!(err, ClientError::StoreWrite(_)));
    }

    // P6: statistics failures never block the created post.
    #[tokio::test]
    async fn statistics_failure_still_returns_post() {
        let h = TestHarness::new();
        // No profile seeded and group counters will miss their document;
        // additionally knock the group document out from under the stats
        // step by never creating it.  The post must still come back.
        let post = h.create_single_post("resilient").await.unwrap();
        assert!(!post.id.as_str().is_empty());
        assert_eq!(h.client.group_posts(&h.group_id).await.len(), 1);
    }

    #[tokio::test]
    async fn caption_and_author_trimmed() {
        let h = TestHarness::new();
        h.seed_profile("Alice");

        let post = h
            .client
            .create_post(NewPost {
                back_image: data_uri(b"img"),
                caption: "  hi there  ".into(),
                author_name: "  Alice  ".into(),
                author_id: h.user_id.clone(),
                group_id: h.group_id.clone(),
                front_image: None,
            })
            .await
            .unwrap();

        assert_eq!(post.caption, "hi there");
        assert_eq!(post.author_name, "Alice");
    }

    #[tokio::test]
    async fn posting_without_membership_is_allowed() {
        let h = TestHarness::new();
        h.seed_profile("Alice");
        // Group exists but Alice is not a member.
        h.seed_group_without(&h.user_id).await;

        let post = h.create_single_post("outsider").await;
        assert!(post.is_ok());
    }
}
