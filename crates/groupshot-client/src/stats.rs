//! Group/user statistics synchronization.
//!
//! Runs after a post commits.  Two ordered sub-steps: the user's posting
//! status (which drives the unlock predicate, so it goes durable first) and
//! the group's denormalized counters.  Both are best-effort from the
//! composer's point of view -- it discards this module's errors -- but each
//! failure is logged at its own site.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, warn};

use groupshot_remote::{DocumentStore, FieldOp};
use groupshot_shared::constants::{GROUPS_COLLECTION, USERS_COLLECTION};
use groupshot_shared::{ActivityKind, GroupId, Post, UserId, UserProfile};
use groupshot_store::ProfileCache;

use crate::error::ClientError;

/// Reconciles denormalized counters after a post is committed.
pub struct StatsSynchronizer {
    docs: Arc<dyn DocumentStore>,
    profile: Arc<Mutex<ProfileCache>>,
}

impl StatsSynchronizer {
    pub fn new(docs: Arc<dyn DocumentStore>, profile: Arc<Mutex<ProfileCache>>) -> Self {
        Self { docs, profile }
    }

    /// Record one successful post against the user profile and the group.
    ///
    /// User status is updated before group counters are attempted.  There is
    /// no per-user serialization: two concurrent first posts can both
    /// observe `is_first` and double-log the unlock activity; the counter
    /// increments themselves are atomic at the store.
    pub async fn record_post(
        &self,
        author_id: &UserId,
        group_id: &GroupId,
        post: &Post,
    ) -> Result<(), ClientError> {
        self.update_user_status(author_id, group_id, post).await?;
        self.bump_group_counters(group_id).await
    }

    /// Sub-step 1: local profile update plus a best-effort remote mirror.
    async fn update_user_status(
        &self,
        author_id: &UserId,
        group_id: &GroupId,
        post: &Post,
    ) -> Result<(), ClientError> {
        // Read-modify-write under the cache lock; the guard must not be held
        // across the mirror await below.
        let mirrored = {
            let cache = self.profile.lock().map_err(|_| ClientError::CachePoisoned)?;

            let Some(mut profile) = cache.get()? else {
                warn!(user = %author_id, "no cached profile, skipping user status update");
                return Ok(());
            };

            let is_first = !profile.groups_posted.contains(group_id);
            profile.total_posts += 1;
            if is_first {
                profile.groups_posted.insert(group_id.clone());
            }

            let kind = if is_first {
                ActivityKind::FirstPostInGroup
            } else {
                ActivityKind::PostedInGroup
            };
            profile.record_activity(
                kind,
                json!({ "group_id": group_id.as_str(), "post_id": post.id.as_str() }),
            );

            cache.set(&profile)?;
            info!(
                user = %author_id,
                group = %group_id,
                first_post_in_group = is_first,
                total_posts = profile.total_posts,
                "user posting status updated"
            );
            profile
        };

        // Mirror the changed fields remotely; failure is logged only.
        if let Err(e) = self.mirror_profile(&mirrored).await {
            warn!(user = %author_id, error = %e, "profile mirror failed");
        }
        Ok(())
    }

    async fn mirror_profile(&self, profile: &UserProfile) -> groupshot_remote::Result<()> {
        let groups_posted: Vec<&str> = profile.groups_posted.iter().map(|g| g.as_str()).collect();
        self.docs
            .set_document(
                USERS_COLLECTION,
                profile.id.as_str(),
                json!({
                    "name": profile.name,
                    "total_posts": profile.total_posts,
                    "groups_posted": groups_posted,
                }),
            )
            .await
    }

    /// Sub-step 2: atomic group counter increment + activity refresh.
    async fn bump_group_counters(&self, group_id: &GroupId) -> Result<(), ClientError> {
        let result = self
            .docs
            .update_document(
                GROUPS_COLLECTION,
                group_id.as_str(),
                vec![
                    ("total_posts".into(), FieldOp::Increment(1)),
                    (
                        "last_activity".into(),
                        FieldOp::Set(json!(Utc::now().to_rfc3339())),
                    ),
                ],
            )
            .await;

        match result {
            Ok(()) => Ok(()),
            Err(e) if e.is_permission_denied() => {
                // Counter writes may be locked down server-side; not fatal.
                debug!(group = %group_id, "group counter update denied, ignoring");
                Ok(())
            }
            Err(e) => Err(ClientError::Stats(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::testutil::TestHarness;
    use groupshot_remote::DocumentStore;
    use groupshot_shared::constants::GROUPS_COLLECTION;
    use groupshot_shared::ActivityKind;

    // P2 + P3 + Scenario C: counters and first-post-once.
    #[tokio::test]
    async fn sequential_posts_count_and_dedup_group() {
        let h = TestHarness::new();
        h.seed_profile("Alice");
        h.seed_group().await;

        h.create_single_post("one").await.unwrap();
        h.create_single_post("two").await.unwrap();

        let profile = h.client.cached_profile().unwrap().unwrap();
        assert_eq!(profile.total_posts, 2);
        assert_eq!(
            profile.groups_posted.iter().filter(|g| **g == h.group_id).count(),
            1
        );

        // First post logged as first-in-group, second as a plain post.
        let kinds: Vec<ActivityKind> = profile.activity_log.iter().map(|a| a.kind).collect();
        assert!(kinds.contains(&ActivityKind::FirstPostInGroup));
        assert!(kinds.contains(&ActivityKind::PostedInGroup));
    }

    // P1: unlock is idempotent and monotonic.
    #[tokio::test]
    async fn unlock_is_monotonic_across_repeat_posts() {
        let h = TestHarness::new();
        h.seed_profile("Alice");
        h.seed_group().await;

        let profile = h.client.cached_profile().unwrap().unwrap();
        assert!(!crate::is_unlocked(&profile, &h.group_id));

        h.create_single_post("one").await.unwrap();
        let profile = h.client.cached_profile().unwrap().unwrap();
        assert!(crate::is_unlocked(&profile, &h.group_id));

        // A second post leaves the unlock in place; no reverse transition.
        h.create_single_post("two").await.unwrap();
        let profile = h.client.cached_profile().unwrap().unwrap();
        assert!(crate::is_unlocked(&profile, &h.group_id));
    }

    #[tokio::test]
    async fn group_counter_incremented_remotely() {
        let h = TestHarness::new();
        h.seed_profile("Alice");
        h.seed_group().await;

        h.create_single_post("one").await.unwrap();
        h.create_single_post("two").await.unwrap();

        let doc = h
            .docs
            .get_document(GROUPS_COLLECTION, h.group_id.as_str())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc["total_posts"], 2);
    }

    #[tokio::test]
    async fn profile_mirrored_to_remote_users() {
        let h = TestHarness::new();
        h.seed_profile("Alice");
        h.seed_group().await;

        h.create_single_post("one").await.unwrap();

        let doc = h
            .docs
            .get_document(groupshot_shared::constants::USERS_COLLECTION, h.user_id.as_str())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc["total_posts"], 1);
        assert_eq!(doc["groups_posted"], serde_json::json!([h.group_id.as_str()]));
    }

    #[tokio::test]
    async fn missing_profile_skips_user_step_but_bumps_group() {
        let h = TestHarness::new();
        h.seed_group().await;
        // No profile in the cache.

        h.create_single_post("anon").await.unwrap();

        let doc = h
            .docs
            .get_document(GROUPS_COLLECTION, h.group_id.as_str())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc["total_posts"], 1);
        assert!(h.client.cached_profile().unwrap().is_none());
    }
}
