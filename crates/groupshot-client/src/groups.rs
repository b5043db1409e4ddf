//! Group lifecycle operations: create, join, fetch.
//!
//! Counters on the group document (`member_count`, `total_posts`) are
//! maintained by increments here and in the statistics synchronizer; they
//! are never recomputed from the underlying sets.

use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};

use groupshot_remote::FieldOp;
use groupshot_shared::constants::{GROUP_CODE_GENERATED_LEN, GROUPS_COLLECTION};
use groupshot_shared::{ActivityKind, Group, GroupId, UserId};

use crate::client::GroupshotClient;
use crate::error::ClientError;

/// Attempts before giving up on finding an unused group code.
const CODE_ATTEMPTS: usize = 5;

impl GroupshotClient {
    /// Fetch a group by code.  Absence is `Ok(None)`.
    pub async fn get_group(&self, group_id: &GroupId) -> Result<Option<Group>, ClientError> {
        let doc = self
            .docs
            .get_document(GROUPS_COLLECTION, group_id.as_str())
            .await
            .map_err(|e| ClientError::Remote(e.to_string()))?;

        match doc {
            None => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| ClientError::Remote(format!("undecodable group document: {e}"))),
        }
    }

    /// Create a new group with a generated shareable code.
    ///
    /// The creator becomes the first member.  The local profile's `groups`
    /// set is updated best-effort afterwards.
    pub async fn create_group(
        &self,
        name: &str,
        creator_id: &UserId,
    ) -> Result<Group, ClientError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClientError::Validation(
                groupshot_shared::ValidationError::EmptyField("name"),
            ));
        }

        let group_id = self.unused_code().await?;
        let now = Utc::now();
        let group = Group {
            id: group_id.clone(),
            name: name.to_string(),
            members: [creator_id.clone()].into_iter().collect(),
            member_count: 1,
            total_posts: 0,
            created_by: creator_id.clone(),
            created_at: now,
            last_activity: now,
        };

        let value = serde_json::to_value(&group)
            .map_err(|e| ClientError::Remote(e.to_string()))?;
        self.docs
            .set_document(GROUPS_COLLECTION, group_id.as_str(), value)
            .await
            .map_err(|e| ClientError::Remote(e.to_string()))?;

        info!(group = %group_id, name, "group created");

        self.track_group_locally(&group_id, ActivityKind::GroupCreated);
        Ok(group)
    }

    /// Join an existing group.
    ///
    /// Membership is an array-union so a double join cannot double-count;
    /// `member_count` tracks it by increment and can therefore drift on a
    /// repeated join, matching the denormalized-mirror contract.
    pub async fn join_group(
        &self,
        group_id: &GroupId,
        user_id: &UserId,
    ) -> Result<Group, ClientError> {
        self.docs
            .update_document(
                GROUPS_COLLECTION,
                group_id.as_str(),
                vec![
                    (
                        "members".into(),
                        FieldOp::ArrayUnion(vec![json!(user_id.as_str())]),
                    ),
                    ("member_count".into(), FieldOp::Increment(1)),
                    (
                        "last_activity".into(),
                        FieldOp::Set(json!(Utc::now().to_rfc3339())),
                    ),
                ],
            )
            .await
            .map_err(|e| match e {
                groupshot_remote::RemoteError::NotFound(_) => {
                    ClientError::NotFound(format!("group {group_id}"))
                }
                other => ClientError::Remote(other.to_string()),
            })?;

        info!(group = %group_id, user = %user_id, "joined group");

        self.track_group_locally(group_id, ActivityKind::JoinedGroup);

        self.get_group(group_id)
            .await?
            .ok_or_else(|| ClientError::NotFound(format!("group {group_id}")))
    }

    /// Best-effort local profile update after a group mutation.
    fn track_group_locally(&self, group_id: &GroupId, kind: ActivityKind) {
        let result = (|| -> Result<(), ClientError> {
            let cache = self.profile.lock().map_err(|_| ClientError::CachePoisoned)?;
            let Some(mut profile) = cache.get()? else {
                return Ok(());
            };
            profile.groups.insert(group_id.clone());
            profile.record_activity(kind, json!({ "group_id": group_id.as_str() }));
            cache.set(&profile)?;
            Ok(())
        })();

        if let Err(e) = result {
            warn!(group = %group_id, error = %e, "local group tracking failed");
        }
    }

    /// Generate a code not currently in use.
    async fn unused_code(&self) -> Result<GroupId, ClientError> {
        for _ in 0..CODE_ATTEMPTS {
            let candidate = random_code();
            let taken = self
                .docs
                .get_document(GROUPS_COLLECTION, candidate.as_str())
                .await
                .map_err(|e| ClientError::Remote(e.to_string()))?
                .is_some();
            if !taken {
                return Ok(candidate);
            }
        }
        Err(ClientError::Remote("could not find an unused group code".into()))
    }
}

/// Random shareable code, uppercase alphanumeric.
fn random_code() -> GroupId {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
    let mut rng = rand::thread_rng();
    let code: String = (0..GROUP_CODE_GENERATED_LEN)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();
    GroupId::parse(&code).expect("generated code is always valid")
}

#[cfg(test)]
mod tests {
    use crate::testutil::TestHarness;
    use groupshot_shared::constants::GROUP_CODE_GENERATED_LEN;
    use groupshot_shared::{ActivityKind, UserId};

    #[tokio::test]
    async fn create_group_makes_creator_first_member() {
        let h = TestHarness::new();
        h.seed_profile("Alice");

        let group = h.client.create_group("Beach Trip", &h.user_id).await.unwrap();

        assert_eq!(group.id.as_str().len(), GROUP_CODE_GENERATED_LEN);
        assert!(group.members.contains(&h.user_id));
        assert_eq!(group.member_count, 1);
        assert_eq!(group.total_posts, 0);

        let fetched = h.client.get_group(&group.id).await.unwrap().unwrap();
        assert_eq!(fetched, group);

        // Local profile tracks the new group.
        let profile = h.client.cached_profile().unwrap().unwrap();
        assert!(profile.groups.contains(&group.id));
        assert!(profile
            .activity_log
            .iter()
            .any(|a| a.kind == ActivityKind::GroupCreated));
    }

    #[tokio::test]
    async fn join_group_unions_member_and_bumps_count() {
        let h = TestHarness::new();
        h.seed_profile("Alice");
        let group = h.client.create_group("Beach Trip", &h.user_id).await.unwrap();

        let bob = UserId("bob".into());
        let joined = h.client.join_group(&group.id, &bob).await.unwrap();
        assert!(joined.members.contains(&bob));
        assert_eq!(joined.member_count, 2);

        // Rejoining does not duplicate membership.
        let rejoined = h.client.join_group(&group.id, &bob).await.unwrap();
        assert_eq!(rejoined.members.len(), 2);
    }

    #[tokio::test]
    async fn join_missing_group_is_not_found() {
        let h = TestHarness::new();
        let missing = groupshot_shared::GroupId::parse("nosuch").unwrap();
        let err = h.client.join_group(&missing, &h.user_id).await.unwrap_err();
        assert!(matches!(err, crate::ClientError::NotFound(_)));
    }

    #[tokio::test]
    async fn get_missing_group_is_none() {
        let h = TestHarness::new();
        let missing = groupshot_shared::GroupId::parse("nosuch").unwrap();
        assert!(h.client.get_group(&missing).await.unwrap().is_none());
    }
}
