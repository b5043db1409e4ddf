//! Domain model structs exchanged between the pipeline, the remote store and
//! the local profile cache.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to the UI layer and mirrored into the remote document store.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::ACTIVITY_LOG_CAP;
use crate::types::{GroupId, ImageType, PostId, PostKind, UserId};

// ---------------------------------------------------------------------------
// User profile
// ---------------------------------------------------------------------------

/// The current device's user profile.
///
/// `groups` (formal membership) and `groups_posted` (posting history) are
/// independent sets: a user may post in a group they never formally joined,
/// so neither set is validated against the other.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    /// Opaque stable identifier, generated once at account creation.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Groups the user belongs to.
    pub groups: HashSet<GroupId>,
    /// Groups in which the user has successfully created at least one post.
    /// This set is the unlock predicate's source of truth.
    pub groups_posted: HashSet<GroupId>,
    /// Incremented exactly once per successful post; never decremented.
    pub total_posts: u64,
    /// Bounded recent-activity trail.  Observational only, never read for
    /// correctness.
    pub activity_log: Vec<ActivityEntry>,
}

impl UserProfile {
    /// Create a fresh profile with a generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: UserId::generate(),
            name: name.into(),
            groups: HashSet::new(),
            groups_posted: HashSet::new(),
            total_posts: 0,
            activity_log: Vec::new(),
        }
    }

    /// Append an activity entry, evicting the oldest entries beyond the cap.
    pub fn record_activity(&mut self, kind: ActivityKind, data: serde_json::Value) {
        self.activity_log.push(ActivityEntry {
            kind,
            timestamp: Utc::now(),
            data,
        });
        if self.activity_log.len() > ACTIVITY_LOG_CAP {
            let excess = self.activity_log.len() - ACTIVITY_LOG_CAP;
            self.activity_log.drain(..excess);
        }
    }
}

/// One entry in a profile's activity trail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityEntry {
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub timestamp: DateTime<Utc>,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    FirstPostInGroup,
    PostedInGroup,
    JoinedGroup,
    GroupCreated,
}

// ---------------------------------------------------------------------------
// Group
// ---------------------------------------------------------------------------

/// A group sharing a photo feed, keyed by its shareable code.
///
/// `member_count` and `total_posts` are denormalized mirrors maintained via
/// increments, never recomputed from `members` or the post collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub members: HashSet<UserId>,
    pub member_count: u64,
    pub total_posts: u64,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    /// Timestamp of the most recent mutation.
    pub last_activity: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Post
// ---------------------------------------------------------------------------

/// Storage references for one uploaded image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageRefs {
    pub url: String,
    pub path: String,
    pub size: u64,
}

/// A caption plus one or two images, attributed to an author and a group.
///
/// Author name is denormalized at write time and never re-fetched for
/// display.  Posts are immutable after creation apart from like toggles and
/// comment appends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub author_name: String,
    pub group_id: GroupId,
    pub caption: String,
    /// Primary ("back camera") image.
    pub image: ImageRefs,
    /// Optional secondary ("front camera") image.
    pub front_image: Option<ImageRefs>,
    pub kind: PostKind,
    pub likes: HashSet<UserId>,
    pub comments: Vec<Comment>,
    /// Feed ordering key (descending).
    pub created_at: DateTime<Utc>,
}

/// A comment appended to a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: String,
    pub user_id: UserId,
    pub user_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Image descriptor
// ---------------------------------------------------------------------------

/// The metadata record returned after a successful blob upload.  Ephemeral:
/// produced by the media pipeline, consumed by the post composer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub download_url: String,
    pub path: String,
    pub size: u64,
    pub filename: String,
    pub content_type: String,
    pub image_type: ImageType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_log_caps_at_fifty() {
        let mut profile = UserProfile::new("alice");
        for i in 0..60u32 {
            profile.record_activity(ActivityKind::PostedInGroup, serde_json::json!({ "n": i }));
        }
        assert_eq!(profile.activity_log.len(), ACTIVITY_LOG_CAP);
        // Oldest entries evicted: the first surviving entry is #10.
        assert_eq!(profile.activity_log[0].data["n"], 10);
        assert_eq!(profile.activity_log.last().unwrap().data["n"], 59);
    }

    #[test]
    fn membership_and_posting_history_independent() {
        let mut profile = UserProfile::new("bob");
        let group = GroupId::parse("beach24").unwrap();
        profile.groups_posted.insert(group.clone());
        // Posting without joining is allowed; nothing back-fills `groups`.
        assert!(!profile.groups.contains(&group));
    }
}
