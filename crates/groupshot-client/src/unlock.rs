//! Feed unlock evaluation.
//!
//! Pure decision logic: a group's feed unlocks for a user once they have
//! posted in that group, and never re-locks.  The screen still fetches the
//! post list either way; a locked feed renders as a non-interactive preview,
//! so the evaluator only decides the boolean gate and never filters posts.

use groupshot_shared::{GroupId, UserProfile};

/// What the feed screen may do with a group's post list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedAccess {
    /// Full feed: scrolling and interaction enabled.
    Unlocked,
    /// Preview only: posts visible behind the post-to-unlock prompt.
    Preview,
}

/// Whether the user has unlocked this group's feed.
pub fn is_unlocked(profile: &UserProfile, group_id: &GroupId) -> bool {
    profile.groups_posted.contains(group_id)
}

/// Access level for rendering a group feed.
pub fn feed_access(profile: &UserProfile, group_id: &GroupId) -> FeedAccess {
    if is_unlocked(profile, group_id) {
        FeedAccess::Unlocked
    } else {
        FeedAccess::Preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(code: &str) -> GroupId {
        GroupId::parse(code).unwrap()
    }

    #[test]
    fn locked_until_posted() {
        let mut profile = UserProfile::new("alice");
        let beach = group("beach24");

        assert!(!is_unlocked(&profile, &beach));
        assert_eq!(feed_access(&profile, &beach), FeedAccess::Preview);

        profile.groups_posted.insert(beach.clone());
        assert!(is_unlocked(&profile, &beach));
        assert_eq!(feed_access(&profile, &beach), FeedAccess::Unlocked);
    }

    #[test]
    fn unlock_is_per_group() {
        let mut profile = UserProfile::new("alice");
        profile.groups_posted.insert(group("beach24"));

        assert!(is_unlocked(&profile, &group("beach24")));
        assert!(!is_unlocked(&profile, &group("ski26")));
    }

    #[test]
    fn membership_alone_does_not_unlock() {
        let mut profile = UserProfile::new("alice");
        profile.groups.insert(group("beach24"));

        assert!(!is_unlocked(&profile, &group("beach24")));
    }
}
