//! Get/set/remove operations for the singleton [`UserProfile`] record.

use std::collections::HashSet;

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use groupshot_shared::{ActivityEntry, GroupId, UserId, UserProfile};

use crate::cache::ProfileCache;
use crate::error::Result;

impl ProfileCache {
    /// Fetch the cached profile, if one has been stored.
    pub fn get(&self) -> Result<Option<UserProfile>> {
        let row = self
            .conn()
            .query_row(
                "SELECT id, name, groups, groups_posted, total_posts, activity_log
                 FROM profile
                 WHERE slot = 0",
                [],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, i64>(4)?,
                        row.get::<_, String>(5)?,
                    ))
                },
            )
            .optional()?;

        let Some((id, name, groups, groups_posted, total_posts, activity_log)) = row else {
            return Ok(None);
        };

        let groups: HashSet<GroupId> = serde_json::from_str(&groups)?;
        let groups_posted: HashSet<GroupId> = serde_json::from_str(&groups_posted)?;
        let activity_log: Vec<ActivityEntry> = serde_json::from_str(&activity_log)?;

        Ok(Some(UserProfile {
            id: UserId(id),
            name,
            groups,
            groups_posted,
            total_posts: total_posts.max(0) as u64,
            activity_log,
        }))
    }

    /// Store (or replace) the cached profile.
    pub fn set(&self, profile: &UserProfile) -> Result<()> {
        self.conn().execute(
            "INSERT INTO profile (slot, id, name, groups, groups_posted, total_posts, activity_log, updated_at)
             VALUES (0, ?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(slot) DO UPDATE SET
                 id = excluded.id,
                 name = excluded.name,
                 groups = excluded.groups,
                 groups_posted = excluded.groups_posted,
                 total_posts = excluded.total_posts,
                 activity_log = excluded.activity_log,
                 updated_at = excluded.updated_at",
            params![
                profile.id.as_str(),
                profile.name,
                serde_json::to_string(&profile.groups)?,
                serde_json::to_string(&profile.groups_posted)?,
                profile.total_posts as i64,
                serde_json::to_string(&profile.activity_log)?,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Drop the cached profile.  Returns `true` if a record was removed.
    pub fn remove(&self) -> Result<bool> {
        let affected = self.conn().execute("DELETE FROM profile WHERE slot = 0", [])?;
        Ok(affected > 0)
    }
}
