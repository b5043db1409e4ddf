//! Cache connection management.
//!
//! The [`ProfileCache`] struct owns a [`rusqlite::Connection`] and guarantees
//! that migrations are run before any other operation.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use rusqlite::Connection;

use crate::error::{Result, StoreError};
use crate::migrations;

/// Wrapper around a [`rusqlite::Connection`] holding the device profile.
pub struct ProfileCache {
    conn: Connection,
}

impl ProfileCache {
    /// Open (or create) the default application cache.
    ///
    /// The database file is placed in the platform-appropriate data directory:
    /// - Linux:   `~/.local/share/groupshot/groupshot.db`
    /// - macOS:   `~/Library/Application Support/com.groupshot.groupshot/groupshot.db`
    /// - Windows: `{FOLDERID_RoamingAppData}\groupshot\groupshot\data\groupshot.db`
    pub fn new() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("com", "groupshot", "groupshot").ok_or(StoreError::NoDataDir)?;

        let data_dir = project_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        let db_path = data_dir.join("groupshot.db");

        tracing::info!(path = %db_path.display(), "opening profile cache");

        Self::open_at(&db_path)
    }

    /// Open (or create) a cache at an explicit path.
    ///
    /// This is useful for tests and for embedding the cache inside custom
    /// directory layouts.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // Recommended SQLite settings.
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        // Run schema migrations.
        migrations::run_migrations(&conn)?;

        Ok(Self { conn })
    }

    /// Return a reference to the underlying `rusqlite::Connection`.
    ///
    /// Callers should prefer the typed profile helpers, but direct access is
    /// occasionally needed for ad-hoc queries.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Return the filesystem path of the open cache (if any).
    pub fn path(&self) -> Option<PathBuf> {
        self.conn.path().map(PathBuf::from)
    }
}
