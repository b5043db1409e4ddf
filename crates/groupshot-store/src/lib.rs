//! # groupshot-store
//!
//! Durable local storage for the current device's user profile, backed by
//! SQLite.  The cache holds exactly one profile record and survives process
//! restarts; it is the source of truth for the feed unlock predicate.
//!
//! Access goes through the narrow [`ProfileCache`] contract: `get`, `set`,
//! `remove`.  There is no multi-writer concurrency control -- concurrent
//! writers are last-write-wins by design.

pub mod cache;
pub mod migrations;
pub mod profile;

mod error;

pub use cache::ProfileCache;
pub use error::StoreError;
