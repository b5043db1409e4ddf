//! # groupshot-client
//!
//! The core client surface behind the Groupshot screens: dual-image post
//! creation, the post feed gateway, group/user statistics synchronization
//! and the feed unlock predicate.
//!
//! Screens construct one [`GroupshotClient`] from the remote collaborators
//! and the local profile cache and call into it; everything above this crate
//! is rendering and navigation.

pub mod client;
pub mod composer;
pub mod engagement;
pub mod groups;
pub mod logging;
pub mod posts;
pub mod stats;
pub mod unlock;

mod error;

#[cfg(test)]
mod testutil;

pub use client::GroupshotClient;
pub use composer::NewPost;
pub use error::ClientError;
pub use stats::StatsSynchronizer;
pub use unlock::{feed_access, is_unlocked, FeedAccess};
