//! # groupshot-shared
//!
//! Identifiers, domain models and constants shared by every Groupshot crate.
//!
//! Nothing in here does I/O: these are the value types that flow between the
//! media pipeline, the remote collaborators and the local profile cache.

pub mod constants;
pub mod models;
pub mod types;

mod error;

pub use error::ValidationError;
pub use models::*;
pub use types::{GroupId, ImageType, PostId, PostKind, UserId};
