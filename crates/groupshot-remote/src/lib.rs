//! # groupshot-remote
//!
//! Seams for the two hosted collaborators the core rides on: a
//! collection-style document store and a blob store.  Both are opaque to the
//! rest of the workspace; callers program against the [`DocumentStore`] and
//! [`BlobStore`] traits.
//!
//! Two implementations ship for each trait: an HTTP client for the hosted
//! backend and an in-memory one used by tests and local development.

pub mod blob;
pub mod document;
pub mod http;
pub mod memory;

mod error;

pub use blob::{BlobMetadata, BlobStore};
pub use document::{DocumentStore, FieldOp, Filter, OrderBy};
pub use error::RemoteError;
pub use http::{HttpBlobStore, HttpDocumentStore};
pub use memory::{MemoryBlobStore, MemoryDocumentStore};

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RemoteError>;
