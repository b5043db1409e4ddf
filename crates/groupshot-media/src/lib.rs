//! # groupshot-media
//!
//! The media upload pipeline: resolves a captured image reference into raw
//! bytes, validates them, and writes them to remote blob storage, producing
//! the [`ImageDescriptor`] consumed by the post composer.
//!
//! Image references arrive in three forms -- embedded `data:` URIs, local
//! device file paths, and remote HTTP(S) resources.  Local files are the
//! least reliable source on mobile camera pipelines, so their resolution
//! runs a fallback ladder of progressively simpler retrieval strategies.
//!
//! [`ImageDescriptor`]: groupshot_shared::ImageDescriptor

pub mod source;
pub mod upload;

mod error;

pub use error::UploadError;
pub use upload::ImageUploader;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, UploadError>;
