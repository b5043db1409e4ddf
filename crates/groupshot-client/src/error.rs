use thiserror::Error;

use groupshot_media::UploadError;
use groupshot_shared::ValidationError;
use groupshot_store::StoreError;

/// Errors surfaced by the client core.
///
/// The `Display` strings are user-facing: an upload failure tells the user
/// to retry capturing, a store-write failure tells them to retry submitting.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Bad caller input.  Terminal, no retry.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Media pipeline failure.  Terminal for the current post attempt.
    #[error("image upload failed: {0}")]
    Upload(#[from] UploadError),

    /// Post persistence failure: nothing was saved, resubmit is safe.
    #[error("could not save post: {0}")]
    StoreWrite(String),

    /// Secondary bookkeeping failure.  Never propagated past `create_post`.
    #[error("statistics update failed: {0}")]
    Stats(String),

    /// Local profile cache failure.
    #[error("profile cache error: {0}")]
    Cache(#[from] StoreError),

    /// The profile cache mutex was poisoned by a panicking writer.
    #[error("profile cache lock poisoned")]
    CachePoisoned,

    /// Remote document operation failure outside the post write path.
    #[error("remote store error: {0}")]
    Remote(String),

    /// A referenced document does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}
