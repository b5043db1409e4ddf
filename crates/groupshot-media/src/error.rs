use thiserror::Error;

/// Errors produced by the media upload pipeline.
///
/// All of these are terminal for the current post attempt; the pipeline
/// never retries past the file-resolution ladder.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("required field '{0}' is empty")]
    EmptyField(&'static str),

    #[error("unsupported image reference: {0}")]
    BadReference(String),

    #[error("failed to fetch image: {0}")]
    Fetch(String),

    #[error("exhausted retrieval strategies for local file")]
    ExhaustedStrategies,

    #[error("resolved image is empty")]
    EmptyImage,

    #[error("image is {size} bytes, exceeds maximum of {max}")]
    TooLarge { size: usize, max: usize },

    #[error("content type '{0}' is not an allowed image type")]
    UnsupportedType(String),

    #[error("blob storage error: {0}")]
    Storage(String),

    #[error("blob store returned no download URL")]
    NoDownloadUrl,
}

impl From<groupshot_remote::RemoteError> for UploadError {
    fn from(err: groupshot_remote::RemoteError) -> Self {
        // Transport-layer causes (unauthorized, canceled, retry exhaustion)
        // collapse into one human-readable storage failure.
        Self::Storage(err.to_string())
    }
}
