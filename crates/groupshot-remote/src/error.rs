use thiserror::Error;

/// Errors surfaced by the remote collaborators.
///
/// `PermissionDenied` is its own variant because the statistics path treats
/// it as non-fatal while other failures propagate.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RemoteError {
    /// Whether this failure is a permission rejection (swallowed by the
    /// statistics synchronizer for group counter updates).
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied)
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
