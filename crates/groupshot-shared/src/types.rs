use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{GROUP_CODE_MAX, GROUP_CODE_MIN};
use crate::error::ValidationError;

// User identity = opaque stable string, generated once at account creation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn short(&self) -> String {
        self.0.chars().take(8).collect()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A group's shareable code.  The canonical form is uppercase alphanumeric
/// and doubles as the group's document key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    /// Parse and canonicalize a group code.
    ///
    /// Codes are 3-20 ASCII alphanumeric characters; anything else is
    /// rejected so a mistyped code never becomes a document key.
    pub fn parse(code: &str) -> Result<Self, ValidationError> {
        let trimmed = code.trim();
        if trimmed.len() < GROUP_CODE_MIN || trimmed.len() > GROUP_CODE_MAX {
            return Err(ValidationError::GroupCodeLength(trimmed.len()));
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ValidationError::GroupCodeCharset);
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PostId(pub String);

impl PostId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which camera an uploaded image came from.
///
/// Stored as a string tag in blob metadata and in the storage filename, so
/// the variants are closed and round-trip through [`ImageType::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageType {
    Main,
    Front,
    Composite,
}

impl ImageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Front => "front",
            Self::Composite => "composite",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "main" => Some(Self::Main),
            "front" => Some(Self::Front),
            "composite" => Some(Self::Composite),
            _ => None,
        }
    }
}

/// Whether a post carries one image or a paired back/front capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostKind {
    SingleCamera,
    DualCamera,
}
