use thiserror::Error;

use crate::constants::{GROUP_CODE_MAX, GROUP_CODE_MIN};

/// Rejections produced while parsing caller input into shared types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("group code must be {GROUP_CODE_MIN}-{GROUP_CODE_MAX} characters, got {0}")]
    GroupCodeLength(usize),

    #[error("group code must be ASCII alphanumeric")]
    GroupCodeCharset,

    #[error("required field '{0}' is empty")]
    EmptyField(&'static str),
}
