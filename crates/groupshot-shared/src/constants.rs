/// Application name
pub const APP_NAME: &str = "Groupshot";

/// Maximum accepted image size in bytes (5 MiB)
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

/// Content types accepted by the upload pipeline
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Content type assumed when a source declares none
pub const DEFAULT_IMAGE_TYPE: &str = "image/jpeg";

/// Maximum number of activity entries retained per profile
pub const ACTIVITY_LOG_CAP: usize = 50;

/// Group code length bounds (ASCII alphanumeric)
pub const GROUP_CODE_MIN: usize = 3;
pub const GROUP_CODE_MAX: usize = 20;

/// Length of generated group codes
pub const GROUP_CODE_GENERATED_LEN: usize = 6;

/// Remote document-store collection names
pub const POSTS_COLLECTION: &str = "posts";
pub const GROUPS_COLLECTION: &str = "groups";
pub const USERS_COLLECTION: &str = "users";

/// Delay between local-file retrieval attempts, in milliseconds
pub const FILE_RETRY_DELAY_MS: u64 = 300;
