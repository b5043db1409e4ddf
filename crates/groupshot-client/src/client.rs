//! Client construction and shared state.

use std::sync::{Arc, Mutex};

use groupshot_media::ImageUploader;
use groupshot_remote::{BlobStore, DocumentStore};
use groupshot_shared::UserProfile;
use groupshot_store::ProfileCache;

use crate::error::ClientError;
use crate::stats::StatsSynchronizer;

/// The core client behind every Groupshot screen.
///
/// Holds the remote collaborators, the media pipeline and the local profile
/// cache.  The cache mutex is a coarse single-process lock; concurrent
/// writers are last-write-wins and no per-user serialization exists for
/// `create_post` (see the statistics module).
pub struct GroupshotClient {
    pub(crate) docs: Arc<dyn DocumentStore>,
    pub(crate) blobs: Arc<dyn BlobStore>,
    pub(crate) uploader: ImageUploader,
    pub(crate) stats: StatsSynchronizer,
    pub(crate) profile: Arc<Mutex<ProfileCache>>,
}

impl GroupshotClient {
    pub fn new(
        docs: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        profile: Arc<Mutex<ProfileCache>>,
    ) -> Self {
        Self {
            uploader: ImageUploader::new(blobs.clone()),
            stats: StatsSynchronizer::new(docs.clone(), profile.clone()),
            docs,
            blobs,
            profile,
        }
    }

    /// Read the cached profile.
    pub fn cached_profile(&self) -> Result<Option<UserProfile>, ClientError> {
        let cache = self.profile.lock().map_err(|_| ClientError::CachePoisoned)?;
        Ok(cache.get()?)
    }
}
