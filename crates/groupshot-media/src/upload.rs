//! Validation, storage-path generation and the upload itself.

use std::sync::Arc;

use chrono::Utc;

use groupshot_remote::{BlobMetadata, BlobStore};
use groupshot_shared::constants::{ALLOWED_IMAGE_TYPES, DEFAULT_IMAGE_TYPE, MAX_IMAGE_SIZE};
use groupshot_shared::{GroupId, ImageDescriptor, ImageType, UserId};

use crate::error::UploadError;
use crate::source::{self, ResolvedImage};
use crate::Result;

/// Uploads captured images to remote blob storage.
pub struct ImageUploader {
    blobs: Arc<dyn BlobStore>,
}

impl ImageUploader {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    /// Upload one image and return its descriptor.
    ///
    /// Fails fast on empty inputs, resolves the reference into bytes,
    /// validates size and declared content type, then writes the blob and
    /// resolves its durable retrieval URL.  Transport errors surface once;
    /// nothing here retries beyond the file-resolution ladder.
    pub async fn upload(
        &self,
        image_ref: &str,
        group_id: &GroupId,
        user_id: &UserId,
        image_type: ImageType,
    ) -> Result<ImageDescriptor> {
        if image_ref.trim().is_empty() {
            return Err(UploadError::EmptyField("image_ref"));
        }
        if user_id.as_str().trim().is_empty() {
            return Err(UploadError::EmptyField("user_id"));
        }

        let resolved = source::resolve(image_ref).await?;
        let content_type = validate_image(&resolved)?;

        let filename = unique_filename(user_id, image_type, &content_type);
        let path = format!("groups/{}/photos/{}", group_id, filename);

        let metadata = BlobMetadata {
            content_type: content_type.clone(),
            group_id: group_id.clone(),
            user_id: user_id.clone(),
            image_type,
            uploaded_at: Utc::now(),
        };

        self.blobs.put(&path, &resolved.bytes, metadata).await?;

        let download_url = self.blobs.download_url(&path).await?;
        if download_url.is_empty() {
            return Err(UploadError::NoDownloadUrl);
        }

        tracing::info!(
            path = %path,
            size = resolved.bytes.len(),
            image_type = image_type.as_str(),
            "image uploaded"
        );

        Ok(ImageDescriptor {
            download_url,
            path,
            size: resolved.bytes.len() as u64,
            filename,
            content_type,
            image_type,
        })
    }
}

/// Validate resolved bytes and settle the content type.
///
/// An absent declared type is tolerated (mobile camera rolls rarely set
/// one) and defaults to JPEG; a declared non-image type is fatal.
fn validate_image(resolved: &ResolvedImage) -> Result<String> {
    if resolved.bytes.is_empty() {
        return Err(UploadError::EmptyImage);
    }
    if resolved.bytes.len() > MAX_IMAGE_SIZE {
        return Err(UploadError::TooLarge {
            size: resolved.bytes.len(),
            max: MAX_IMAGE_SIZE,
        });
    }
    match resolved.declared_type.as_deref() {
        Some(ty) if ALLOWED_IMAGE_TYPES.contains(&ty) => Ok(ty.to_string()),
        Some(ty) => Err(UploadError::UnsupportedType(ty.to_string())),
        None => Ok(DEFAULT_IMAGE_TYPE.to_string()),
    }
}

/// Globally-unique storage filename: owner, timestamp, camera tag and a
/// random suffix so two captures in the same millisecond cannot collide.
fn unique_filename(user_id: &UserId, image_type: ImageType, content_type: &str) -> String {
    let ext = match content_type {
        "image/png" => "png",
        "image/webp" => "webp",
        _ => "jpg",
    };
    let suffix = hex::encode(rand::random::<[u8; 4]>());
    format!(
        "{}_{}_{}_{}.{}",
        user_id,
        Utc::now().timestamp_millis(),
        image_type.as_str(),
        suffix,
        ext
    )
}
