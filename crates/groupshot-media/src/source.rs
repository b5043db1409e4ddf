//! Image reference resolution.
//!
//! Dispatches on the reference's URI-scheme-like prefix: `data:` content is
//! decoded inline, `http(s)://` resources are fetched with one GET, and
//! anything else is treated as a local device file and resolved through the
//! fallback ladder.

use std::path::PathBuf;
use std::time::Duration;

use base64::Engine;
use percent_encoding::percent_decode_str;

use groupshot_shared::constants::FILE_RETRY_DELAY_MS;

use crate::error::UploadError;
use crate::Result;

/// Raw bytes plus whatever content type the source declared.
#[derive(Debug, Clone)]
pub struct ResolvedImage {
    pub bytes: Vec<u8>,
    pub declared_type: Option<String>,
}

/// Resolve an image reference into raw bytes.
pub async fn resolve(image_ref: &str) -> Result<ResolvedImage> {
    if image_ref.starts_with("data:") {
        resolve_data_uri(image_ref)
    } else if image_ref.starts_with("http://") || image_ref.starts_with("https://") {
        resolve_http(image_ref).await
    } else {
        resolve_file(image_ref).await
    }
}

/// Decode a `data:[<mediatype>][;base64],<payload>` URI.
fn resolve_data_uri(image_ref: &str) -> Result<ResolvedImage> {
    let rest = &image_ref["data:".len()..];
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| UploadError::BadReference("data URI has no payload".into()))?;

    let declared_type = header
        .split(';')
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let bytes = if header.ends_with(";base64") {
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| UploadError::BadReference(format!("invalid base64 payload: {e}")))?
    } else {
        payload.as_bytes().to_vec()
    };

    Ok(ResolvedImage {
        bytes,
        declared_type,
    })
}

/// Fetch a remote image with a single GET.
async fn resolve_http(url: &str) -> Result<ResolvedImage> {
    let resp = reqwest::get(url)
        .await
        .map_err(|e| UploadError::Fetch(e.to_string()))?;

    if !resp.status().is_success() {
        return Err(UploadError::Fetch(format!(
            "HTTP {} fetching {url}",
            resp.status()
        )));
    }

    let declared_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.split(';').next().unwrap_or(s).trim().to_string());

    let bytes = resp
        .bytes()
        .await
        .map_err(|e| UploadError::Fetch(e.to_string()))?;

    Ok(ResolvedImage {
        bytes: bytes.to_vec(),
        declared_type,
    })
}

/// Candidate paths for a local file reference, simplest transformation last.
fn file_candidates(image_ref: &str) -> Vec<(&'static str, PathBuf)> {
    let stripped = image_ref.strip_prefix("file://").unwrap_or(image_ref);
    let mut candidates = vec![
        ("stripped", PathBuf::from(stripped)),
        ("raw", PathBuf::from(image_ref)),
    ];
    if let Ok(decoded) = percent_decode_str(stripped).decode_utf8() {
        if decoded != stripped {
            candidates.push(("percent-decoded", PathBuf::from(decoded.into_owned())));
        }
    }
    candidates
}

/// Resolve a local device file through the fallback ladder.
///
/// Each strategy is tried in order with a short delay between attempts; the
/// first non-empty read wins.  Camera pipelines hand out paths that may not
/// be immediately readable, hence the delay rather than an immediate sweep.
async fn resolve_file(image_ref: &str) -> Result<ResolvedImage> {
    let candidates = file_candidates(image_ref);
    let last = candidates.len() - 1;

    for (i, (strategy, path)) in candidates.into_iter().enumerate() {
        match tokio::fs::read(&path).await {
            Ok(bytes) if !bytes.is_empty() => {
                tracing::debug!(strategy, path = %path.display(), size = bytes.len(), "file resolved");
                return Ok(ResolvedImage {
                    bytes,
                    declared_type: None,
                });
            }
            Ok(_) => {
                tracing::warn!(strategy, path = %path.display(), "file read returned no bytes");
            }
            Err(e) => {
                tracing::debug!(strategy, path = %path.display(), error = %e, "file read failed");
            }
        }
        if i < last {
            tokio::time::sleep(Duration::from_millis(FILE_RETRY_DELAY_MS)).await;
        }
    }

    Err(UploadError::ExhaustedStrategies)
}
