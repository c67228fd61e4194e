//! Media host client (Cloudinary REST).
//!
//! Uploads go to `api.cloudinary.com/v1_1/{cloud}/{kind}/upload` as signed
//! multipart requests; deletes hit the `destroy` endpoint by public ID. Both
//! carry a bounded timeout and one retry, so a hanging media host can delay
//! a product save but never wedge it.
//!
//! Deletion needs the public ID, which is recovered from the delivery URL's
//! `/upload/v123/{folder}/{name}.{ext}` shape. URLs that don't match make
//! delete a logged no-op rather than an error; stale assets are cheaper
//! than failed saves.

use std::time::Duration;

use chrono::Utc;
use secrecy::ExposeSecret;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::MediaConfig;

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Folder all product media lands in.
pub const MEDIA_FOLDER: &str = "echo-ember-products";

/// Per-attempt timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Attempts per call (one retry).
const MAX_ATTEMPTS: u32 = 2;

/// Errors from the media host.
#[derive(Debug, Error)]
pub enum MediaError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("media host error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Kind of asset, mapping to the media host's resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    const fn resource_type(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// Signed client for the media host.
#[derive(Clone)]
pub struct MediaClient {
    http: reqwest::Client,
    config: MediaConfig,
}

impl MediaClient {
    /// Create a client with a bounded per-request timeout.
    #[must_use]
    pub fn new(config: MediaConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self { http, config }
    }

    /// Upload one asset into [`MEDIA_FOLDER`], returning its delivery URL.
    ///
    /// # Errors
    ///
    /// Returns `MediaError` when both attempts fail or the host rejects the
    /// upload.
    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        kind: MediaKind,
    ) -> Result<String, MediaError> {
        let url = format!(
            "{API_BASE}/{}/{}/upload",
            self.config.cloud_name,
            kind.resource_type()
        );

        let mut last_err = None;
        for attempt in 1..=MAX_ATTEMPTS {
            let timestamp = Utc::now().timestamp();
            let signature = self.sign(&format!("folder={MEDIA_FOLDER}&timestamp={timestamp}"));

            let part = reqwest::multipart::Part::bytes(bytes.clone())
                .file_name(filename.to_owned());
            let form = reqwest::multipart::Form::new()
                .part("file", part)
                .text("api_key", self.config.api_key.clone())
                .text("timestamp", timestamp.to_string())
                .text("folder", MEDIA_FOLDER)
                .text("signature_algorithm", "sha256")
                .text("signature", signature);

            match self.send_upload(&url, form).await {
                Ok(delivery_url) => return Ok(delivery_url),
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "media upload attempt failed");
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or(MediaError::Parse("no upload attempt ran".to_owned())))
    }

    async fn send_upload(
        &self,
        url: &str,
        form: reqwest::multipart::Form,
    ) -> Result<String, MediaError> {
        let response = self.http.post(url).multipart(form).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_owned());
            return Err(MediaError::Api { status, message });
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::Parse(e.to_string()))?;

        Ok(parsed.secure_url)
    }

    /// Delete an asset by its delivery URL, best effort.
    ///
    /// A URL the public ID cannot be recovered from is logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns `MediaError` when the destroy call itself fails after retry.
    pub async fn delete(&self, delivery_url: &str, kind: MediaKind) -> Result<(), MediaError> {
        let Some(public_id) = extract_public_id(delivery_url) else {
            tracing::warn!(url = delivery_url, "cannot derive public id; skipping delete");
            return Ok(());
        };

        let url = format!(
            "{API_BASE}/{}/{}/destroy",
            self.config.cloud_name,
            kind.resource_type()
        );

        let mut last_err = None;
        for attempt in 1..=MAX_ATTEMPTS {
            let timestamp = Utc::now().timestamp();
            let signature =
                self.sign(&format!("public_id={public_id}&timestamp={timestamp}"));

            let result = self
                .http
                .post(&url)
                .form(&[
                    ("public_id", public_id.as_str()),
                    ("api_key", &self.config.api_key),
                    ("timestamp", &timestamp.to_string()),
                    ("signature_algorithm", "sha256"),
                    ("signature", &signature),
                ])
                .send()
                .await;

            match result {
                Ok(response) if response.status().is_success() => return Ok(()),
                Ok(response) => {
                    let status = response.status().as_u16();
                    let message = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "<unreadable body>".to_owned());
                    last_err = Some(MediaError::Api { status, message });
                }
                Err(e) => last_err = Some(MediaError::Http(e)),
            }
            tracing::warn!(attempt, %public_id, "media delete attempt failed");
        }

        Err(last_err.unwrap_or(MediaError::Parse("no delete attempt ran".to_owned())))
    }

    /// SHA-256 request signature: sorted params, then the API secret.
    fn sign(&self, params: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(params.as_bytes());
        hasher.update(self.config.api_secret.expose_secret().as_bytes());
        hex_encode(&hasher.finalize())
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;

    bytes.iter().fold(String::new(), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

/// Recover the public ID from a delivery URL.
///
/// Expects `…/upload/v{digits}/{folder…}/{name}.{ext}`; the public ID is
/// everything after the version segment, extension stripped.
#[must_use]
pub fn extract_public_id(url: &str) -> Option<String> {
    let (_, tail) = url.split_once("/upload/")?;

    let mut segments = tail.split('/');
    let version = segments.next()?;
    if !version.starts_with('v') || !version[1..].chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let rest: Vec<&str> = segments.collect();
    if rest.is_empty() || rest.iter().any(|s| s.is_empty()) {
        return None;
    }

    let joined = rest.join("/");
    let public_id = joined
        .rsplit_once('.')
        .map_or(joined.as_str(), |(stem, _)| stem)
        .to_owned();

    if public_id.is_empty() {
        return None;
    }
    Some(public_id)
}

/// Assets to remove: persisted URLs the client's kept set no longer names.
///
/// Order-preserving over `persisted`. When `kept == persisted` the result
/// is empty, which keeps unchanged saves free of media calls.
#[must_use]
pub fn assets_to_delete(persisted: &[String], kept: &[String]) -> Vec<String> {
    persisted
        .iter()
        .filter(|url| !kept.contains(url))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_folder_qualified_public_id() {
        let url = "https://res.cloudinary.com/echo/image/upload/v1712345678/echo-ember-products/bow-red.jpg";
        assert_eq!(
            extract_public_id(url).as_deref(),
            Some("echo-ember-products/bow-red")
        );
    }

    #[test]
    fn extracts_nested_folders_and_keeps_inner_dots() {
        let url = "https://res.cloudinary.com/echo/video/upload/v99/a/b/clip.v2.mp4";
        assert_eq!(extract_public_id(url).as_deref(), Some("a/b/clip.v2"));
    }

    #[test]
    fn rejects_malformed_urls() {
        assert_eq!(extract_public_id("https://example.com/foo.jpg"), None);
        assert_eq!(
            extract_public_id("https://res.cloudinary.com/echo/image/upload/nope/x.jpg"),
            None
        );
        assert_eq!(
            extract_public_id("https://res.cloudinary.com/echo/image/upload/v123/"),
            None
        );
    }

    #[test]
    fn diff_removes_only_dropped_assets() {
        let persisted = vec!["a".to_owned(), "b".to_owned(), "c".to_owned()];
        let kept = vec!["c".to_owned(), "a".to_owned()];
        assert_eq!(assets_to_delete(&persisted, &kept), vec!["b".to_owned()]);
    }

    #[test]
    fn diff_is_empty_when_kept_matches_persisted() {
        let persisted = vec!["a".to_owned(), "b".to_owned()];
        assert!(assets_to_delete(&persisted, &persisted.clone()).is_empty());
    }

    #[test]
    fn diff_ignores_unknown_kept_entries() {
        let persisted = vec!["a".to_owned()];
        let kept = vec!["a".to_owned(), "new-upload".to_owned()];
        assert!(assets_to_delete(&persisted, &kept).is_empty());
    }
}
