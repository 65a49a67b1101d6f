//! Local filesystem blob store for uploaded photos and files.
//!
//! Objects live flat under one directory and are served back under a
//! public URL prefix (`/uploads` by default). Names are a UUIDv7 followed
//! by the sanitised original file name, so uploads sort by time.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::IntegrationError;

/// Public URL prefix used when none is configured.
pub const DEFAULT_PUBLIC_BASE: &str = "/uploads";

/// Longest kept tail of the original file name.
const MAX_NAME_LEN: usize = 80;

/// A blob that was just written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredBlob {
    /// Public URL of the object.
    pub url: String,
    /// Object name inside the store.
    pub filename: String,
    /// Where the object lives on disk.
    #[serde(skip)]
    pub path: PathBuf,
}

/// Blob store backed by a local directory.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    public_base: String,
}

/// Keep ASCII alphanumerics, dots, dashes and underscores.
fn sanitize_name(original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or(original);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    let skip = trimmed.chars().count().saturating_sub(MAX_NAME_LEN);
    let tail: String = trimmed.chars().skip(skip).collect();
    if tail.is_empty() {
        "file".to_owned()
    } else {
        tail
    }
}

/// A key is a single path segment with no traversal.
fn is_safe_key(key: &str) -> bool {
    !key.is_empty()
        && !key.contains(['/', '\\'])
        && !key.contains("..")
        && !key.starts_with('.')
}

impl LocalBlobStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub async fn open(
        root: impl Into<PathBuf>,
        public_base: &str,
    ) -> Result<Self, IntegrationError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        let base = public_base.trim().trim_end_matches('/');
        let public_base = if base.is_empty() {
            DEFAULT_PUBLIC_BASE.to_owned()
        } else {
            base.to_owned()
        };
        tracing::info!(root = %root.display(), public_base, "Blob store ready");
        Ok(Self { root, public_base })
    }

    /// Directory holding the objects.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// URL prefix the objects are served under.
    pub fn public_base(&self) -> &str {
        &self.public_base
    }

    /// Write a new object and return its public URL.
    pub async fn put(
        &self,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<StoredBlob, IntegrationError> {
        let filename = format!("{}-{}", uuid::Uuid::now_v7(), sanitize_name(original_name));
        let path = self.root.join(&filename);
        tokio::fs::write(&path, bytes).await?;
        let url = format!("{}/{filename}", self.public_base);
        tracing::debug!(url, size = bytes.len(), "Stored blob");
        Ok(StoredBlob {
            url,
            filename,
            path,
        })
    }

    /// The object name for a public URL, if it belongs to this store.
    pub fn key_for_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        let key = url.strip_prefix(self.public_base.as_str())?.strip_prefix('/')?;
        is_safe_key(key).then_some(key)
    }

    /// Whether a URL points into this store.
    pub fn owns(&self, url: &str) -> bool {
        self.key_for_url(url).is_some()
    }

    /// Read an object back with its guessed MIME type.
    ///
    /// Returns `None` for foreign URLs and missing objects.
    pub async fn read(&self, url: &str) -> Result<Option<(String, Vec<u8>)>, IntegrationError> {
        let Some(key) = self.key_for_url(url) else {
            return Ok(None);
        };
        match tokio::fs::read(self.root.join(key)).await {
            Ok(bytes) => {
                let mime = mime_guess::from_path(key)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_owned();
                Ok(Some((mime, bytes)))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Delete an object. Returns whether something was removed.
    pub async fn delete(&self, url: &str) -> Result<bool, IntegrationError> {
        let Some(key) = self.key_for_url(url) else {
            return Err(IntegrationError::InvalidBlob(url.to_owned()));
        };
        match tokio::fs::remove_file(self.root.join(key)).await {
            Ok(()) => {
                tracing::debug!(url, "Deleted blob");
                Ok(true)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}
