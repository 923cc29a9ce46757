//! Upload target resolution for the media root.
//!
//! A caller either names a relative target path or lets the policy generate
//! `uploads/YYYY/MM/DD/<uuid><ext>`. Either way the resolved file must sit
//! inside the media root; anything else is rejected before touching disk.

use std::path::{Component, Path, PathBuf};

use chrono::Datelike;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Directory (under the media root) for generated upload names.
pub const GENERATED_UPLOAD_DIR: &str = "uploads";

/// Where an upload will be written and how it is addressed publicly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    /// Path relative to the media root, `/`-separated.
    pub relative: String,
    /// Absolute location on disk.
    pub full_path: PathBuf,
}

impl UploadTarget {
    /// Final path component.
    pub fn file_name(&self) -> &str {
        self.relative.rsplit('/').next().unwrap_or(&self.relative)
    }
}

/// Media root plus the URL pieces used to build public links.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub media_root: PathBuf,
    /// URL path prefix, always starting with `/` (e.g. `/media`).
    pub url_prefix: String,
    /// Scheme and host without a trailing slash.
    pub base_url: String,
}

impl UploadPolicy {
    pub fn new(media_root: PathBuf, url_prefix: &str, base_url: &str) -> Self {
        let url_prefix = if url_prefix.starts_with('/') {
            url_prefix.to_string()
        } else {
            format!("/{url_prefix}")
        };
        Self {
            media_root,
            url_prefix,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve where an upload goes.
    ///
    /// `target_path` may start with `/`; `..`, empty paths and anything that
    /// would land outside the media root are validation errors.
    pub fn resolve(
        &self,
        target_path: Option<&str>,
        original_filename: Option<&str>,
        now: Timestamp,
    ) -> Result<UploadTarget, CoreError> {
        let parts = match target_path {
            Some(target) => sanitize_target(target)?,
            None => generated_parts(original_filename, now),
        };

        let full_path = parts
            .iter()
            .fold(self.media_root.clone(), |path, part| path.join(part));
        if !full_path.starts_with(&self.media_root) || full_path == self.media_root {
            return Err(CoreError::Validation(
                "Target path is outside the media directory".into(),
            ));
        }

        Ok(UploadTarget {
            relative: parts.join("/"),
            full_path,
        })
    }

    /// Public URL for a stored upload.
    pub fn public_url(&self, target: &UploadTarget) -> String {
        let prefix = self.url_prefix.trim_end_matches('/');
        format!("{}{prefix}/{}", self.base_url, target.relative)
    }
}

/// Split a caller-supplied target into safe path segments.
fn sanitize_target(target: &str) -> Result<Vec<String>, CoreError> {
    let trimmed = target.trim_start_matches('/');
    let mut parts = Vec::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(CoreError::Validation("Illegal target path".into()));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(CoreError::Validation("Target path must be relative".into()));
            }
        }
    }
    if parts.is_empty() {
        return Err(CoreError::Validation("Target path cannot be empty".into()));
    }
    Ok(parts)
}

fn generated_parts(original_filename: Option<&str>, now: Timestamp) -> Vec<String> {
    let extension = original_filename
        .and_then(|name| Path::new(name).extension())
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    vec![
        GENERATED_UPLOAD_DIR.to_string(),
        format!("{:04}", now.year()),
        format!("{:02}", now.month()),
        format!("{:02}", now.day()),
        format!("{}{extension}", uuid::Uuid::new_v4().simple()),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
