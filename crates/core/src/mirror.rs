//! Static mirror of the latest story document.
//!
//! The mirror is a curated JSON file (typically a front-end's
//! `public/story.json`) that is overwritten whenever a story changes. It is
//! never created here: if the file is not already present the write is
//! skipped. Failures are reported as [`MirrorError`] for the caller to log.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::story::StoryDocument;

// ---------------------------------------------------------------------------
// Filesystem collaborator
// ---------------------------------------------------------------------------

/// Minimal filesystem surface the mirror needs.
#[async_trait]
pub trait MirrorFs: Send + Sync {
    async fn exists(&self, path: &Path) -> bool;
    async fn write_text(&self, path: &Path, content: &str) -> std::io::Result<()>;
}

/// [`MirrorFs`] backed by `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

#[async_trait]
impl MirrorFs for LocalFs {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn write_text(&self, path: &Path, content: &str) -> std::io::Result<()> {
        tokio::fs::write(path, content).await
    }
}

// ---------------------------------------------------------------------------
// Mirror
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    #[error("Failed to encode story document: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to write mirror file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What a mirror write did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorOutcome {
    Written,
    /// The mirror file does not exist, so it was left alone.
    SkippedMissing,
    /// No mirror path is configured.
    Disabled,
}

/// Mirror target: an optional path and the filesystem to write through.
#[derive(Clone)]
pub struct StoryMirror {
    path: Option<PathBuf>,
    fs: Arc<dyn MirrorFs>,
}

impl StoryMirror {
    pub fn new(path: Option<PathBuf>, fs: Arc<dyn MirrorFs>) -> Self {
        Self { path, fs }
    }

    /// Mirror on the local filesystem.
    pub fn local(path: Option<PathBuf>) -> Self {
        Self::new(path, Arc::new(LocalFs))
    }

    /// A mirror that never writes.
    pub fn disabled() -> Self {
        Self::local(None)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Overwrite the mirror with `document` if the file already exists.
    pub async fn write(&self, document: &StoryDocument) -> Result<MirrorOutcome, MirrorError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(MirrorOutcome::Disabled);
        };
        if !self.fs.exists(path).await {
            return Ok(MirrorOutcome::SkippedMissing);
        }
        let content = serde_json::to_string_pretty(document)?;
        self.fs
            .write_text(path, &content)
            .await
            .map_err(|source| MirrorError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(MirrorOutcome::Written)
    }
}

impl std::fmt::Debug for StoryMirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryMirror").field("path", &self.path).finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
