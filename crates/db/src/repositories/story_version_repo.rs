//! Repository for the `story_versions` table.
//!
//! Versions are immutable snapshots created on publish. Allocation of the
//! next `version_number` happens under the story's row lock, so concurrent
//! publishes of one story are serialized; the unique constraint on
//! `(story_id, version_number)` backs this up.

use folio_core::story::StoryDocument;
use folio_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::story::Story;
use crate::models::story_version::{StoryVersion, StoryVersionSummary};
use crate::repositories::story_repo::{build_document, COLUMNS as STORY_COLUMNS};
use crate::repositories::{SectionRepo, StoryRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, story_id, version_number, payload, created_at";

/// Provides publish and read operations for story versions.
pub struct StoryVersionRepo;

impl StoryVersionRepo {
    /// Snapshot the story's current document as the next version.
    ///
    /// Returns `None` if the story does not exist.
    pub async fn publish(pool: &PgPool, story_id: DbId) -> Result<Option<StoryVersion>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {STORY_COLUMNS} FROM stories WHERE id = $1 FOR UPDATE");
        let Some(story) = sqlx::query_as::<_, Story>(&query)
            .bind(story_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let sections = SectionRepo::list_by_story(&mut *tx, story_id).await?;
        let document = build_document(&story, &sections);

        let (next,): (i32,) = sqlx::query_as(
            "SELECT COALESCE(MAX(version_number), 0) + 1 \
             FROM story_versions WHERE story_id = $1",
        )
        .bind(story_id)
        .fetch_one(&mut *tx)
        .await?;

        let payload = document
            .snapshot_payload(next)
            .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        let query = format!(
            "INSERT INTO story_versions (story_id, version_number, payload) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let version = sqlx::query_as::<_, StoryVersion>(&query)
            .bind(story_id)
            .bind(next)
            .bind(&payload)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(story_id, version_number = next, "Story published");
        Ok(Some(version))
    }

    /// Find a version of a story: the exact number when given, otherwise the
    /// latest.
    pub async fn find(
        pool: &PgPool,
        story_id: DbId,
        version_number: Option<i32>,
    ) -> Result<Option<StoryVersion>, sqlx::Error> {
        match version_number {
            Some(number) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM story_versions \
                     WHERE story_id = $1 AND version_number = $2"
                );
                sqlx::query_as::<_, StoryVersion>(&query)
                    .bind(story_id)
                    .bind(number)
                    .fetch_optional(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM story_versions \
                     WHERE story_id = $1 \
                     ORDER BY version_number DESC LIMIT 1"
                );
                sqlx::query_as::<_, StoryVersion>(&query)
                    .bind(story_id)
                    .fetch_optional(pool)
                    .await
            }
        }
    }

    /// Highest published version number for a story, if any.
    pub async fn latest_version_number<'e, E: PgExecutor<'e>>(
        executor: E,
        story_id: DbId,
    ) -> Result<Option<i32>, sqlx::Error> {
        let (latest,): (Option<i32>,) =
            sqlx::query_as("SELECT MAX(version_number) FROM story_versions WHERE story_id = $1")
                .bind(story_id)
                .fetch_one(executor)
                .await?;
        Ok(latest)
    }

    /// Assemble the live document annotated with the latest published
    /// `versionNumber` (absent if never published).
    ///
    /// Story, sections and version are read from one snapshot, so a publish
    /// racing the read cannot pair a document with a version it never saw.
    pub async fn live_document(
        pool: &PgPool,
        story_id: DbId,
    ) -> Result<Option<StoryDocument>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let Some(story) = StoryRepo::find_by_id(&mut *tx, story_id).await? else {
            return Ok(None);
        };
        let sections = SectionRepo::list_by_story(&mut *tx, story_id).await?;
        let mut document = build_document(&story, &sections);
        document.version_number = Self::latest_version_number(&mut *tx, story_id).await?;
        tx.commit().await?;
        Ok(Some(document))
    }

    /// List all versions for a story, newest first, without payloads.
    pub async fn list_by_story(
        pool: &PgPool,
        story_id: DbId,
    ) -> Result<Vec<StoryVersionSummary>, sqlx::Error> {
        sqlx::query_as::<_, StoryVersionSummary>(
            "SELECT id, version_number, created_at FROM story_versions \
             WHERE story_id = $1 \
             ORDER BY version_number DESC",
        )
        .bind(story_id)
        .fetch_all(pool)
        .await
    }
}
