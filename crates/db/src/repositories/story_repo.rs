//! Repository for the `stories` table.

use folio_core::story::{self, StoryDocument};
use folio_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::section::Section;
use crate::models::story::{CreateStory, Story, StoryWithSections, UpdateStory};
use crate::repositories::section_repo::{insert_provisional, reorder_story};
use crate::repositories::SectionRepo;

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, title, version, standfirst, theme_font, \
    theme_primary_color, created_at, updated_at";

/// Provides CRUD operations for stories and assembly of their documents.
pub struct StoryRepo;

impl StoryRepo {
    /// Insert a story and its initial sections in one transaction.
    ///
    /// Each section is placed at its `sort_order` (or its list index), then
    /// the whole set is compacted so the stored order is dense.
    pub async fn create(
        pool: &PgPool,
        input: &CreateStory,
    ) -> Result<StoryWithSections, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO stories (title, version, standfirst, theme_font, theme_primary_color) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        let story = sqlx::query_as::<_, Story>(&query)
            .bind(&input.title)
            .bind(&input.version)
            .bind(&input.standfirst)
            .bind(&input.theme_font)
            .bind(&input.theme_primary_color)
            .fetch_one(&mut *tx)
            .await?;

        for (idx, section) in input.sections.iter().enumerate() {
            let mut section = section.clone();
            section.sort_order = Some(section.sort_order.unwrap_or(idx as i64));
            insert_provisional(&mut tx, story.id, &section).await?;
        }
        reorder_story(&mut tx, story.id, None, None).await?;

        let sections = SectionRepo::list_by_story(&mut *tx, story.id).await?;
        tx.commit().await?;

        tracing::info!(story_id = story.id, sections = sections.len(), "Story created");
        Ok(StoryWithSections { story, sections })
    }

    /// Find a story by its ID.
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Story>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stories WHERE id = $1");
        sqlx::query_as::<_, Story>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// The current story: the most recently created one.
    pub async fn find_current(pool: &PgPool) -> Result<Option<Story>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM stories ORDER BY created_at DESC, id DESC LIMIT 1"
        );
        sqlx::query_as::<_, Story>(&query).fetch_optional(pool).await
    }

    /// Page through stories, oldest first.
    pub async fn list(pool: &PgPool, offset: i64, limit: i64) -> Result<Vec<Story>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stories ORDER BY id OFFSET $1 LIMIT $2");
        sqlx::query_as::<_, Story>(&query)
            .bind(offset)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Update a story. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateStory,
    ) -> Result<Option<Story>, sqlx::Error> {
        let query = format!(
            "UPDATE stories SET \
                title = COALESCE($2, title), \
                version = COALESCE($3, version), \
                standfirst = COALESCE($4, standfirst), \
                theme_font = COALESCE($5, theme_font), \
                theme_primary_color = COALESCE($6, theme_primary_color), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Story>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.version)
            .bind(&input.standfirst)
            .bind(&input.theme_font)
            .bind(&input.theme_primary_color)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a story with its sections and versions.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM stories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Load a story with its ordered sections.
    pub async fn find_with_sections(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<StoryWithSections>, sqlx::Error> {
        let Some(story) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let sections = SectionRepo::list_by_story(pool, id).await?;
        Ok(Some(StoryWithSections { story, sections }))
    }

    /// Assemble the live document for a story.
    pub async fn document(pool: &PgPool, id: DbId) -> Result<Option<StoryDocument>, sqlx::Error> {
        let loaded = Self::find_with_sections(pool, id).await?;
        Ok(loaded.map(|s| build_document(&s.story, &s.sections)))
    }
}

/// Assemble a story document, logging any section that had to be replaced
/// by a placeholder.
pub fn build_document(story: &Story, sections: &[Section]) -> StoryDocument {
    let document = story::assemble(story.header(), sections.iter().map(Section::view));
    for &idx in &document.degraded_sections {
        if let Some(section) = sections.get(idx) {
            tracing::warn!(
                story_id = story.id,
                section_id = section.id,
                section_type = %section.section_type,
                "Section data is not valid JSON, using placeholder"
            );
        }
    }
    document
}
