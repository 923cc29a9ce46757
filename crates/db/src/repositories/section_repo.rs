//! Repository for the `sections` table.
//!
//! Every mutation runs in a transaction that first locks the owning story
//! row, so two reorders of the same story serialize instead of racing on
//! computed indices. The `(story_id, sort_order)` unique constraint is
//! deferred, which lets the reorder shift rows freely until commit.

use folio_core::ordering::{self, OrderPlan, OrderSlot, provisional_order};
use folio_core::types::DbId;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::section::{NewSection, Section, UpdateSection};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, story_id, type, sort_order, data";

/// Provides CRUD operations for sections, keeping each story's order dense.
pub struct SectionRepo;

impl SectionRepo {
    /// Insert a section at the requested position within its story.
    ///
    /// Returns `None` if the story does not exist.
    pub async fn create(
        pool: &PgPool,
        story_id: DbId,
        input: &NewSection,
    ) -> Result<Option<Section>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if !lock_story(&mut tx, story_id).await? {
            return Ok(None);
        }

        let id = insert_provisional(&mut tx, story_id, input).await?;
        reorder_story(
            &mut tx,
            story_id,
            Some(id),
            Some(input.sort_order.unwrap_or(0)),
        )
        .await?;

        let section = Self::find_by_id(&mut *tx, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        tx.commit().await?;
        Ok(Some(section))
    }

    /// Find a section by its ID.
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Section>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sections WHERE id = $1");
        sqlx::query_as::<_, Section>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// All sections of a story in display order.
    pub async fn list_by_story<'e, E: PgExecutor<'e>>(
        executor: E,
        story_id: DbId,
    ) -> Result<Vec<Section>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sections WHERE story_id = $1 ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, Section>(&query)
            .bind(story_id)
            .fetch_all(executor)
            .await
    }

    /// Page through sections, optionally restricted to one story.
    pub async fn list(
        pool: &PgPool,
        story_id: Option<DbId>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Section>, sqlx::Error> {
        match story_id {
            Some(story_id) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM sections WHERE story_id = $1 \
                     ORDER BY sort_order, id OFFSET $2 LIMIT $3"
                );
                sqlx::query_as::<_, Section>(&query)
                    .bind(story_id)
                    .bind(offset)
                    .bind(limit)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM sections \
                     ORDER BY sort_order, story_id, id OFFSET $1 LIMIT $2"
                );
                sqlx::query_as::<_, Section>(&query)
                    .bind(offset)
                    .bind(limit)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Update a section. Only non-`None` fields in `input` are applied.
    ///
    /// A supplied `sort_order` is treated as the new index among the
    /// section's siblings. Returns `None` if the section does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSection,
    ) -> Result<Option<Section>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(story_id) = story_id_of(&mut tx, id).await? else {
            return Ok(None);
        };
        lock_story(&mut tx, story_id).await?;

        let updated = sqlx::query(
            "UPDATE sections SET \
                type = COALESCE($2, type), \
                data = COALESCE($3, data) \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.section_type)
        .bind(&input.data)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        if let Some(target) = input.sort_order {
            reorder_story(&mut tx, story_id, Some(id), Some(target)).await?;
        }

        let section = Self::find_by_id(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(section)
    }

    /// Delete a section and compact its siblings.
    ///
    /// Returns the owning story's ID, or `None` if the section did not exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(story_id) = story_id_of(&mut tx, id).await? else {
            return Ok(None);
        };
        lock_story(&mut tx, story_id).await?;

        let deleted = sqlx::query("DELETE FROM sections WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            return Ok(None);
        }

        reorder_story(&mut tx, story_id, None, None).await?;
        tx.commit().await?;
        Ok(Some(story_id))
    }
}

// ---------------------------------------------------------------------------
// Transaction helpers
// ---------------------------------------------------------------------------

/// Take the row lock on a story. Returns `false` if the story does not exist.
pub(crate) async fn lock_story(
    conn: &mut PgConnection,
    story_id: DbId,
) -> Result<bool, sqlx::Error> {
    let row: Option<(DbId,)> = sqlx::query_as("SELECT id FROM stories WHERE id = $1 FOR UPDATE")
        .bind(story_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.is_some())
}

/// Insert a section with its requested order as a provisional value.
pub(crate) async fn insert_provisional(
    conn: &mut PgConnection,
    story_id: DbId,
    input: &NewSection,
) -> Result<DbId, sqlx::Error> {
    let row: (DbId,) = sqlx::query_as(
        "INSERT INTO sections (story_id, type, data, sort_order) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id",
    )
    .bind(story_id)
    .bind(&input.section_type)
    .bind(&input.data)
    .bind(provisional_order(input.sort_order))
    .fetch_one(&mut *conn)
    .await?;
    Ok(row.0)
}

/// Recompute the dense order of a story's sections and write the changes.
///
/// Must run inside a transaction holding the story lock.
pub(crate) async fn reorder_story(
    conn: &mut PgConnection,
    story_id: DbId,
    moving: Option<DbId>,
    target_index: Option<i64>,
) -> Result<OrderPlan, sqlx::Error> {
    let rows: Vec<(DbId, i32)> =
        sqlx::query_as("SELECT id, sort_order FROM sections WHERE story_id = $1")
            .bind(story_id)
            .fetch_all(&mut *conn)
            .await?;
    let siblings: Vec<OrderSlot> = rows
        .into_iter()
        .map(|(id, sort_order)| OrderSlot { id, sort_order })
        .collect();

    let plan = ordering::reorder(&siblings, moving, target_index);
    if plan.updates.is_empty() {
        return Ok(plan);
    }

    let (ids, orders): (Vec<DbId>, Vec<i32>) = plan
        .updates
        .iter()
        .map(|slot| (slot.id, slot.sort_order))
        .unzip();
    sqlx::query(
        "UPDATE sections AS s SET sort_order = u.sort_order \
         FROM UNNEST($1::BIGINT[], $2::INTEGER[]) AS u(id, sort_order) \
         WHERE s.id = u.id",
    )
    .bind(&ids)
    .bind(&orders)
    .execute(&mut *conn)
    .await?;

    tracing::debug!(
        story_id,
        moved = ?moving,
        changed = plan.updates.len(),
        total = plan.order.len(),
        "Reordered story sections"
    );
    Ok(plan)
}

async fn story_id_of(
    conn: &mut PgConnection,
    section_id: DbId,
) -> Result<Option<DbId>, sqlx::Error> {
    let row: Option<(DbId,)> = sqlx::query_as("SELECT story_id FROM sections WHERE id = $1")
        .bind(section_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.map(|(story_id,)| story_id))
}
