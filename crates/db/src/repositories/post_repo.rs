//! Repository for the legacy `posts` and `media` tables.
//!
//! Media rows belong to exactly one post. An update that carries a media
//! list replaces the post's media wholesale.

use std::collections::HashMap;

use folio_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::post::{CreateMedia, CreatePost, Media, Post, PostWithMedia, UpdatePost};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, content, author, created_at, updated_at";

const MEDIA_COLUMNS: &str = "id, post_id, kind, url, caption, alt_text, credit, sort_order";

/// Provides CRUD operations for posts and their media.
pub struct PostRepo;

impl PostRepo {
    /// Insert a post together with its media in one transaction.
    pub async fn create(pool: &PgPool, input: &CreatePost) -> Result<PostWithMedia, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO posts (title, content, author, created_at) \
             VALUES ($1, $2, $3, COALESCE($4, NOW())) \
             RETURNING {COLUMNS}"
        );
        let post = sqlx::query_as::<_, Post>(&query)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.author)
            .bind(input.created_at)
            .fetch_one(&mut *tx)
            .await?;

        let media = insert_media(&mut tx, post.id, &input.media).await?;
        tx.commit().await?;
        Ok(PostWithMedia { post, media })
    }

    /// Find a post with its media.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PostWithMedia>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE id = $1");
        let Some(post) = sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };
        let media = media_for(pool, &[id]).await?.remove(&id).unwrap_or_default();
        Ok(Some(PostWithMedia { post, media }))
    }

    /// List posts newest first, each with its media.
    pub async fn list(
        pool: &PgPool,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<PostWithMedia>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM posts ORDER BY created_at DESC, id DESC OFFSET $1 LIMIT $2"
        );
        let posts = sqlx::query_as::<_, Post>(&query)
            .bind(offset)
            .bind(limit)
            .fetch_all(pool)
            .await?;

        let ids: Vec<DbId> = posts.iter().map(|p| p.id).collect();
        let mut grouped = media_for(pool, &ids).await?;
        Ok(posts
            .into_iter()
            .map(|post| {
                let media = grouped.remove(&post.id).unwrap_or_default();
                PostWithMedia { post, media }
            })
            .collect())
    }

    /// Update a post. Only non-`None` fields are applied; a supplied media
    /// list replaces the existing one.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePost,
    ) -> Result<Option<PostWithMedia>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE posts SET \
                title = COALESCE($2, title), \
                content = COALESCE($3, content), \
                author = COALESCE($4, author), \
                created_at = COALESCE($5, created_at), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let Some(post) = sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.author)
            .bind(input.created_at)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let media = match &input.media {
            Some(items) => {
                sqlx::query("DELETE FROM media WHERE post_id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                insert_media(&mut tx, id, items).await?
            }
            None => media_for(&mut *tx, &[id])
                .await?
                .remove(&id)
                .unwrap_or_default(),
        };

        tx.commit().await?;
        Ok(Some(PostWithMedia { post, media }))
    }

    /// Delete a post; its media go with it. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Insert media rows for a post. Items without `sort_order` take their
/// list index.
async fn insert_media(
    conn: &mut PgConnection,
    post_id: DbId,
    items: &[CreateMedia],
) -> Result<Vec<Media>, sqlx::Error> {
    let query = format!(
        "INSERT INTO media (post_id, kind, url, caption, alt_text, credit, sort_order) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {MEDIA_COLUMNS}"
    );
    let mut media = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let row = sqlx::query_as::<_, Media>(&query)
            .bind(post_id)
            .bind(&item.kind)
            .bind(&item.url)
            .bind(&item.caption)
            .bind(&item.alt_text)
            .bind(&item.credit)
            .bind(item.sort_order.unwrap_or(idx as i32))
            .fetch_one(&mut *conn)
            .await?;
        media.push(row);
    }
    media.sort_by_key(|m| (m.sort_order, m.id));
    Ok(media)
}

/// Media for a set of posts, grouped by post and ordered by `sort_order`.
async fn media_for<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    post_ids: &[DbId],
) -> Result<HashMap<DbId, Vec<Media>>, sqlx::Error> {
    if post_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let query = format!(
        "SELECT {MEDIA_COLUMNS} FROM media WHERE post_id = ANY($1) \
         ORDER BY post_id, sort_order, id"
    );
    let rows = sqlx::query_as::<_, Media>(&query)
        .bind(post_ids)
        .fetch_all(executor)
        .await?;

    let mut grouped: HashMap<DbId, Vec<Media>> = HashMap::new();
    for row in rows {
        grouped.entry(row.post_id).or_default().push(row);
    }
    Ok(grouped)
}
