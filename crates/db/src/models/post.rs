//! Legacy post and media models and DTOs.

use folio_core::import::{MediaDraft, PostDraft};
use folio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `posts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: DbId,
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `media` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Media {
    pub id: DbId,
    pub post_id: DbId,
    pub kind: String,
    pub url: String,
    pub caption: Option<String>,
    pub alt_text: Option<String>,
    pub credit: Option<String>,
    pub sort_order: i32,
}

/// A post with its media ordered by `sort_order`.
#[derive(Debug, Clone, Serialize)]
pub struct PostWithMedia {
    #[serde(flatten)]
    pub post: Post,
    pub media: Vec<Media>,
}

/// DTO for a media item. Without `sort_order` the list index is used.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMedia {
    pub kind: String,
    pub url: String,
    pub caption: Option<String>,
    pub alt_text: Option<String>,
    pub credit: Option<String>,
    pub sort_order: Option<i32>,
}

/// DTO for creating a post with its media.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePost {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub media: Vec<CreateMedia>,
}

/// DTO for updating a post. `media`, when present, replaces all media.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub created_at: Option<Timestamp>,
    pub media: Option<Vec<CreateMedia>>,
}

impl From<MediaDraft> for CreateMedia {
    fn from(draft: MediaDraft) -> Self {
        Self {
            kind: draft.kind.to_string(),
            url: draft.url,
            caption: draft.caption,
            alt_text: Some(draft.alt_text),
            credit: Some(draft.credit),
            sort_order: Some(draft.sort_order),
        }
    }
}

impl From<PostDraft> for CreatePost {
    fn from(draft: PostDraft) -> Self {
        Self {
            title: Some(draft.title),
            content: draft.content,
            author: None,
            created_at: None,
            media: draft.media.into_iter().map(CreateMedia::from).collect(),
        }
    }
}
