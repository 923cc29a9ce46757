//! Integration tests for story CRUD and publishing.
//!
//! - Version numbers increase by one per publish
//! - Published payloads are frozen against later edits
//! - Deleting a story removes its sections and versions

use folio_db::models::section::{NewSection, UpdateSection};
use folio_db::models::story::{CreateStory, UpdateStory};
use folio_db::repositories::{SectionRepo, StoryRepo, StoryVersionRepo};
use sqlx::PgPool;

fn paragraph(text: &str) -> NewSection {
    NewSection {
        section_type: "paragraph".to_string(),
        data: Some(format!(r#"{{"type":"paragraph","content":"{text}"}}"#)),
        sort_order: None,
    }
}

async fn story_with(pool: &PgPool, texts: &[&str]) -> i64 {
    StoryRepo::create(
        pool,
        &CreateStory {
            title: Some("Versions".to_string()),
            sections: texts.iter().map(|t| paragraph(t)).collect(),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .story
    .id
}

fn payload(version: &folio_db::models::story_version::StoryVersion) -> serde_json::Value {
    serde_json::from_str(&version.payload).unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_publish_numbers_are_sequential(pool: PgPool) {
    let story_id = story_with(&pool, &["A"]).await;

    for expected in 1..=3 {
        let version = StoryVersionRepo::publish(&pool, story_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(version.version_number, expected);
        assert_eq!(payload(&version)["versionNumber"], expected);
    }

    let latest = StoryVersionRepo::latest_version_number(&pool, story_id)
        .await
        .unwrap();
    assert_eq!(latest, Some(3));

    let summaries = StoryVersionRepo::list_by_story(&pool, story_id).await.unwrap();
    let numbers: Vec<i32> = summaries.iter().map(|s| s.version_number).collect();
    assert_eq!(numbers, [3, 2, 1]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_published_payload_is_frozen(pool: PgPool) {
    let story_id = story_with(&pool, &["before"]).await;
    StoryVersionRepo::publish(&pool, story_id).await.unwrap().unwrap();

    let section = SectionRepo::list_by_story(&pool, story_id).await.unwrap()[0].clone();
    SectionRepo::update(
        &pool,
        section.id,
        &UpdateSection {
            data: Some(r#"{"type":"paragraph","content":"after"}"#.to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    StoryRepo::update(
        &pool,
        story_id,
        &UpdateStory {
            title: Some("Renamed".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    StoryVersionRepo::publish(&pool, story_id).await.unwrap().unwrap();

    let first = StoryVersionRepo::find(&pool, story_id, Some(1))
        .await
        .unwrap()
        .unwrap();
    let first = payload(&first);
    assert_eq!(first["title"], "Versions");
    assert_eq!(first["sections"][0]["content"], "before");

    let latest = StoryVersionRepo::find(&pool, story_id, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.version_number, 2);
    let latest = payload(&latest);
    assert_eq!(latest["title"], "Renamed");
    assert_eq!(latest["sections"][0]["content"], "after");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_version_and_story(pool: PgPool) {
    let story_id = story_with(&pool, &[]).await;
    assert!(StoryVersionRepo::find(&pool, story_id, None).await.unwrap().is_none());
    assert!(StoryVersionRepo::find(&pool, story_id, Some(7)).await.unwrap().is_none());
    assert_eq!(
        StoryVersionRepo::latest_version_number(&pool, story_id).await.unwrap(),
        None
    );
    assert!(StoryVersionRepo::publish(&pool, 987_654).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_publishes_get_distinct_numbers(pool: PgPool) {
    let story_id = story_with(&pool, &["A"]).await;

    let tasks: Vec<_> = (0..5)
        .map(|_| {
            let pool = pool.clone();
            tokio::spawn(async move { StoryVersionRepo::publish(&pool, story_id).await })
        })
        .collect();
    let mut numbers = Vec::new();
    for task in tasks {
        numbers.push(task.await.unwrap().unwrap().unwrap().version_number);
    }
    numbers.sort_unstable();
    assert_eq!(numbers, [1, 2, 3, 4, 5]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_degraded_section_is_published_as_placeholder(pool: PgPool) {
    let story_id = story_with(&pool, &["ok"]).await;
    SectionRepo::create(
        &pool,
        story_id,
        &NewSection {
            section_type: "pullquote".to_string(),
            data: Some("{not json".to_string()),
            sort_order: Some(1),
        },
    )
    .await
    .unwrap()
    .unwrap();

    let version = StoryVersionRepo::publish(&pool, story_id)
        .await
        .unwrap()
        .unwrap();
    let sections = &payload(&version)["sections"];
    assert_eq!(sections.as_array().unwrap().len(), 2);
    assert_eq!(sections[1]["type"], "pullquote");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_current_story_is_newest(pool: PgPool) {
    assert!(StoryRepo::find_current(&pool).await.unwrap().is_none());
    story_with(&pool, &[]).await;
    let newest = story_with(&pool, &[]).await;
    let current = StoryRepo::find_current(&pool).await.unwrap().unwrap();
    assert_eq!(current.id, newest);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_story_cascades(pool: PgPool) {
    let story_id = story_with(&pool, &["A", "B"]).await;
    StoryVersionRepo::publish(&pool, story_id).await.unwrap().unwrap();

    assert!(StoryRepo::delete(&pool, story_id).await.unwrap());
    assert!(!StoryRepo::delete(&pool, story_id).await.unwrap());

    for table in ["sections", "story_versions"] {
        let count: (i64,) = sqlx::query_as(&format!(
            "SELECT COUNT(*) FROM {table} WHERE story_id = $1"
        ))
        .bind(story_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count.0, 0, "{table} rows should be gone");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_live_document_carries_latest_version(pool: PgPool) {
    assert!(StoryVersionRepo::live_document(&pool, 424242)
        .await
        .unwrap()
        .is_none());

    let story_id = story_with(&pool, &["A"]).await;
    let unpublished = StoryVersionRepo::live_document(&pool, story_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unpublished.version_number, None);
    assert_eq!(unpublished.sections.len(), 1);

    StoryVersionRepo::publish(&pool, story_id).await.unwrap().unwrap();
    SectionRepo::create(&pool, story_id, &paragraph("B"))
        .await
        .unwrap()
        .unwrap();

    let live = StoryVersionRepo::live_document(&pool, story_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(live.version_number, Some(1));
    assert_eq!(live.title, "Versions");
    assert_eq!(live.sections.len(), 2);
    assert_eq!(live.sections[0]["content"], "B");
}
