//! Integration tests for section ordering.
//!
//! Exercises `SectionRepo` against a real database:
//! - Inserts at an index shift later siblings
//! - Out-of-range targets clamp to the ends
//! - Moves and deletes keep `sort_order` dense
//! - Listing with pagination and story filter

use folio_core::ordering::is_dense;
use folio_db::models::section::{NewSection, Section, UpdateSection};
use folio_db::models::story::CreateStory;
use folio_db::repositories::{SectionRepo, StoryRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn paragraph(text: &str, sort_order: Option<i64>) -> NewSection {
    NewSection {
        section_type: "paragraph".to_string(),
        data: Some(format!(r#"{{"type":"paragraph","content":"{text}"}}"#)),
        sort_order,
    }
}

async fn new_story(pool: &PgPool) -> i64 {
    StoryRepo::create(
        pool,
        &CreateStory {
            title: Some("Ordering".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .story
    .id
}

fn content(section: &Section) -> String {
    let data: serde_json::Value =
        serde_json::from_str(section.data.as_deref().unwrap()).unwrap();
    data["content"].as_str().unwrap().to_string()
}

async fn contents(pool: &PgPool, story_id: i64) -> Vec<String> {
    SectionRepo::list_by_story(pool, story_id)
        .await
        .unwrap()
        .iter()
        .map(content)
        .collect()
}

async fn assert_dense(pool: &PgPool, story_id: i64) {
    let orders: Vec<i32> = SectionRepo::list_by_story(pool, story_id)
        .await
        .unwrap()
        .iter()
        .map(|s| s.sort_order)
        .collect();
    assert!(is_dense(&orders), "sort orders not dense: {orders:?}");
    let mut sorted = orders.clone();
    sorted.sort_unstable();
    assert_eq!(orders, sorted, "listing must follow sort_order");
}

async fn seed(pool: &PgPool, story_id: i64, texts: &[&str]) {
    for (i, text) in texts.iter().enumerate() {
        SectionRepo::create(pool, story_id, &paragraph(text, Some(i as i64)))
            .await
            .unwrap()
            .unwrap();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_insert_shifts_later_sections(pool: PgPool) {
    let story_id = new_story(&pool).await;
    seed(&pool, story_id, &["A", "B", "C"]).await;

    let d = SectionRepo::create(&pool, story_id, &paragraph("D", Some(1)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(d.sort_order, 1);
    assert_eq!(contents(&pool, story_id).await, ["A", "D", "B", "C"]);
    assert_dense(&pool, story_id).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_out_of_range_targets_clamp(pool: PgPool) {
    let story_id = new_story(&pool).await;
    seed(&pool, story_id, &["A", "B"]).await;

    let last = SectionRepo::create(&pool, story_id, &paragraph("Z", Some(999)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(last.sort_order, 2);

    let first = SectionRepo::create(&pool, story_id, &paragraph("0", Some(-5)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.sort_order, 0);

    assert_eq!(contents(&pool, story_id).await, ["0", "A", "B", "Z"]);

    let far = SectionRepo::create(&pool, story_id, &paragraph("far", Some(5_000_000_000)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(far.sort_order, 4);
    assert_dense(&pool, story_id).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_sort_order_inserts_first(pool: PgPool) {
    let story_id = new_story(&pool).await;
    seed(&pool, story_id, &["A", "B"]).await;

    SectionRepo::create(&pool, story_id, &paragraph("X", None))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(contents(&pool, story_id).await, ["X", "A", "B"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_for_missing_story_returns_none(pool: PgPool) {
    let created = SectionRepo::create(&pool, 424242, &paragraph("A", None))
        .await
        .unwrap();
    assert!(created.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_move_section_down_and_up(pool: PgPool) {
    let story_id = new_story(&pool).await;
    seed(&pool, story_id, &["A", "B", "C", "D"]).await;
    let sections = SectionRepo::list_by_story(&pool, story_id).await.unwrap();
    let a = sections[0].id;
    let d = sections[3].id;

    let moved = SectionRepo::update(
        &pool,
        a,
        &UpdateSection {
            sort_order: Some(2),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(moved.sort_order, 2);
    assert_eq!(contents(&pool, story_id).await, ["B", "C", "A", "D"]);

    SectionRepo::update(
        &pool,
        d,
        &UpdateSection {
            sort_order: Some(0),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(contents(&pool, story_id).await, ["D", "B", "C", "A"]);
    assert_dense(&pool, story_id).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_without_sort_order_keeps_position(pool: PgPool) {
    let story_id = new_story(&pool).await;
    seed(&pool, story_id, &["A", "B"]).await;
    let b = SectionRepo::list_by_story(&pool, story_id).await.unwrap()[1].id;

    let updated = SectionRepo::update(
        &pool,
        b,
        &UpdateSection {
            data: Some(r#"{"type":"paragraph","content":"B2"}"#.to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.sort_order, 1);
    assert_eq!(updated.section_type, "paragraph");
    assert_eq!(contents(&pool, story_id).await, ["A", "B2"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_section_returns_none(pool: PgPool) {
    let updated = SectionRepo::update(&pool, 999_999, &UpdateSection::default())
        .await
        .unwrap();
    assert!(updated.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_compacts_siblings(pool: PgPool) {
    let story_id = new_story(&pool).await;
    seed(&pool, story_id, &["A", "B", "C"]).await;
    let b = SectionRepo::list_by_story(&pool, story_id).await.unwrap()[1].id;

    let owner = SectionRepo::delete(&pool, b).await.unwrap();
    assert_eq!(owner, Some(story_id));
    assert_eq!(contents(&pool, story_id).await, ["A", "C"]);
    assert_dense(&pool, story_id).await;

    assert_eq!(SectionRepo::delete(&pool, b).await.unwrap(), None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_story_create_compacts_initial_sections(pool: PgPool) {
    let created = StoryRepo::create(
        &pool,
        &CreateStory {
            title: Some("Seeded".to_string()),
            sections: vec![
                paragraph("A", Some(10)),
                paragraph("B", Some(3)),
                paragraph("C", None),
            ],
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let orders: Vec<i32> = created.sections.iter().map(|s| s.sort_order).collect();
    assert_eq!(orders, [0, 1, 2]);
    let texts: Vec<String> = created.sections.iter().map(content).collect();
    assert_eq!(texts, ["C", "B", "A"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_and_pages(pool: PgPool) {
    let first = new_story(&pool).await;
    let second = new_story(&pool).await;
    seed(&pool, first, &["A", "B", "C"]).await;
    seed(&pool, second, &["X"]).await;

    let all = SectionRepo::list(&pool, None, 0, 100).await.unwrap();
    assert_eq!(all.len(), 4);

    let page = SectionRepo::list(&pool, Some(first), 1, 1).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(content(&page[0]), "B");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_inserts_stay_dense(pool: PgPool) {
    let story_id = new_story(&pool).await;

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let pool = pool.clone();
            tokio::spawn(async move {
                SectionRepo::create(&pool, story_id, &paragraph(&i.to_string(), Some(0)))
                    .await
                    .unwrap()
                    .unwrap()
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(contents(&pool, story_id).await.len(), 8);
    assert_dense(&pool, story_id).await;
}
