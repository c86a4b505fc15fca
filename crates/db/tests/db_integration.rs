//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `quill_test`)
//!   `TEST_DB_PASSWORD` (default: `quill_test`)
//!   `TEST_DB_NAME` (default: `quill_test`)

#![allow(clippy::unwrap_used, clippy::expect_used)]

use quill_db::entities::{follow, post, user};
use quill_db::repositories::{FollowRepository, PostRepository, UserRepository};
use quill_db::test_utils::{TestDatabase, TestDbConfig};
use quill_db::PAGE_SIZE;
use sea_orm::Set;
use std::sync::Arc;

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_migrations_apply_cleanly() {
    let db = TestDatabase::create_unique().await.expect("Failed to create");
    quill_db::migrate(db.connection())
        .await
        .expect("Migrations failed");
    db.drop_database().await.expect("Failed to drop");
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_post_pages_concatenate_without_gaps() {
    let db = TestDatabase::create_unique().await.expect("Failed to create");
    quill_db::migrate(db.connection())
        .await
        .expect("Migrations failed");

    // `DatabaseConnection` does not implement `Clone` while sea-orm's `mock`
    // dev-feature (required by the unit tests) is active, so open a second
    // handle to the same test database to share across repositories.
    let conn = Arc::new(
        sea_orm::Database::connect(db.config.database_url())
            .await
            .expect("Failed to connect repositories"),
    );
    let users = UserRepository::new(Arc::clone(&conn));
    let posts = PostRepository::new(Arc::clone(&conn));

    let author = users
        .create(user::ActiveModel {
            id: Set("u1".to_string()),
            username: Set("alice".to_string()),
            username_lower: Set("alice".to_string()),
            token: Set(Some("token_u1".to_string())),
            name: Set(None),
            bio: Set(None),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        })
        .await
        .expect("Failed to create user");

    // 13 posts: page 1 holds 10, page 2 the remaining 3
    for i in 0..13 {
        posts
            .create(post::ActiveModel {
                id: Set(format!("p{i:02}")),
                author_id: Set(author.id.clone()),
                group_id: Set(None),
                text: Set(format!("post {i}")),
                image: Set(None),
                created_at: Set(chrono::Utc::now().into()),
                updated_at: Set(None),
            })
            .await
            .expect("Failed to create post");
    }

    let first = posts.page_all(1).await.expect("page 1");
    let second = posts.page_all(2).await.expect("page 2");

    assert_eq!(first.items.len(), usize::try_from(PAGE_SIZE).unwrap());
    assert_eq!(second.items.len(), 3);
    assert_eq!(first.total_items, 13);
    assert!(first.has_next);
    assert!(!second.has_next);

    // No gaps or repeats across the slices
    let mut seen: Vec<&str> = first
        .items
        .iter()
        .chain(second.items.iter())
        .map(|p| p.id.as_str())
        .collect();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), 13);

    db.drop_database().await.expect("Failed to drop");
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_duplicate_follow_pair_is_rejected_by_index() {
    let db = TestDatabase::create_unique().await.expect("Failed to create");
    quill_db::migrate(db.connection())
        .await
        .expect("Migrations failed");

    // See note above: reconnect rather than clone the connection.
    let conn = Arc::new(
        sea_orm::Database::connect(db.config.database_url())
            .await
            .expect("Failed to connect repositories"),
    );
    let users = UserRepository::new(Arc::clone(&conn));
    let follows = FollowRepository::new(Arc::clone(&conn));

    for (id, name) in [("u1", "alice"), ("u2", "bob")] {
        users
            .create(user::ActiveModel {
                id: Set(id.to_string()),
                username: Set(name.to_string()),
                username_lower: Set(name.to_string()),
                token: Set(None),
                name: Set(None),
                bio: Set(None),
                created_at: Set(chrono::Utc::now().into()),
                updated_at: Set(None),
            })
            .await
            .expect("Failed to create user");
    }

    follows
        .create(follow::ActiveModel {
            id: Set("f1".to_string()),
            follower_id: Set("u1".to_string()),
            followee_id: Set("u2".to_string()),
            ..Default::default()
        })
        .await
        .expect("Failed to create follow");

    let duplicate = follows
        .create(follow::ActiveModel {
            id: Set("f2".to_string()),
            follower_id: Set("u1".to_string()),
            followee_id: Set("u2".to_string()),
            ..Default::default()
        })
        .await;

    assert!(duplicate.is_err(), "Unique pair index should reject this");

    db.drop_database().await.expect("Failed to drop");
}

#[test]
fn test_config_from_env() {
    // Default config is usable without any environment
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
}
