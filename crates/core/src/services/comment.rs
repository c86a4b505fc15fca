//! Comment service.

use chrono::Utc;
use quill_common::{AppResult, IdGenerator};
use quill_db::entities::{comment, user};
use quill_db::repositories::{CommentRepository, PostRepository, UserRepository};
use quill_db::Page;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for adding a comment.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
    #[validate(length(min = 1, max = 3000))]
    pub text: String,
}

/// Service for comments on posts.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    post_repo: PostRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(
        comment_repo: CommentRepository,
        post_repo: PostRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            comment_repo,
            post_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Comments on a post, newest first.
    pub async fn list(&self, post_id: &str, page: u64) -> AppResult<Page<comment::Model>> {
        self.comment_repo.page_by_post(post_id, page).await
    }

    /// Add a comment to a post, resolved under its author's username.
    pub async fn add(
        &self,
        actor: &user::Model,
        username: &str,
        post_id: &str,
        input: CreateCommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;

        let author = self.user_repo.get_by_username(username).await?;
        let post = self
            .post_repo
            .get_by_id_for_author(post_id, &author.id)
            .await?;

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            post_id: Set(post.id),
            author_id: Set(actor.id.clone()),
            text: Set(input.text),
            created_at: Set(Utc::now().into()),
        };

        self.comment_repo.create(model).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use quill_common::AppError;
    use quill_db::entities::post;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: &str, username: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: username.to_string(),
            username_lower: username.to_lowercase(),
            token: None,
            name: None,
            bio: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_post(id: &str, author_id: &str, text: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            author_id: author_id.to_string(),
            group_id: None,
            text: text.to_string(),
            image: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service_with(db: Arc<sea_orm::DatabaseConnection>) -> CommentService {
        CommentService::new(
            CommentRepository::new(Arc::clone(&db)),
            PostRepository::new(Arc::clone(&db)),
            UserRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_add_rejects_empty_text() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let actor = create_test_user("u2", "bob");

        let service = service_with(db);
        let result = service
            .add(
                &actor,
                "alice",
                "p1",
                CreateCommentInput {
                    text: String::new(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_add_to_missing_post_is_not_found() {
        let author = create_test_user("u1", "alice");
        let actor = create_test_user("u2", "bob");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[author.clone()]])
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service
            .add(
                &actor,
                "alice",
                "p1",
                CreateCommentInput {
                    text: "Что скажете?".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::PostNotFound(_))));
    }

    #[tokio::test]
    async fn test_add_creates_comment() {
        let author = create_test_user("u1", "alice");
        let actor = create_test_user("u2", "bob");
        let post = create_test_post("p1", "u1", "Тестовый текст");
        let comment = comment::Model {
            id: "c1".to_string(),
            post_id: "p1".to_string(),
            author_id: "u2".to_string(),
            text: "Что скажете?".to_string(),
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[author.clone()]])
                .append_query_results([[post.clone()]])
                .append_query_results([[comment.clone()]])
                .into_connection(),
        );

        let service = service_with(db);
        let created = service
            .add(
                &actor,
                "alice",
                "p1",
                CreateCommentInput {
                    text: "Что скажете?".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(created.post_id, "p1");
        assert_eq!(created.author_id, "u2");
    }
}
