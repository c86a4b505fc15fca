//! Post repository.

use std::sync::Arc;

use crate::entities::{post, Post};
use crate::pagination::{self, Page, PAGE_SIZE};
use quill_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select,
};

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

/// Newest-first ordering shared by every listing.
///
/// The id tie-break keeps slices stable for posts created within the same
/// timestamp, so concatenated pages have no gaps or repeats.
fn newest_first(select: Select<Post>) -> Select<Post> {
    select
        .order_by_desc(post::Column::CreatedAt)
        .order_by_desc(post::Column::Id)
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a post by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a post by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<post::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PostNotFound(id.to_string()))
    }

    /// Find a post by ID scoped to an author.
    ///
    /// The author is part of the lookup key: a post id valid for one author
    /// resolves to nothing under another author.
    pub async fn find_by_id_for_author(
        &self,
        id: &str,
        author_id: &str,
    ) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .filter(post::Column::AuthorId.eq(author_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a post by ID scoped to an author, returning an error if not found.
    pub async fn get_by_id_for_author(&self, id: &str, author_id: &str) -> AppResult<post::Model> {
        self.find_by_id_for_author(id, author_id)
            .await?
            .ok_or_else(|| AppError::PostNotFound(id.to_string()))
    }

    /// Create a new post.
    pub async fn create(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a post.
    pub async fn update(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the global listing (all posts, newest first).
    pub async fn page_all(&self, page: u64) -> AppResult<Page<post::Model>> {
        let paginator = newest_first(Post::find()).paginate(self.db.as_ref(), PAGE_SIZE);
        pagination::fetch_page(paginator, page).await
    }

    /// Get posts in a group (newest first).
    pub async fn page_by_group(&self, group_id: &str, page: u64) -> AppResult<Page<post::Model>> {
        let paginator = newest_first(Post::find().filter(post::Column::GroupId.eq(group_id)))
            .paginate(self.db.as_ref(), PAGE_SIZE);
        pagination::fetch_page(paginator, page).await
    }

    /// Get posts by an author (newest first).
    pub async fn page_by_author(&self, author_id: &str, page: u64) -> AppResult<Page<post::Model>> {
        let paginator = newest_first(Post::find().filter(post::Column::AuthorId.eq(author_id)))
            .paginate(self.db.as_ref(), PAGE_SIZE);
        pagination::fetch_page(paginator, page).await
    }

    /// Get the feed: posts authored by any of `author_ids` (newest first).
    ///
    /// An empty author set short-circuits to a single empty page.
    pub async fn page_feed(&self, author_ids: &[String], page: u64) -> AppResult<Page<post::Model>> {
        if author_ids.is_empty() {
            return Ok(Page::empty());
        }

        let paginator =
            newest_first(Post::find().filter(post::Column::AuthorId.is_in(author_ids.to_vec())))
                .paginate(self.db.as_ref(), PAGE_SIZE);
        pagination::fetch_page(paginator, page).await
    }

    /// Count posts by an author.
    pub async fn count_by_author(&self, author_id: &str) -> AppResult<u64> {
        Post::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
