//! Post service: listings, author-scoped lookup, and mutations.

use chrono::Utc;
use quill_common::{AppError, AppResult, IdGenerator};
use quill_db::entities::{group, post, user};
use quill_db::repositories::{FollowRepository, GroupRepository, PostRepository, UserRepository};
use quill_db::Page;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating a post.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 10000))]
    pub text: String,
    /// Group to publish into; an empty string means no group (form selects
    /// submit an empty value for the blank choice).
    pub group_id: Option<String>,
    #[validate(length(max = 512))]
    pub image: Option<String>,
}

/// Input for editing a post.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostInput {
    #[validate(length(min = 1, max = 10000))]
    pub text: String,
    pub group_id: Option<String>,
    #[validate(length(max = 512))]
    pub image: Option<String>,
}

/// Service for post listings and mutations.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    user_repo: UserRepository,
    group_repo: GroupRepository,
    follow_repo: FollowRepository,
    id_gen: IdGenerator,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        user_repo: UserRepository,
        group_repo: GroupRepository,
        follow_repo: FollowRepository,
    ) -> Self {
        Self {
            post_repo,
            user_repo,
            group_repo,
            follow_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Global listing, newest first.
    pub async fn list(&self, page: u64) -> AppResult<Page<post::Model>> {
        self.post_repo.page_all(page).await
    }

    /// Group listing, newest first; unknown slug is an error.
    pub async fn list_by_group(
        &self,
        slug: &str,
        page: u64,
    ) -> AppResult<(group::Model, Page<post::Model>)> {
        let group = self.group_repo.get_by_slug(slug).await?;
        let posts = self.post_repo.page_by_group(&group.id, page).await?;
        Ok((group, posts))
    }

    /// Author listing, newest first; unknown username is an error.
    pub async fn list_by_author(
        &self,
        username: &str,
        page: u64,
    ) -> AppResult<(user::Model, Page<post::Model>)> {
        let author = self.user_repo.get_by_username(username).await?;
        let posts = self.post_repo.page_by_author(&author.id, page).await?;
        Ok((author, posts))
    }

    /// Count an author's posts.
    pub async fn count_by_author(&self, author_id: &str) -> AppResult<u64> {
        self.post_repo.count_by_author(author_id).await
    }

    /// Feed: posts authored by anyone the user follows, newest first.
    pub async fn feed(&self, user_id: &str, page: u64) -> AppResult<Page<post::Model>> {
        let followee_ids = self.follow_repo.followee_ids(user_id).await?;
        self.post_repo.page_feed(&followee_ids, page).await
    }

    /// Author-scoped lookup: the post must exist AND belong to `username`.
    pub async fn get(&self, username: &str, post_id: &str) -> AppResult<(user::Model, post::Model)> {
        let author = self.user_repo.get_by_username(username).await?;
        let post = self
            .post_repo
            .get_by_id_for_author(post_id, &author.id)
            .await?;
        Ok((author, post))
    }

    /// Create a post.
    pub async fn create(&self, author: &user::Model, input: CreatePostInput) -> AppResult<post::Model> {
        input.validate()?;

        let group_id = self.resolve_group(input.group_id.as_deref()).await?;
        let image = input.image.filter(|s| !s.is_empty());

        let model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            author_id: Set(author.id.clone()),
            group_id: Set(group_id),
            text: Set(input.text),
            image: Set(image),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let post = self.post_repo.create(model).await?;
        tracing::debug!(post_id = %post.id, author_id = %post.author_id, "Created post");
        Ok(post)
    }

    /// Edit a post. Only the author may edit; anyone else is refused.
    pub async fn update(
        &self,
        actor: &user::Model,
        username: &str,
        post_id: &str,
        input: UpdatePostInput,
    ) -> AppResult<post::Model> {
        input.validate()?;

        let (_, post) = self.get(username, post_id).await?;

        if post.author_id != actor.id {
            return Err(AppError::Forbidden(
                "Only the author can edit a post".to_string(),
            ));
        }

        let group_id = self.resolve_group(input.group_id.as_deref()).await?;
        let image = input.image.filter(|s| !s.is_empty());

        let mut model: post::ActiveModel = post.into();
        model.text = Set(input.text);
        model.group_id = Set(group_id);
        model.image = Set(image);
        model.updated_at = Set(Some(Utc::now().into()));

        self.post_repo.update(model).await
    }

    /// Resolve an optional group id from form input; empty means none, an
    /// unknown id is a client error.
    async fn resolve_group(&self, group_id: Option<&str>) -> AppResult<Option<String>> {
        let Some(id) = group_id.filter(|s| !s.is_empty()) else {
            return Ok(None);
        };

        let group = self
            .group_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::BadRequest(format!("Unknown group: {id}")))?;

        Ok(Some(group.id))
    }
}
