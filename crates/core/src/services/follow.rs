//! Follow service.

use quill_common::{AppError, AppResult, IdGenerator};
use quill_db::entities::{follow, user};
use quill_db::repositories::{FollowRepository, UserRepository};
use sea_orm::Set;

/// Service for the follow graph.
#[derive(Clone)]
pub struct FollowService {
    follow_repo: FollowRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl FollowService {
    /// Create a new follow service.
    #[must_use]
    pub const fn new(follow_repo: FollowRepository, user_repo: UserRepository) -> Self {
        Self {
            follow_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Follow an author by username.
    ///
    /// Idempotent: an existing follow is returned as-is. Identity is compared
    /// by id; following yourself is refused.
    pub async fn follow(
        &self,
        follower: &user::Model,
        followee_username: &str,
    ) -> AppResult<follow::Model> {
        let followee = self.user_repo.get_by_username(followee_username).await?;

        if followee.id == follower.id {
            return Err(AppError::Forbidden("Cannot follow yourself".to_string()));
        }

        if let Some(existing) = self
            .follow_repo
            .find_by_pair(&follower.id, &followee.id)
            .await?
        {
            return Ok(existing);
        }

        let model = follow::ActiveModel {
            id: Set(self.id_gen.generate()),
            follower_id: Set(follower.id.clone()),
            followee_id: Set(followee.id),
            ..Default::default()
        };

        let created = self.follow_repo.create(model).await?;
        tracing::debug!(
            follower_id = %created.follower_id,
            followee_id = %created.followee_id,
            "Created follow"
        );
        Ok(created)
    }

    /// Unfollow an author by username.
    ///
    /// Idempotent: removing an absent follow is not an error.
    pub async fn unfollow(&self, follower: &user::Model, followee_username: &str) -> AppResult<()> {
        let followee = self.user_repo.get_by_username(followee_username).await?;
        self.follow_repo
            .delete_by_pair(&follower.id, &followee.id)
            .await
    }

    /// Whether `follower_id` follows `followee_id`.
    pub async fn is_following(&self, follower_id: &str, followee_id: &str) -> AppResult<bool> {
        self.follow_repo.is_following(follower_id, followee_id).await
    }

    /// Count followers of a user.
    pub async fn count_followers(&self, user_id: &str) -> AppResult<u64> {
        self.follow_repo.count_followers(user_id).await
    }

    /// Count users a user follows.
    pub async fn count_following(&self, user_id: &str) -> AppResult<u64> {
        self.follow_repo.count_following(user_id).await
    }
}
