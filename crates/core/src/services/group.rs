//! Group service.

use chrono::Utc;
use once_cell::sync::Lazy;
use quill_common::{AppError, AppResult, IdGenerator};
use quill_db::entities::group;
use quill_db::repositories::GroupRepository;
use regex::Regex;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

#[allow(clippy::unwrap_used)]
static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());

/// Input for creating a group.
///
/// Groups are provisioned by the external admin console; this is the seam it
/// calls through.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 50), regex(path = *SLUG_RE))]
    pub slug: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Service for managing groups.
#[derive(Clone)]
pub struct GroupService {
    group_repo: GroupRepository,
    id_gen: IdGenerator,
}

impl GroupService {
    /// Create a new group service.
    #[must_use]
    pub const fn new(group_repo: GroupRepository) -> Self {
        Self {
            group_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get a group by slug, erroring if unknown.
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<group::Model> {
        self.group_repo.get_by_slug(slug).await
    }

    /// List all groups (for the post form's group picker).
    pub async fn all(&self) -> AppResult<Vec<group::Model>> {
        self.group_repo.all().await
    }

    /// Fetch groups by IDs (for batch hydration of listings).
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<group::Model>> {
        self.group_repo.find_by_ids(ids).await
    }

    /// Create a new group; the slug must be unused.
    pub async fn create(&self, input: CreateGroupInput) -> AppResult<group::Model> {
        input.validate()?;

        if self.group_repo.find_by_slug(&input.slug).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Slug already taken: {}",
                input.slug
            )));
        }

        let model = group::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title),
            slug: Set(input.slug),
            description: Set(input.description),
            created_at: Set(Utc::now().into()),
        };

        self.group_repo.create(model).await
    }
}
