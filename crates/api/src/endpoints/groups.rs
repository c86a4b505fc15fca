//! Group pages.

use axum::extract::{Path, Query, State};
use quill_common::AppResult;
use quill_db::entities::group;
use quill_db::Page;
use serde::Serialize;

use crate::endpoints::posts::{hydrate_posts, PageQuery, PostResponse};
use crate::middleware::AppState;
use crate::response::ApiResponse;

/// Group view-model.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResponse {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: String,
}

impl From<group::Model> for GroupResponse {
    fn from(g: group::Model) -> Self {
        Self {
            id: g.id,
            title: g.title,
            slug: g.slug,
            description: g.description,
            created_at: g.created_at.to_rfc3339(),
        }
    }
}

/// Group page view-model.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPostsResponse {
    pub group: GroupResponse,
    pub posts: Page<PostResponse>,
}

/// Paginated post listing scoped to a group; 404 for an unknown slug.
pub(crate) async fn group_posts(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<GroupPostsResponse>> {
    let (group, posts) = state.post_service.list_by_group(&slug, query.page).await?;
    let posts = hydrate_posts(&state, posts).await?;

    Ok(ApiResponse::ok(GroupPostsResponse {
        group: group.into(),
        posts,
    }))
}
