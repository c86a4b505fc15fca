//! Profile pages.

use axum::extract::{Path, Query, State};
use quill_common::AppResult;
use quill_db::Page;
use serde::Serialize;

use crate::endpoints::posts::{hydrate_posts, PageQuery, PostResponse, UserResponse};
use crate::extractors::MaybeAuthUser;
use crate::middleware::AppState;
use crate::response::ApiResponse;

/// Profile page view-model.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub posts_count: u64,
    pub followers: u64,
    pub following: u64,
    /// Whether the viewer follows this author; absent for anonymous viewers.
    pub is_following: Option<bool>,
    pub posts: Page<PostResponse>,
}

/// Profile page: counts plus the author's paginated posts.
pub(crate) async fn profile(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let (author, posts) = state.post_service.list_by_author(&username, query.page).await?;

    let posts_count = state.post_service.count_by_author(&author.id).await?;
    let followers = state.follow_service.count_followers(&author.id).await?;
    let following = state.follow_service.count_following(&author.id).await?;
    let is_following = match &viewer {
        Some(v) => Some(state.follow_service.is_following(&v.id, &author.id).await?),
        None => None,
    };

    let posts = hydrate_posts(&state, posts).await?;

    Ok(ApiResponse::ok(ProfileResponse {
        user: author.into(),
        posts_count,
        followers,
        following,
        is_following,
        posts,
    }))
}
