//! Follow graph pages: the feed and follow/unfollow actions.

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
};
use quill_common::{AppError, AppResult};
use quill_db::Page;

use crate::endpoints::posts::{hydrate_posts, PageQuery, PostResponse};
use crate::extractors::AuthUser;
use crate::middleware::AppState;
use crate::response::ApiResponse;

/// Feed of posts by followed authors.
pub(crate) async fn feed(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Page<PostResponse>>> {
    let page = state.post_service.feed(&user.id, query.page).await?;
    Ok(ApiResponse::ok(hydrate_posts(&state, page).await?))
}

/// Follow an author; self-target is refused.
pub(crate) async fn profile_follow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Redirect> {
    let target = state.user_service.get_by_username(&username).await?;
    if target.id == user.id {
        return Err(AppError::Forbidden("Cannot follow yourself".to_string()));
    }

    state.follow_service.follow(&user, &username).await?;
    Ok(Redirect::to(&format!("/{username}")))
}

/// Unfollow an author; self-target is refused, a missing follow is a no-op.
pub(crate) async fn profile_unfollow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Redirect> {
    let target = state.user_service.get_by_username(&username).await?;
    if target.id == user.id {
        return Err(AppError::Forbidden("Cannot unfollow yourself".to_string()));
    }

    state.follow_service.unfollow(&user, &username).await?;
    Ok(Redirect::to(&format!("/{username}")))
}
