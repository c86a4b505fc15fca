//! Page controllers.

mod about;
mod follow;
mod groups;
mod posts;
mod profiles;

use axum::{
    routing::{get, post},
    Router,
};
use quill_common::AppError;

use crate::middleware::AppState;

/// Fallback for unmatched routes.
async fn not_found() -> AppError {
    AppError::NotFound("No such page".to_string())
}

/// Create the application router.
///
/// Static segments win over dynamic ones, so `/new`, `/follow`, `/group`,
/// and `/about` never shadow `/{username}`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(posts::index))
        .route("/new", get(posts::new_post).post(posts::create_post))
        .route("/follow", get(follow::feed))
        .route("/group/{slug}", get(groups::group_posts))
        .route("/about/author", get(about::author))
        .route("/about/tech", get(about::tech))
        .route("/{username}", get(profiles::profile))
        .route("/{username}/follow", get(follow::profile_follow))
        .route("/{username}/unfollow", get(follow::profile_unfollow))
        .route("/{username}/{post_id}", get(posts::post_view))
        .route(
            "/{username}/{post_id}/edit",
            get(posts::edit_post).post(posts::update_post),
        )
        .route("/{username}/{post_id}/comment", post(posts::add_comment))
        .fallback(not_found)
}
