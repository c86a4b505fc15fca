//! API middleware.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use quill_core::{CommentService, FollowService, GroupService, PostService, UserService};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    /// User lookup and session resolution.
    pub user_service: UserService,
    /// Group lookup and provisioning.
    pub group_service: GroupService,
    /// Post listings and mutations.
    pub post_service: PostService,
    /// Comments on posts.
    pub comment_service: CommentService,
    /// The follow graph.
    pub follow_service: FollowService,
}

/// Session middleware.
///
/// Resolves a bearer token to a user row and stores it in request
/// extensions. Invalid or absent tokens leave the request anonymous.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(user) = state.user_service.authenticate_by_token(token).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
