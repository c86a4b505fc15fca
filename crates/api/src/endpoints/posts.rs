//! Post pages: listings, creation, single view, editing, commenting.

use std::collections::{BTreeSet, HashMap};

use axum::{
    extract::{Form, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use quill_common::{AppError, AppResult};
use quill_core::{CreateCommentInput, CreatePostInput, UpdatePostInput};
use quill_db::entities::{comment, group, post, user};
use quill_db::Page;
use serde::{Deserialize, Serialize};

use crate::endpoints::groups::GroupResponse;
use crate::extractors::{AuthUser, MaybeAuthUser};
use crate::middleware::AppState;
use crate::response::ApiResponse;

// ==================== Request/Response Types ====================

/// Page selector for listings; absent or zero means the first page.
#[derive(Debug, Deserialize)]
pub(crate) struct PageQuery {
    #[serde(default)]
    pub page: u64,
}

/// User view-model embedded in listings and profiles.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    pub bio: Option<String>,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            name: u.name,
            bio: u.bio,
        }
    }
}

/// Group reference embedded in post view-models.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRefResponse {
    pub id: String,
    pub title: String,
    pub slug: String,
}

impl From<group::Model> for GroupRefResponse {
    fn from(g: group::Model) -> Self {
        Self {
            id: g.id,
            title: g.title,
            slug: g.slug,
        }
    }
}

/// Post view-model.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub text: String,
    pub image: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub author: UserResponse,
    pub group: Option<GroupRefResponse>,
}

impl PostResponse {
    fn from_parts(p: post::Model, author: user::Model, group: Option<group::Model>) -> Self {
        Self {
            id: p.id,
            text: p.text,
            image: p.image,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.map(|dt| dt.to_rfc3339()),
            author: author.into(),
            group: group.map(Into::into),
        }
    }
}

/// Comment view-model.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub text: String,
    pub created_at: String,
    pub author: UserResponse,
}

/// Post-creation form view-model.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPostFormResponse {
    pub groups: Vec<GroupResponse>,
}

/// Post-edit form view-model.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditPostFormResponse {
    pub post: PostResponse,
    pub groups: Vec<GroupResponse>,
}

/// Single post page view-model.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub posts_count: u64,
    pub followers: u64,
    pub following: u64,
    /// Whether the viewer follows the author; absent for anonymous viewers.
    pub is_following: Option<bool>,
    pub comments: Page<CommentResponse>,
}

// ==================== Hydration ====================

/// Attach author and group view-models to a page of posts.
///
/// Authors and groups are batch-loaded, one query each per page.
pub(crate) async fn hydrate_posts(
    state: &AppState,
    page: Page<post::Model>,
) -> AppResult<Page<PostResponse>> {
    let author_ids: Vec<String> = page
        .items
        .iter()
        .map(|p| p.author_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let group_ids: Vec<String> = page
        .items
        .iter()
        .filter_map(|p| p.group_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let authors: HashMap<String, user::Model> = state
        .user_service
        .find_by_ids(&author_ids)
        .await?
        .into_iter()
        .map(|u| (u.id.clone(), u))
        .collect();
    let groups: HashMap<String, group::Model> = state
        .group_service
        .find_by_ids(&group_ids)
        .await?
        .into_iter()
        .map(|g| (g.id.clone(), g))
        .collect();

    let Page {
        items,
        page: current,
        total_pages,
        total_items,
        has_next,
        has_prev,
    } = page;

    let mut hydrated = Vec::with_capacity(items.len());
    for p in items {
        let author = authors
            .get(&p.author_id)
            .cloned()
            .ok_or_else(|| AppError::Internal(format!("Missing author for post {}", p.id)))?;
        let group = p.group_id.as_ref().and_then(|id| groups.get(id).cloned());
        hydrated.push(PostResponse::from_parts(p, author, group));
    }

    Ok(Page {
        items: hydrated,
        page: current,
        total_pages,
        total_items,
        has_next,
        has_prev,
    })
}

/// Attach author view-models to a page of comments.
pub(crate) async fn hydrate_comments(
    state: &AppState,
    page: Page<comment::Model>,
) -> AppResult<Page<CommentResponse>> {
    let author_ids: Vec<String> = page
        .items
        .iter()
        .map(|c| c.author_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let authors: HashMap<String, user::Model> = state
        .user_service
        .find_by_ids(&author_ids)
        .await?
        .into_iter()
        .map(|u| (u.id.clone(), u))
        .collect();

    let Page {
        items,
        page: current,
        total_pages,
        total_items,
        has_next,
        has_prev,
    } = page;

    let mut hydrated = Vec::with_capacity(items.len());
    for c in items {
        let author = authors
            .get(&c.author_id)
            .cloned()
            .ok_or_else(|| AppError::Internal(format!("Missing author for comment {}", c.id)))?;
        hydrated.push(CommentResponse {
            id: c.id,
            post_id: c.post_id,
            text: c.text,
            created_at: c.created_at.to_rfc3339(),
            author: author.into(),
        });
    }

    Ok(Page {
        items: hydrated,
        page: current,
        total_pages,
        total_items,
        has_next,
        has_prev,
    })
}

/// Hydrate a single post whose author is already resolved.
async fn hydrate_post(
    state: &AppState,
    p: post::Model,
    author: user::Model,
) -> AppResult<PostResponse> {
    let group = match &p.group_id {
        Some(id) => state
            .group_service
            .find_by_ids(std::slice::from_ref(id))
            .await?
            .into_iter()
            .next(),
        None => None,
    };
    Ok(PostResponse::from_parts(p, author, group))
}

fn post_route(username: &str, post_id: &str) -> String {
    format!("/{username}/{post_id}")
}

// ==================== Handlers ====================

/// Global post listing.
pub(crate) async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Page<PostResponse>>> {
    let page = state.post_service.list(query.page).await?;
    Ok(ApiResponse::ok(hydrate_posts(&state, page).await?))
}

/// Post-creation form.
pub(crate) async fn new_post(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<NewPostFormResponse>> {
    let groups = state
        .group_service
        .all()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(ApiResponse::ok(NewPostFormResponse { groups }))
}

/// Submit a new post.
pub(crate) async fn create_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Form(input): Form<CreatePostInput>,
) -> AppResult<Redirect> {
    state.post_service.create(&user, input).await?;
    Ok(Redirect::to("/"))
}

/// Single post page with comments.
pub(crate) async fn post_view(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path((username, post_id)): Path<(String, String)>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<PostDetailResponse>> {
    let (author, post) = state.post_service.get(&username, &post_id).await?;

    let posts_count = state.post_service.count_by_author(&author.id).await?;
    let followers = state.follow_service.count_followers(&author.id).await?;
    let following = state.follow_service.count_following(&author.id).await?;
    let is_following = match &viewer {
        Some(v) => Some(state.follow_service.is_following(&v.id, &author.id).await?),
        None => None,
    };

    let comments = state.comment_service.list(&post.id, query.page).await?;
    let comments = hydrate_comments(&state, comments).await?;
    let post = hydrate_post(&state, post, author).await?;

    Ok(ApiResponse::ok(PostDetailResponse {
        post,
        posts_count,
        followers,
        following,
        is_following,
        comments,
    }))
}

/// Post-edit form. Author-only: anyone else sees the read view.
pub(crate) async fn edit_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((username, post_id)): Path<(String, String)>,
) -> AppResult<Response> {
    let (author, post) = state.post_service.get(&username, &post_id).await?;

    if post.author_id != user.id {
        return Ok(Redirect::to(&post_route(&username, &post_id)).into_response());
    }

    let groups: Vec<GroupResponse> = state
        .group_service
        .all()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let post = hydrate_post(&state, post, author).await?;

    Ok(ApiResponse::ok(EditPostFormResponse { post, groups }).into_response())
}

/// Submit a post edit.
///
/// A refused edit (non-author) redirects to the read view instead of
/// surfacing an error page.
pub(crate) async fn update_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((username, post_id)): Path<(String, String)>,
    Form(input): Form<UpdatePostInput>,
) -> AppResult<Redirect> {
    match state
        .post_service
        .update(&user, &username, &post_id, input)
        .await
    {
        Ok(_) | Err(AppError::Forbidden(_)) => Ok(Redirect::to(&post_route(&username, &post_id))),
        Err(e) => Err(e),
    }
}

/// Add a comment to a post.
pub(crate) async fn add_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((username, post_id)): Path<(String, String)>,
    Form(input): Form<CreateCommentInput>,
) -> AppResult<Redirect> {
    state
        .comment_service
        .add(&user, &username, &post_id, input)
        .await?;
    Ok(Redirect::to(&post_route(&username, &post_id)))
}
