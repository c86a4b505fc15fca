//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::Redirect,
};
use quill_db::entities::user;

/// Where anonymous callers of write actions are sent.
pub const LOGIN_ROUTE: &str = "/auth/login";

/// Authenticated user extractor.
///
/// Rejection is a redirect to the external login flow rather than a 401,
/// matching the redirect-to-login policy for write actions.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get user from request extensions (set by session middleware)
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| Redirect::to(LOGIN_ROUTE))
    }
}

/// Optional authenticated user extractor.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<user::Model>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<user::Model>().cloned()))
    }
}
