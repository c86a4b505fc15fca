//! HTTP layer for quill.
//!
//! This crate provides the page controllers of the application:
//!
//! - **Endpoints**: listing, profile, post, and follow-graph pages
//! - **Extractors**: session-based authentication
//! - **Middleware**: session resolution, request state
//! - **Response**: the view-model envelope handed to the presentation layer
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
