//! Static about pages.

use serde::Serialize;

use crate::response::ApiResponse;

/// About page view-model.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutResponse {
    pub title: String,
    pub text: String,
}

/// About-the-author page.
pub(crate) async fn author() -> ApiResponse<AboutResponse> {
    ApiResponse::ok(AboutResponse {
        title: "About the author".to_string(),
        text: "Quill is a small blogging platform where authors publish \
               posts, join topical groups, and follow each other."
            .to_string(),
    })
}

/// About-the-technology page.
pub(crate) async fn tech() -> ApiResponse<AboutResponse> {
    ApiResponse::ok(AboutResponse {
        title: "Technology".to_string(),
        text: "Built with axum and sea-orm on top of PostgreSQL.".to_string(),
    })
}
