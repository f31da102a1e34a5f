//! Embedded upload page.
//!
//! The UI is a single self-contained HTML file compiled into the binary, so
//! the service deploys as one artifact with nothing to serve from disk.

use axum::response::{Html, IntoResponse};

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Serve the upload page at `/`.
pub async fn serve_index() -> impl IntoResponse {
    Html(INDEX_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_index_is_served() {
        let response = serve_index().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(INDEX_HTML.contains("/api/process"));
    }
}
