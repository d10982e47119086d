//! Browser UI serving routes
//!
//! Shell pages with their CSS/JS embedded at compile time, so the binary
//! carries the whole frontend. `/search` and `/collection` render through
//! the Accept dispatch in the search and collection modules; this module
//! owns the shared helpers, the remaining pages, and the assets.

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};

use crate::AppState;

const SEARCH_HTML: &str = include_str!("../ui/search.html");
const COLLECTION_HTML: &str = include_str!("../ui/collection.html");
const CALLBACK_HTML: &str = include_str!("../ui/callback.html");
const STYLE_CSS: &str = include_str!("../ui/style.css");
const APP_JS: &str = include_str!("../ui/app.js");

const NOT_FOUND_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>404 - Not Found</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <main class="error-page">
        <h1>404 - Not Found</h1>
        <p>That page is not in the crate. <a href="/search">Back to search</a></p>
    </main>
</body>
</html>
"#;

/// Whether the request prefers an HTML page over JSON (browser navigation)
pub fn wants_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .map(|accept| accept.contains("text/html"))
        .unwrap_or(false)
}

/// GET /
///
/// The search page is the landing page.
pub async fn serve_root() -> Redirect {
    Redirect::temporary("/search")
}

/// Search page (behind the /search Accept dispatch)
pub async fn search_page() -> Html<&'static str> {
    Html(SEARCH_HTML)
}

/// Collection page (behind the /collection Accept dispatch)
pub async fn collection_page() -> Html<&'static str> {
    Html(COLLECTION_HTML)
}

/// GET /callback
///
/// Stores the access token handed over by the OAuth callback redirect.
pub async fn callback_page() -> Html<&'static str> {
    Html(CALLBACK_HTML)
}

/// GET /static/style.css
pub async fn serve_style_css() -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", "text/css"),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        STYLE_CSS,
    )
        .into_response()
}

/// GET /static/app.js
///
/// Serves the JavaScript application
pub async fn serve_app_js() -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", "application/javascript"),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        APP_JS,
    )
        .into_response()
}

/// Fallback for paths no route claims
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html(NOT_FOUND_HTML)).into_response()
}

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(serve_root))
        .route("/callback", get(callback_page))
        .route("/static/style.css", get(serve_style_css))
        .route("/static/app.js", get(serve_app_js))
}
