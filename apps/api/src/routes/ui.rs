use axum::response::Html;

const INDEX_HTML: &str = include_str!("ui.html");

/// GET /ui
/// Single-page form front-end over the JSON API.
pub async fn ui_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}
