//! Landing and live pages. Rendering is intentionally minimal; the session
//! URL travels via the `/upload` cookie (or a query parameter).

use axum::{
    extract::Query,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::handlers::SESSION_COOKIE;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>Mentora</title></head>
<body>
  <h1>Start a conversation</h1>
  <form action="/upload" method="post" enctype="multipart/form-data">
    <label>Name <input type="text" name="name" required></label>
    <label>Document <input type="file" name="file"></label>
    <label>Or describe yourself <textarea name="description"></textarea></label>
    <button type="submit">Start</button>
  </form>
</body>
</html>
"#;

#[derive(Debug, Deserialize)]
pub struct LiveQuery {
    pub conversation_url: Option<String>,
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn live(jar: CookieJar, Query(query): Query<LiveQuery>) -> Response {
    let conversation_url = query
        .conversation_url
        .or_else(|| jar.get(SESSION_COOKIE).map(|c| c.value().to_string()))
        .filter(|url| !url.is_empty());

    match conversation_url {
        None => Redirect::to("/").into_response(),
        Some(url) => Html(render_live_page(&url)).into_response(),
    }
}

fn render_live_page(conversation_url: &str) -> String {
    let escaped = escape_attribute(conversation_url);
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Live conversation</title></head>
<body>
  <iframe src="{}" allow="camera; microphone" style="width:100%;height:90vh;border:0"></iframe>
</body>
</html>
"#,
        escaped
    )
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
