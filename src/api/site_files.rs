//! Files for crawlers: `/sitemap.xml` and `/robots.txt`.

use super::AppState;
use crate::search::BlogIndex;
use crate::seo::robots::robots_txt;
use crate::seo::sitemap::{blog_entries, render_sitemap, seo_page_entries, static_entries};
use crate::storage::ContentStorage;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::Utc;

/// Static pages always appear; content that cannot be loaded is left out.
pub async fn sitemap<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
) -> Response {
    let mut entries = static_entries(&state.site, Utc::now());

    match state.engine.list_blogs(true).await {
        Ok(blogs) => entries.extend(blog_entries(&state.site, &blogs)),
        Err(err) => tracing::error!(error = %err, "failed to load blogs for sitemap"),
    }
    match state.engine.list_seo_pages().await {
        Ok(pages) => entries.extend(seo_page_entries(&state.site, &pages)),
        Err(err) => tracing::error!(error = %err, "failed to load seo pages for sitemap"),
    }

    match render_sitemap(&entries) {
        Ok(xml) => ([(header::CONTENT_TYPE, "application/xml")], xml).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to render sitemap");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn robots<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        robots_txt(&state.site),
    )
}
