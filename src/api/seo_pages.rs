use super::response::{decode_json, ApiResultExt};
use super::{ApiError, ApiResponse, AppState};
use crate::auth::Admin;
use crate::search::BlogIndex;
use crate::storage::ContentStorage;
use crate::{SeoPage, SeoPageInput};
use axum::body::Bytes;
use axum::extract::{Path, State};

pub async fn list_seo_pages<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
) -> Result<ApiResponse<Vec<SeoPage>>, ApiError> {
    let pages = state
        .engine
        .list_seo_pages()
        .await
        .api_context("Failed to fetch SEO pages")?;
    Ok(ApiResponse::ok(pages, "SEO pages retrieved successfully"))
}

pub async fn create_seo_page<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    _admin: Admin,
    body: Bytes,
) -> Result<ApiResponse<SeoPage>, ApiError> {
    let input: SeoPageInput = decode_json(&body).api_context("Failed to create SEO page")?;
    let page = state
        .engine
        .create_seo_page(input)
        .await
        .api_context("Failed to create SEO page")?;
    Ok(ApiResponse::created(page, "SEO page created successfully"))
}

pub async fn get_seo_page<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    Path(slug): Path<String>,
) -> Result<ApiResponse<SeoPage>, ApiError> {
    let page = state
        .engine
        .get_seo_page(&slug)
        .await
        .api_context("Failed to fetch SEO page")?;
    Ok(ApiResponse::ok(page, "SEO page retrieved successfully"))
}

/// PUT /api/seo/{slug}. The body replaces every field, the slug included.
pub async fn update_seo_page<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    _admin: Admin,
    Path(slug): Path<String>,
    body: Bytes,
) -> Result<ApiResponse<SeoPage>, ApiError> {
    let input: SeoPageInput = decode_json(&body).api_context("Failed to update SEO page")?;
    let page = state
        .engine
        .update_seo_page(&slug, input)
        .await
        .api_context("Failed to update SEO page")?;
    Ok(ApiResponse::ok(page, "SEO page updated successfully"))
}

pub async fn delete_seo_page<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    _admin: Admin,
    Path(slug): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    state
        .engine
        .delete_seo_page(&slug)
        .await
        .api_context("Failed to delete SEO page")?;
    Ok(ApiResponse::message("SEO page deleted successfully"))
}
