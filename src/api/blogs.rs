use super::response::{decode_json, ApiResultExt};
use super::{ApiError, ApiResponse, AppState};
use crate::auth::Admin;
use crate::search::BlogIndex;
use crate::storage::ContentStorage;
use crate::{Blog, BlogPatch, ContentError, NewBlog};
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

const DEFAULT_SEARCH_LIMIT: usize = 20;
const MAX_SEARCH_LIMIT: usize = 100;

#[derive(Debug, Default, Deserialize)]
pub struct BlogListQuery {
    pub search: Option<String>,
    pub published: Option<bool>,
    pub limit: Option<usize>,
}

/// GET /api/blogs. Drafts are only listed for admins.
pub async fn list_blogs<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    admin: Option<Admin>,
    Query(query): Query<BlogListQuery>,
) -> Result<ApiResponse<Vec<Blog>>, ApiError> {
    let published_only = admin.is_none() || query.published == Some(true);
    let search = query.search.as_deref().map(str::trim).unwrap_or_default();

    let blogs = if search.is_empty() {
        state.engine.list_blogs(published_only).await
    } else {
        let limit = query
            .limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .clamp(1, MAX_SEARCH_LIMIT);
        state.engine.search_blogs(search, published_only, limit).await
    }
    .api_context("Failed to fetch blogs")?;

    Ok(ApiResponse::ok(blogs, "Blogs retrieved successfully"))
}

pub async fn create_blog<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    _admin: Admin,
    body: Bytes,
) -> Result<ApiResponse<Blog>, ApiError> {
    let input: NewBlog = decode_json(&body).api_context("Failed to create blog")?;
    let blog = state
        .engine
        .create_blog(input)
        .await
        .api_context("Failed to create blog")?;
    Ok(ApiResponse::created(blog, "Blog created successfully"))
}

/// GET /api/blogs/{slug}. Unpublished posts look missing to non-admins.
pub async fn get_blog<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    admin: Option<Admin>,
    Path(slug): Path<String>,
) -> Result<ApiResponse<Blog>, ApiError> {
    let blog = state
        .engine
        .get_blog(&slug)
        .await
        .and_then(|blog| {
            if blog.is_published || admin.is_some() {
                Ok(blog)
            } else {
                Err(ContentError::NotFound("Blog"))
            }
        })
        .api_context("Failed to fetch blog")?;
    Ok(ApiResponse::ok(blog, "Blog retrieved successfully"))
}

pub async fn update_blog<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    _admin: Admin,
    Path(slug): Path<String>,
    body: Bytes,
) -> Result<ApiResponse<Blog>, ApiError> {
    let patch: BlogPatch = decode_json(&body).api_context("Failed to update blog")?;
    let blog = state
        .engine
        .update_blog(&slug, patch)
        .await
        .api_context("Failed to update blog")?;
    Ok(ApiResponse::ok(blog, "Blog updated successfully"))
}

pub async fn delete_blog<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    _admin: Admin,
    Path(slug): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    state
        .engine
        .delete_blog(&slug)
        .await
        .api_context("Failed to delete blog")?;
    Ok(ApiResponse::message("Blog deleted successfully"))
}
