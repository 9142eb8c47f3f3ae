use super::response::{decode_json, ApiResultExt};
use super::{ApiError, ApiResponse, AppState};
use crate::auth::Admin;
use crate::search::BlogIndex;
use crate::storage::ContentStorage;
use crate::{ContentError, FaqPatch, FaqWithBlog, NewFaq};
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqListQuery {
    pub blog_id: Option<Uuid>,
}

/// Ids that do not parse cannot name a stored FAQ.
fn faq_id(raw: &str) -> crate::Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ContentError::NotFound("FAQ"))
}

pub async fn list_faqs<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    Query(query): Query<FaqListQuery>,
) -> Result<ApiResponse<Vec<FaqWithBlog>>, ApiError> {
    let faqs = state
        .engine
        .list_faqs(query.blog_id)
        .await
        .api_context("Failed to fetch FAQs")?;
    Ok(ApiResponse::ok(faqs, "FAQs retrieved successfully"))
}

pub async fn create_faq<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    _admin: Admin,
    body: Bytes,
) -> Result<ApiResponse<FaqWithBlog>, ApiError> {
    let input: NewFaq = decode_json(&body).api_context("Failed to create FAQ")?;
    let faq = state
        .engine
        .create_faq(input)
        .await
        .api_context("Failed to create FAQ")?;
    Ok(ApiResponse::created(faq, "FAQ created successfully"))
}

pub async fn get_faq<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<FaqWithBlog>, ApiError> {
    let id = faq_id(&id).api_context("Failed to fetch FAQ")?;
    let faq = state
        .engine
        .get_faq(id)
        .await
        .api_context("Failed to fetch FAQ")?;
    Ok(ApiResponse::ok(faq, "FAQ retrieved successfully"))
}

pub async fn update_faq<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    _admin: Admin,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<ApiResponse<FaqWithBlog>, ApiError> {
    let patch: FaqPatch = decode_json(&body).api_context("Failed to update FAQ")?;
    // A malformed id matches no FAQ; the engine validates the patch before
    // reporting that.
    let id = Uuid::parse_str(&id).unwrap_or_default();
    let faq = state
        .engine
        .update_faq(id, patch)
        .await
        .api_context("Failed to update FAQ")?;
    Ok(ApiResponse::ok(faq, "FAQ updated successfully"))
}

pub async fn delete_faq<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    _admin: Admin,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    let id = faq_id(&id).api_context("Failed to delete FAQ")?;
    state
        .engine
        .delete_faq(id)
        .await
        .api_context("Failed to delete FAQ")?;
    Ok(ApiResponse::message("FAQ deleted successfully"))
}
