//! HTTP surface: JSON routes under `/api`, plus the router that mounts the
//! HTML pages and the crawler files next to them.

pub mod admin;
pub mod blogs;
pub mod faqs;
pub mod response;
pub mod seo_pages;
pub mod site_files;

use crate::auth::AdminAuth;
use crate::config::Site;
use crate::pages::{self, Templates};
use crate::search::BlogIndex;
use crate::storage::ContentStorage;
use crate::ContentEngine;
use axum::extract::FromRef;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use response::{ApiError, ApiResponse};

pub struct AppState<S: ContentStorage, I: BlogIndex> {
    pub engine: Arc<ContentEngine<S, I>>,
    pub site: Arc<Site>,
    pub auth: Arc<AdminAuth>,
    pub templates: Arc<Templates>,
}

impl<S: ContentStorage, I: BlogIndex> AppState<S, I> {
    pub fn new(
        engine: ContentEngine<S, I>,
        site: Site,
        auth: AdminAuth,
        templates: Templates,
    ) -> Self {
        Self {
            engine: Arc::new(engine),
            site: Arc::new(site),
            auth: Arc::new(auth),
            templates: Arc::new(templates),
        }
    }
}

impl<S: ContentStorage, I: BlogIndex> Clone for AppState<S, I> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            site: Arc::clone(&self.site),
            auth: Arc::clone(&self.auth),
            templates: Arc::clone(&self.templates),
        }
    }
}

impl<S: ContentStorage, I: BlogIndex> FromRef<AppState<S, I>> for Arc<AdminAuth> {
    fn from_ref(state: &AppState<S, I>) -> Self {
        Arc::clone(&state.auth)
    }
}

/// JSON API routes.
pub fn api_routes<S, I>() -> Router<AppState<S, I>>
where
    S: ContentStorage + 'static,
    I: BlogIndex,
{
    Router::new()
        .route(
            "/api/blogs",
            get(blogs::list_blogs::<S, I>).post(blogs::create_blog::<S, I>),
        )
        .route(
            "/api/blogs/:slug",
            get(blogs::get_blog::<S, I>)
                .put(blogs::update_blog::<S, I>)
                .delete(blogs::delete_blog::<S, I>),
        )
        .route(
            "/api/faqs",
            get(faqs::list_faqs::<S, I>).post(faqs::create_faq::<S, I>),
        )
        .route(
            "/api/faqs/:id",
            get(faqs::get_faq::<S, I>)
                .put(faqs::update_faq::<S, I>)
                .delete(faqs::delete_faq::<S, I>),
        )
        .route(
            "/api/seo",
            get(seo_pages::list_seo_pages::<S, I>).post(seo_pages::create_seo_page::<S, I>),
        )
        .route(
            "/api/seo/:slug",
            get(seo_pages::get_seo_page::<S, I>)
                .put(seo_pages::update_seo_page::<S, I>)
                .delete(seo_pages::delete_seo_page::<S, I>),
        )
        .route("/api/admin/stats", get(admin::stats::<S, I>))
        .route("/api/admin/events", get(admin::events::<S, I>))
        .route("/api/auth/login", post(admin::login::<S, I>))
}

/// The whole site: API, public pages, admin forms, sitemap and robots.
pub fn router<S, I>(state: AppState<S, I>) -> Router
where
    S: ContentStorage + 'static,
    I: BlogIndex,
{
    Router::new()
        .merge(api_routes::<S, I>())
        .merge(pages::routes::<S, I>())
        .route("/sitemap.xml", get(site_files::sitemap::<S, I>))
        .route("/robots.txt", get(site_files::robots::<S, I>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
