//! Server-rendered HTML: the public site and the admin forms.

pub mod admin;
pub mod public;

use crate::api::AppState;
use crate::config::Site;
use crate::error::{ContentError, Result};
use crate::search::BlogIndex;
use crate::seo::{json_ld_script_body, PageMetadata};
use crate::storage::ContentStorage;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Router;
use chrono::{DateTime, Datelike, Utc};
use serde_json::Value;
use tera::{Context, Tera};

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    ("home.html", include_str!("../../templates/home.html")),
    ("blog_list.html", include_str!("../../templates/blog_list.html")),
    ("blog.html", include_str!("../../templates/blog.html")),
    ("page.html", include_str!("../../templates/page.html")),
    ("not_found.html", include_str!("../../templates/not_found.html")),
    ("admin_login.html", include_str!("../../templates/admin_login.html")),
    (
        "admin_dashboard.html",
        include_str!("../../templates/admin_dashboard.html"),
    ),
    (
        "admin_blog_form.html",
        include_str!("../../templates/admin_blog_form.html"),
    ),
    (
        "admin_faq_form.html",
        include_str!("../../templates/admin_faq_form.html"),
    ),
    (
        "admin_seo_form.html",
        include_str!("../../templates/admin_seo_form.html"),
    ),
];

/// The compiled template set. Names ending in `.html` are autoescaped.
pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.to_vec())?;
        Ok(Self { tera })
    }

    pub fn render(&self, name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(name, context)?)
    }
}

/// An HTML response for a request that could not be served normally.
#[derive(Debug)]
pub struct PageError(Response);

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        self.0
    }
}

impl PageError {
    pub fn not_found(templates: &Templates, site: &Site) -> Self {
        let metadata = crate::seo::generate_seo_metadata(
            site,
            crate::seo::SeoConfig {
                title: "Page Not Found".to_string(),
                description: String::new(),
                no_index: true,
                ..Default::default()
            },
        );
        let context = page_context(site, &metadata, &[]);
        match templates.render("not_found.html", &context) {
            Ok(html) => Self((StatusCode::NOT_FOUND, Html(html)).into_response()),
            Err(err) => Self::internal(err),
        }
    }

    pub fn internal(err: ContentError) -> Self {
        tracing::error!(error = %err, "failed to render page");
        Self(
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h1>Something went wrong</h1>".to_string()),
            )
                .into_response(),
        )
    }

    pub fn from_content(templates: &Templates, site: &Site, err: ContentError) -> Self {
        match err {
            ContentError::NotFound(_) => Self::not_found(templates, site),
            err => Self::internal(err),
        }
    }
}

/// Variables every page template can use: the metadata for `<head>`, the
/// JSON-LD script bodies and the site identity.
pub fn page_context(site: &Site, metadata: &PageMetadata, json_ld: &[Value]) -> Context {
    let mut context = Context::new();
    context.insert("meta", metadata);
    context.insert("robots", &metadata.robots.content());
    let scripts: Vec<String> = json_ld.iter().map(json_ld_script_body).collect();
    context.insert("json_ld", &scripts);
    context.insert("site_name", &site.name);
    context.insert("base_url", &site.base_url);
    context.insert("year", &Utc::now().year());
    context
}

pub fn render(templates: &Templates, site: &Site, name: &str, context: &Context) -> Response {
    match templates.render(name, context) {
        Ok(html) => Html(html).into_response(),
        Err(err) => PageError::from_content(templates, site, err).into_response(),
    }
}

/// "March 1, 2025"
pub fn display_date(date: DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

pub fn routes<S, I>() -> Router<AppState<S, I>>
where
    S: ContentStorage + 'static,
    I: BlogIndex,
{
    Router::new()
        .merge(public::routes::<S, I>())
        .merge(admin::routes::<S, I>())
}
