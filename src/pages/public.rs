use super::{display_date, page_context, render, PageError};
use crate::api::AppState;
use crate::config::Site;
use crate::error::ContentError;
use crate::search::BlogIndex;
use crate::seo::metadata::{blog_description, blog_metadata, excerpt, seo_page_metadata};
use crate::seo::schema::{
    article_schema, breadcrumb_schema, faq_schema, organization_schema, website_schema, Article,
};
use crate::seo::{generate_seo_metadata, PageMetadata, SeoConfig, HOME_PAGE_SLUG};
use crate::storage::ContentStorage;
use crate::Blog;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const HOME_DESCRIPTION: &str = "Transform education investment with AI-powered insights, feasibility analysis, and comprehensive school management tools. Expert guidance for investors and educators.";
const HOME_KEYWORDS: &[&str] = &[
    "school investment",
    "education investment",
    "school management",
    "AI education tools",
    "feasibility analysis",
    "investor platform",
    "educator resources",
];
const LATEST_BLOGS: usize = 3;
const LIST_SEARCH_LIMIT: usize = 50;
const EXCERPT_CHARS: usize = 160;

/// A blog as the templates see it: dates preformatted, content excerpted.
#[derive(Debug, Serialize)]
struct BlogView {
    slug: String,
    title: String,
    subtitle: Option<String>,
    image: Option<String>,
    read_time: Option<i32>,
    date: String,
    date_iso: String,
    excerpt: String,
    content: String,
}

impl From<&Blog> for BlogView {
    fn from(blog: &Blog) -> Self {
        Self {
            slug: blog.slug.clone(),
            title: blog.title.clone(),
            subtitle: blog.subtitle.clone(),
            image: blog.image.clone(),
            read_time: blog.read_time,
            date: display_date(blog.created_at),
            date_iso: blog.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            excerpt: blog
                .description
                .clone()
                .unwrap_or_else(|| excerpt(&blog.content, EXCERPT_CHARS)),
            content: blog.content.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BlogSearch {
    pub search: Option<String>,
}

fn home_metadata(site: &Site) -> PageMetadata {
    generate_seo_metadata(
        site,
        SeoConfig {
            title: format!("{} | School Investment Platform", site.name),
            description: HOME_DESCRIPTION.to_string(),
            keywords: HOME_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            canonical: Some(site.base_url.clone()),
            ..Default::default()
        },
    )
}

pub async fn home<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
) -> Result<Response, PageError> {
    let page_error = |err: ContentError| PageError::from_content(&state.templates, &state.site, err);

    let (metadata, intro) = match state.engine.get_seo_page(HOME_PAGE_SLUG).await {
        Ok(page) => (seo_page_metadata(&state.site, &page), page.content),
        Err(ContentError::NotFound(_)) => (home_metadata(&state.site), None),
        Err(err) => return Err(page_error(err)),
    };
    let blogs: Vec<BlogView> = state
        .engine
        .list_blogs(true)
        .await
        .map_err(page_error)?
        .iter()
        .take(LATEST_BLOGS)
        .map(BlogView::from)
        .collect();

    let json_ld = [organization_schema(&state.site), website_schema(&state.site)];
    let mut context = page_context(&state.site, &metadata, &json_ld);
    context.insert("intro", &intro);
    context.insert("blogs", &blogs);
    Ok(render(&state.templates, &state.site, "home.html", &context))
}

/// GET /blogs: published posts, or search results for `?search=`.
pub async fn blog_list<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    Query(query): Query<BlogSearch>,
) -> Result<Response, PageError> {
    let search = query.search.unwrap_or_default().trim().to_string();
    let blogs = if search.is_empty() {
        state.engine.list_blogs(true).await
    } else {
        state
            .engine
            .search_blogs(&search, true, LIST_SEARCH_LIMIT)
            .await
    }
    .map_err(|err| PageError::from_content(&state.templates, &state.site, err))?;
    let blogs: Vec<BlogView> = blogs.iter().map(BlogView::from).collect();

    let metadata = generate_seo_metadata(
        &state.site,
        SeoConfig {
            title: format!("Blog | {}", state.site.name),
            description: format!("Articles and guides from {}.", state.site.name),
            canonical: Some(state.site.absolute_url("/blogs")),
            ..Default::default()
        },
    );
    let json_ld = [breadcrumb_schema(
        &state.site,
        &[("Home", "/"), ("Blog", "/blogs")],
    )];
    let mut context = page_context(&state.site, &metadata, &json_ld);
    context.insert("search", &search);
    context.insert("blogs", &blogs);
    Ok(render(&state.templates, &state.site, "blog_list.html", &context))
}

/// GET /blog/{slug}. Drafts are indistinguishable from missing posts.
pub async fn blog_page<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    Path(slug): Path<String>,
) -> Result<Response, PageError> {
    let page_error = |err: ContentError| PageError::from_content(&state.templates, &state.site, err);

    let with_faqs = state.engine.blog_with_faqs(&slug).await.map_err(page_error)?;
    if !with_faqs.blog.is_published {
        return Err(PageError::not_found(&state.templates, &state.site));
    }
    let blog = &with_faqs.blog;

    let description = blog_description(blog);
    let path = format!("/blog/{}", blog.slug);
    let mut json_ld: Vec<Value> = vec![
        article_schema(
            &state.site,
            &Article {
                title: &blog.title,
                description: &description,
                slug: &blog.slug,
                published_at: blog.created_at,
                updated_at: blog.updated_at,
                image: blog.image.as_deref(),
            },
        ),
        breadcrumb_schema(
            &state.site,
            &[
                ("Home", "/"),
                ("Blog", "/blogs"),
                (blog.title.as_str(), path.as_str()),
            ],
        ),
    ];
    if !with_faqs.faqs.is_empty() {
        json_ld.push(faq_schema(
            with_faqs
                .faqs
                .iter()
                .map(|faq| (faq.question.as_str(), faq.answer.as_str())),
        ));
    }

    let metadata = blog_metadata(&state.site, blog);
    let mut context = page_context(&state.site, &metadata, &json_ld);
    context.insert("blog", &BlogView::from(blog));
    context.insert("faqs", &with_faqs.faqs);
    Ok(render(&state.templates, &state.site, "blog.html", &context))
}

/// GET /pages/{slug}: a standalone page with its own tags and schema markup.
pub async fn seo_page<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    Path(slug): Path<String>,
) -> Result<Response, PageError> {
    let page = state
        .engine
        .get_seo_page(&slug)
        .await
        .map_err(|err| PageError::from_content(&state.templates, &state.site, err))?;

    let mut json_ld = Vec::new();
    if let Some(markup) = &page.schema_markup {
        match serde_json::from_str::<Value>(markup) {
            Ok(value) => json_ld.push(value),
            Err(err) => tracing::warn!(slug = %page.slug, "ignoring invalid schema markup: {err}"),
        }
    }

    let metadata = seo_page_metadata(&state.site, &page);
    let mut context = page_context(&state.site, &metadata, &json_ld);
    context.insert("content", &page.content);
    Ok(render(&state.templates, &state.site, "page.html", &context))
}

pub async fn not_found<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
) -> PageError {
    PageError::not_found(&state.templates, &state.site)
}

pub fn routes<S, I>() -> Router<AppState<S, I>>
where
    S: ContentStorage + 'static,
    I: BlogIndex,
{
    Router::new()
        .route("/", get(home::<S, I>))
        .route("/blogs", get(blog_list::<S, I>))
        .route("/blog/:slug", get(blog_page::<S, I>))
        .route("/pages/:slug", get(seo_page::<S, I>))
        .fallback(not_found::<S, I>)
}
