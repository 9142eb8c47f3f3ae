//! Admin HTML forms. Every POST goes through the same engine operations as
//! the JSON API, then redirects with `?saved=1` or re-renders with the error.

use super::{page_context, render, PageError};
use crate::api::admin::LoginRequest;
use crate::api::response::client_status;
use crate::api::AppState;
use crate::auth::{self, Admin, AdminAuth, AdminClaims};
use crate::config::Site;
use crate::error::{ContentError, Result};
use crate::search::BlogIndex;
use crate::seo::{generate_seo_metadata, SeoConfig};
use crate::storage::ContentStorage;
use crate::{Blog, BlogPatch, FaqPatch, FaqWithBlog, NewBlog, NewFaq, SeoPageInput};
use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts, Path, Query, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tera::Context;
use uuid::Uuid;

const LOGIN_PATH: &str = "/admin/login";
const BLOG_PICKER_LIMIT: usize = 20;

/// Like [`Admin`], but sends browsers to the login form instead of a 401.
#[derive(Debug, Clone)]
pub struct AdminPage(pub AdminClaims);

#[async_trait]
impl<S> FromRequestParts<S> for AdminPage
where
    Arc<AdminAuth>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> std::result::Result<Self, Redirect> {
        Admin::from_request_parts(parts, state)
            .await
            .map(|Admin(claims)| AdminPage(claims))
            .map_err(|_| Redirect::to(LOGIN_PATH))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FormQuery {
    pub saved: Option<String>,
    pub search: Option<String>,
}

impl FormQuery {
    fn saved(&self) -> bool {
        self.saved.is_some()
    }
}

fn admin_context(site: &Site, title: &str) -> Context {
    let metadata = generate_seo_metadata(
        site,
        SeoConfig {
            title: format!("{title} | {} admin", site.name),
            no_index: true,
            ..Default::default()
        },
    );
    let mut context = page_context(site, &metadata, &[]);
    context.insert("error", &None::<String>);
    context.insert("saved", &false);
    context
}

/// Re-renders a form with the error, or falls back to the error pages.
fn form_failure<S: ContentStorage, I: BlogIndex>(
    state: &AppState<S, I>,
    template: &str,
    mut context: Context,
    err: ContentError,
) -> Response {
    if matches!(err, ContentError::NotFound(_)) {
        return PageError::not_found(&state.templates, &state.site).into_response();
    }
    match client_status(&err) {
        Some(status) => {
            context.insert("error", &err.to_string());
            let mut response = render(&state.templates, &state.site, template, &context);
            *response.status_mut() = status;
            response
        }
        None => PageError::internal(err).into_response(),
    }
}

fn saved_redirect(path: &str) -> Response {
    Redirect::to(&format!("{path}?saved=1")).into_response()
}

pub async fn login_form<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
) -> Response {
    let mut context = admin_context(&state.site, "Sign in");
    context.insert("email", "");
    render(&state.templates, &state.site, "admin_login.html", &context)
}

pub async fn login<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    jar: CookieJar,
    Form(credentials): Form<LoginRequest>,
) -> Response {
    match state.auth.login(&credentials.email, &credentials.password) {
        Ok(token) => {
            tracing::info!(email = %credentials.email.trim(), "admin signed in");
            (jar.add(auth::session_cookie(token)), Redirect::to("/admin")).into_response()
        }
        Err(err) => {
            tracing::debug!("admin sign in failed: {err}");
            let mut context = admin_context(&state.site, "Sign in");
            context.insert("email", credentials.email.trim());
            context.insert("error", "Invalid email or password");
            let mut response =
                render(&state.templates, &state.site, "admin_login.html", &context);
            *response.status_mut() = StatusCode::UNAUTHORIZED;
            response
        }
    }
}

pub async fn logout(jar: CookieJar) -> Response {
    (jar.remove(auth::cleared_cookie()), Redirect::to(LOGIN_PATH)).into_response()
}

pub async fn dashboard<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    _admin: AdminPage,
) -> std::result::Result<Response, PageError> {
    let engine = &state.engine;
    let loaded = tokio::try_join!(
        engine.stats(),
        engine.list_blogs(false),
        engine.list_faqs(None),
        engine.list_seo_pages(),
    );
    let (stats, blogs, faqs, seo_pages) = loaded.map_err(PageError::internal)?;

    let mut context = admin_context(&state.site, "Dashboard");
    context.insert("stats", &stats);
    context.insert("blogs", &blogs);
    context.insert("faqs", &faqs);
    context.insert("seo_pages", &seo_pages);
    Ok(render(
        &state.templates,
        &state.site,
        "admin_dashboard.html",
        &context,
    ))
}

/// The blog form as posted. Every field arrives as text.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogForm {
    pub slug: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub content: String,
    pub image: String,
    pub read_time: String,
    pub meta_title: String,
    pub meta_description: String,
    pub meta_keywords: String,
    pub is_published: Option<String>,
}

impl From<&Blog> for BlogForm {
    fn from(blog: &Blog) -> Self {
        Self {
            slug: blog.slug.clone(),
            title: blog.title.clone(),
            subtitle: blog.subtitle.clone().unwrap_or_default(),
            description: blog.description.clone().unwrap_or_default(),
            content: blog.content.clone(),
            image: blog.image.clone().unwrap_or_default(),
            read_time: blog.read_time.map(|t| t.to_string()).unwrap_or_default(),
            meta_title: blog.meta_title.clone().unwrap_or_default(),
            meta_description: blog.meta_description.clone().unwrap_or_default(),
            meta_keywords: blog.meta_keywords.clone().unwrap_or_default(),
            is_published: blog.is_published.then(|| "on".to_string()),
        }
    }
}

impl BlogForm {
    /// Blank keeps the stored read time.
    fn read_time(&self) -> Result<Option<i32>> {
        let raw = self.read_time.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse()
            .map(Some)
            .map_err(|_| ContentError::validation("Read time must be a whole number"))
    }

    fn to_new_blog(&self) -> Result<NewBlog> {
        Ok(NewBlog {
            slug: Some(self.slug.clone()),
            title: self.title.clone(),
            subtitle: Some(self.subtitle.clone()),
            description: Some(self.description.clone()),
            content: Some(self.content.clone()),
            image: Some(self.image.clone()),
            is_published: Some(self.is_published.is_some()),
            read_time: self.read_time()?,
            meta_title: Some(self.meta_title.clone()),
            meta_description: Some(self.meta_description.clone()),
            meta_keywords: Some(self.meta_keywords.clone()),
        })
    }

    fn to_patch(&self) -> Result<BlogPatch> {
        Ok(BlogPatch {
            title: Some(self.title.clone()),
            subtitle: Some(self.subtitle.clone()),
            description: Some(self.description.clone()),
            content: Some(self.content.clone()),
            image: Some(self.image.clone()),
            is_published: Some(self.is_published.is_some()),
            read_time: self.read_time()?,
            meta_title: Some(self.meta_title.clone()),
            meta_description: Some(self.meta_description.clone()),
            meta_keywords: Some(self.meta_keywords.clone()),
        })
    }
}

fn blog_form_context(site: &Site, form: &BlogForm, editing: bool, action: &str) -> Context {
    let mut context = admin_context(site, if editing { "Edit blog" } else { "New blog" });
    context.insert("form", form);
    context.insert("editing", &editing);
    context.insert("action", action);
    context
}

pub async fn new_blog_form<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    _admin: AdminPage,
) -> Response {
    let context = blog_form_context(&state.site, &BlogForm::default(), false, "/admin/blogs/new");
    render(&state.templates, &state.site, "admin_blog_form.html", &context)
}

pub async fn create_blog<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    _admin: AdminPage,
    Form(form): Form<BlogForm>,
) -> Response {
    let result = match form.to_new_blog() {
        Ok(input) => state.engine.create_blog(input).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(blog) => saved_redirect(&format!("/admin/blogs/{}/edit", blog.slug)),
        Err(err) => {
            let context = blog_form_context(&state.site, &form, false, "/admin/blogs/new");
            form_failure(&state, "admin_blog_form.html", context, err)
        }
    }
}

pub async fn edit_blog_form<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    _admin: AdminPage,
    Path(slug): Path<String>,
    Query(query): Query<FormQuery>,
) -> std::result::Result<Response, PageError> {
    let blog = state
        .engine
        .get_blog(&slug)
        .await
        .map_err(|err| PageError::from_content(&state.templates, &state.site, err))?;

    let action = format!("/admin/blogs/{}/edit", blog.slug);
    let mut context = blog_form_context(&state.site, &BlogForm::from(&blog), true, &action);
    context.insert("saved", &query.saved());
    Ok(render(
        &state.templates,
        &state.site,
        "admin_blog_form.html",
        &context,
    ))
}

pub async fn update_blog<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    _admin: AdminPage,
    Path(slug): Path<String>,
    Form(mut form): Form<BlogForm>,
) -> Response {
    let action = format!("/admin/blogs/{slug}/edit");
    let result = match form.to_patch() {
        Ok(patch) => state.engine.update_blog(&slug, patch).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(_) => saved_redirect(&action),
        Err(err) => {
            form.slug = slug;
            let context = blog_form_context(&state.site, &form, true, &action);
            form_failure(&state, "admin_blog_form.html", context, err)
        }
    }
}

pub async fn delete_blog<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    _admin: AdminPage,
    Path(slug): Path<String>,
) -> std::result::Result<Redirect, PageError> {
    state
        .engine
        .delete_blog(&slug)
        .await
        .map_err(|err| PageError::from_content(&state.templates, &state.site, err))?;
    Ok(Redirect::to("/admin"))
}

/// The FAQ form as posted. A blank `blog_id` means "not linked".
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqForm {
    pub question: String,
    pub answer: String,
    pub blog_id: String,
}

impl From<&FaqWithBlog> for FaqForm {
    fn from(faq: &FaqWithBlog) -> Self {
        Self {
            question: faq.faq.question.clone(),
            answer: faq.faq.answer.clone(),
            blog_id: faq.faq.blog_id.map(|id| id.to_string()).unwrap_or_default(),
        }
    }
}

impl FaqForm {
    fn blog_id(&self) -> Result<Option<Uuid>> {
        let raw = self.blog_id.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        Uuid::parse_str(raw)
            .map(Some)
            .map_err(|_| ContentError::BadRequest("Linked blog not found".to_string()))
    }

    fn to_new_faq(&self) -> Result<NewFaq> {
        Ok(NewFaq {
            question: self.question.clone(),
            answer: self.answer.clone(),
            blog_id: self.blog_id()?,
        })
    }

    fn to_patch(&self) -> Result<FaqPatch> {
        Ok(FaqPatch {
            question: Some(self.question.clone()),
            answer: Some(self.answer.clone()),
            blog_id: Some(self.blog_id()?),
        })
    }
}

/// Blogs offered for linking: search matches (drafts included) or the most
/// recent ones, always with the currently linked blog first.
async fn blog_choices<S: ContentStorage, I: BlogIndex>(
    state: &AppState<S, I>,
    search: &str,
    linked: Option<Uuid>,
) -> Result<Vec<Blog>> {
    let mut blogs = if search.is_empty() {
        let mut blogs = state.engine.list_blogs(false).await?;
        blogs.truncate(BLOG_PICKER_LIMIT);
        blogs
    } else {
        state
            .engine
            .search_blogs(search, false, BLOG_PICKER_LIMIT)
            .await?
    };
    if let Some(id) = linked {
        if !blogs.iter().any(|blog| blog.id == id) {
            if let Some(blog) = state.engine.storage().find_blog_by_id(id).await? {
                blogs.insert(0, blog);
            }
        }
    }
    Ok(blogs)
}

async fn faq_form_context<S: ContentStorage, I: BlogIndex>(
    state: &AppState<S, I>,
    form: &FaqForm,
    editing: bool,
    action: &str,
    search: &str,
) -> Result<Context> {
    let linked = Uuid::parse_str(form.blog_id.trim()).ok();
    let blogs = blog_choices(state, search, linked).await?;

    let mut context = admin_context(&state.site, if editing { "Edit FAQ" } else { "New FAQ" });
    context.insert("form", form);
    context.insert("editing", &editing);
    context.insert("action", action);
    context.insert("search", search);
    context.insert("blogs", &blogs);
    Ok(context)
}

pub async fn new_faq_form<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    _admin: AdminPage,
    Query(query): Query<FormQuery>,
) -> std::result::Result<Response, PageError> {
    let search = query.search.as_deref().unwrap_or_default().trim();
    let context = faq_form_context(&state, &FaqForm::default(), false, "/admin/faqs/new", search)
        .await
        .map_err(PageError::internal)?;
    Ok(render(
        &state.templates,
        &state.site,
        "admin_faq_form.html",
        &context,
    ))
}

pub async fn create_faq<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    _admin: AdminPage,
    Form(form): Form<FaqForm>,
) -> std::result::Result<Response, PageError> {
    let result = match form.to_new_faq() {
        Ok(input) => state.engine.create_faq(input).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(faq) => Ok(saved_redirect(&format!("/admin/faqs/{}/edit", faq.faq.id))),
        Err(err) => {
            let context = faq_form_context(&state, &form, false, "/admin/faqs/new", "")
                .await
                .map_err(PageError::internal)?;
            Ok(form_failure(&state, "admin_faq_form.html", context, err))
        }
    }
}

fn parse_faq_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ContentError::NotFound("FAQ"))
}

pub async fn edit_faq_form<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    _admin: AdminPage,
    Path(id): Path<String>,
    Query(query): Query<FormQuery>,
) -> std::result::Result<Response, PageError> {
    let page_error = |err: ContentError| PageError::from_content(&state.templates, &state.site, err);

    let id = parse_faq_id(&id).map_err(page_error)?;
    let faq = state.engine.get_faq(id).await.map_err(page_error)?;
    let action = format!("/admin/faqs/{id}/edit");
    let search = query.search.as_deref().unwrap_or_default().trim();
    let mut context = faq_form_context(&state, &FaqForm::from(&faq), true, &action, search)
        .await
        .map_err(page_error)?;
    context.insert("saved", &query.saved());
    Ok(render(
        &state.templates,
        &state.site,
        "admin_faq_form.html",
        &context,
    ))
}

pub async fn update_faq<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    _admin: AdminPage,
    Path(id): Path<String>,
    Form(form): Form<FaqForm>,
) -> std::result::Result<Response, PageError> {
    let page_error = |err: ContentError| PageError::from_content(&state.templates, &state.site, err);

    let id = parse_faq_id(&id).map_err(page_error)?;
    let action = format!("/admin/faqs/{id}/edit");
    let result = match form.to_patch() {
        Ok(patch) => state.engine.update_faq(id, patch).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(_) => Ok(saved_redirect(&action)),
        Err(err) => {
            let context = faq_form_context(&state, &form, true, &action, "")
                .await
                .map_err(page_error)?;
            Ok(form_failure(&state, "admin_faq_form.html", context, err))
        }
    }
}

pub async fn delete_faq<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    _admin: AdminPage,
    Path(id): Path<String>,
) -> std::result::Result<Redirect, PageError> {
    let page_error = |err: ContentError| PageError::from_content(&state.templates, &state.site, err);

    let id = parse_faq_id(&id).map_err(page_error)?;
    state.engine.delete_faq(id).await.map_err(page_error)?;
    Ok(Redirect::to("/admin"))
}

fn seo_form_context(site: &Site, form: &SeoPageInput, editing: bool, action: &str) -> Context {
    let title = if editing { "Edit SEO page" } else { "New SEO page" };
    let mut context = admin_context(site, title);
    context.insert("form", form);
    context.insert("editing", &editing);
    context.insert("action", action);
    context
}

pub async fn new_seo_form<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    _admin: AdminPage,
) -> Response {
    let context =
        seo_form_context(&state.site, &SeoPageInput::default(), false, "/admin/seo/new");
    render(&state.templates, &state.site, "admin_seo_form.html", &context)
}

pub async fn create_seo_page<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    _admin: AdminPage,
    Form(form): Form<SeoPageInput>,
) -> Response {
    match state.engine.create_seo_page(form.clone()).await {
        Ok(page) => saved_redirect(&format!("/admin/seo/{}/edit", page.slug)),
        Err(err) => {
            let context = seo_form_context(&state.site, &form, false, "/admin/seo/new");
            form_failure(&state, "admin_seo_form.html", context, err)
        }
    }
}

pub async fn edit_seo_form<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    _admin: AdminPage,
    Path(slug): Path<String>,
    Query(query): Query<FormQuery>,
) -> std::result::Result<Response, PageError> {
    let page = state
        .engine
        .get_seo_page(&slug)
        .await
        .map_err(|err| PageError::from_content(&state.templates, &state.site, err))?;

    let action = format!("/admin/seo/{}/edit", page.slug);
    let mut context =
        seo_form_context(&state.site, &SeoPageInput::from(&page), true, &action);
    context.insert("saved", &query.saved());
    Ok(render(
        &state.templates,
        &state.site,
        "admin_seo_form.html",
        &context,
    ))
}

/// The slug may change, so success redirects to the page's new address.
pub async fn update_seo_page<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    _admin: AdminPage,
    Path(slug): Path<String>,
    Form(form): Form<SeoPageInput>,
) -> Response {
    match state.engine.update_seo_page(&slug, form.clone()).await {
        Ok(page) => saved_redirect(&format!("/admin/seo/{}/edit", page.slug)),
        Err(err) => {
            let action = format!("/admin/seo/{slug}/edit");
            let context = seo_form_context(&state.site, &form, true, &action);
            form_failure(&state, "admin_seo_form.html", context, err)
        }
    }
}

pub async fn delete_seo_page<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    _admin: AdminPage,
    Path(slug): Path<String>,
) -> std::result::Result<Redirect, PageError> {
    state
        .engine
        .delete_seo_page(&slug)
        .await
        .map_err(|err| PageError::from_content(&state.templates, &state.site, err))?;
    Ok(Redirect::to("/admin"))
}

pub fn routes<S, I>() -> Router<AppState<S, I>>
where
    S: ContentStorage + 'static,
    I: BlogIndex,
{
    Router::new()
        .route(LOGIN_PATH, get(login_form::<S, I>).post(login::<S, I>))
        .route("/admin/logout", get(logout))
        .route("/admin", get(dashboard::<S, I>))
        .route(
            "/admin/blogs/new",
            get(new_blog_form::<S, I>).post(create_blog::<S, I>),
        )
        .route(
            "/admin/blogs/:slug/edit",
            get(edit_blog_form::<S, I>).post(update_blog::<S, I>),
        )
        .route("/admin/blogs/:slug/delete", post(delete_blog::<S, I>))
        .route(
            "/admin/faqs/new",
            get(new_faq_form::<S, I>).post(create_faq::<S, I>),
        )
        .route(
            "/admin/faqs/:id/edit",
            get(edit_faq_form::<S, I>).post(update_faq::<S, I>),
        )
        .route("/admin/faqs/:id/delete", post(delete_faq::<S, I>))
        .route(
            "/admin/seo/new",
            get(new_seo_form::<S, I>).post(create_seo_page::<S, I>),
        )
        .route(
            "/admin/seo/:slug/edit",
            get(edit_seo_form::<S, I>).post(update_seo_page::<S, I>),
        )
        .route("/admin/seo/:slug/delete", post(delete_seo_page::<S, I>))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blog_form_checkbox_and_read_time() {
        let form = BlogForm {
            title: "Fees".to_string(),
            read_time: " 7 ".to_string(),
            is_published: Some("on".to_string()),
            ..Default::default()
        };
        let patch = form.to_patch().unwrap();
        assert_eq!(patch.is_published, Some(true));
        assert_eq!(patch.read_time, Some(7));

        let unchecked = BlogForm {
            title: "Fees".to_string(),
            ..Default::default()
        };
        let input = unchecked.to_new_blog().unwrap();
        assert_eq!(input.is_published, Some(false));
        assert_eq!(input.read_time, None);
        assert_eq!(input.resolved_slug(), "fees");
    }

    #[test]
    fn test_blog_form_rejects_bad_read_time() {
        let form = BlogForm {
            title: "Fees".to_string(),
            read_time: "soon".to_string(),
            ..Default::default()
        };
        assert!(matches!(form.to_patch(), Err(ContentError::Validation(_))));
    }

    #[test]
    fn test_faq_form_blank_blog_unlinks() {
        let form = FaqForm {
            question: "Q?".to_string(),
            answer: "A.".to_string(),
            blog_id: String::new(),
        };
        assert_eq!(form.to_patch().unwrap().blog_id, Some(None));

        let garbage = FaqForm {
            blog_id: "not-a-uuid".to_string(),
            ..form
        };
        assert!(matches!(
            garbage.to_new_faq(),
            Err(ContentError::BadRequest(_))
        ));
    }
}
