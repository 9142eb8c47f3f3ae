pub mod api;
pub mod auth;
pub mod config;
pub mod entities;
pub mod error;
pub mod migration;
mod models;
pub mod notifications;
pub mod pages;
pub mod search;
pub mod seo;
pub mod storage;

pub use entities::blog_faqs::Model as BlogFaq;
pub use entities::blogs::Model as Blog;
pub use entities::seo_pages::Model as SeoPage;
pub use error::{ContentError, Result};
pub use models::{
    is_valid_slug, BlogPatch, BlogSummary, BlogWithFaqs, ContentEvent, DashboardStats, FaqPatch,
    FaqWithBlog, NewBlog, NewFaq, SeoPageInput,
};

use chrono::Utc;
use models::non_blank;
use notifications::NotificationHub;
use search::{BlogIndex, IndexedBlog};
use std::collections::HashMap;
use storage::ContentStorage;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use uuid::Uuid;

/// Blogs, FAQs and SEO pages on top of a storage backend, with a search
/// index kept in step with blog writes and an event feed of every change.
pub struct ContentEngine<S: ContentStorage, I: BlogIndex> {
    storage: S,
    index: I,
    hub: NotificationHub,
}

impl<S: ContentStorage, I: BlogIndex> ContentEngine<S, I> {
    pub fn new(storage: S, index: I) -> Self {
        Self {
            storage,
            index,
            hub: NotificationHub::new(),
        }
    }

    pub fn subscribe(&self) -> BroadcastStream<ContentEvent> {
        self.hub.subscribe()
    }

    pub fn event_sender(&self) -> broadcast::Sender<ContentEvent> {
        self.hub.sender()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub async fn create_blog(&self, input: NewBlog) -> Result<Blog> {
        input.validate()?;
        let slug = input.resolved_slug();
        if self.storage.find_blog_by_slug(&slug).await?.is_some() {
            return Err(ContentError::Conflict(format!(
                "A blog with slug '{slug}' already exists"
            )));
        }

        let now = Utc::now();
        let blog = Blog {
            id: Uuid::new_v4(),
            slug,
            title: input.title.trim().to_string(),
            subtitle: non_blank(input.subtitle),
            description: non_blank(input.description),
            content: input.content.unwrap_or_default(),
            image: non_blank(input.image),
            is_published: input.is_published.unwrap_or(false),
            read_time: input.read_time,
            meta_title: non_blank(input.meta_title),
            meta_description: non_blank(input.meta_description),
            meta_keywords: non_blank(input.meta_keywords),
            created_at: now,
            updated_at: now,
        };
        let blog = self.storage.insert_blog(blog).await?;
        self.index.upsert(IndexedBlog::from(&blog)).await?;

        tracing::info!(slug = %blog.slug, "blog created");
        self.hub.publish(ContentEvent::BlogCreated(blog.clone()));
        Ok(blog)
    }

    pub async fn get_blog(&self, slug: &str) -> Result<Blog> {
        self.storage
            .find_blog_by_slug(slug)
            .await?
            .ok_or(ContentError::NotFound("Blog"))
    }

    pub async fn get_blog_by_id(&self, id: Uuid) -> Result<Blog> {
        self.storage
            .find_blog_by_id(id)
            .await?
            .ok_or(ContentError::NotFound("Blog"))
    }

    pub async fn list_blogs(&self, published_only: bool) -> Result<Vec<Blog>> {
        self.storage.list_blogs(published_only).await
    }

    /// Blogs matching `query`, best match first. Slugs the index still knows
    /// but storage no longer has are skipped.
    pub async fn search_blogs(
        &self,
        query: &str,
        published_only: bool,
        limit: usize,
    ) -> Result<Vec<Blog>> {
        let hits = self.index.search(query, published_only, limit).await?;
        let mut blogs = Vec::with_capacity(hits.len());
        for (slug, _score) in hits {
            if let Some(blog) = self.storage.find_blog_by_slug(&slug).await? {
                if !published_only || blog.is_published {
                    blogs.push(blog);
                }
            }
        }
        Ok(blogs)
    }

    pub async fn update_blog(&self, slug: &str, patch: BlogPatch) -> Result<Blog> {
        patch.validate()?;
        let mut blog = self.get_blog(slug).await?;
        patch.apply(&mut blog);
        blog.updated_at = Utc::now();

        let blog = self.storage.update_blog(blog).await?;
        self.index.upsert(IndexedBlog::from(&blog)).await?;

        tracing::info!(slug = %blog.slug, published = blog.is_published, "blog updated");
        self.hub.publish(ContentEvent::BlogUpdated(blog.clone()));
        Ok(blog)
    }

    pub async fn delete_blog(&self, slug: &str) -> Result<()> {
        if !self.storage.delete_blog(slug).await? {
            return Err(ContentError::NotFound("Blog"));
        }
        self.index.remove(slug).await?;

        tracing::info!(slug, "blog deleted");
        self.hub.publish(ContentEvent::BlogDeleted(slug.to_string()));
        Ok(())
    }

    pub async fn blog_with_faqs(&self, slug: &str) -> Result<BlogWithFaqs> {
        let blog = self.get_blog(slug).await?;
        let faqs = self.storage.list_faqs(Some(blog.id)).await?;
        Ok(BlogWithFaqs { blog, faqs })
    }

    async fn linked_blog(&self, blog_id: Option<Uuid>) -> Result<Option<Blog>> {
        match blog_id {
            Some(id) => self
                .storage
                .find_blog_by_id(id)
                .await?
                .map(Some)
                .ok_or_else(|| ContentError::BadRequest("Linked blog not found".to_string())),
            None => Ok(None),
        }
    }

    pub async fn create_faq(&self, input: NewFaq) -> Result<FaqWithBlog> {
        input.validate()?;
        let blog = self.linked_blog(input.blog_id).await?;

        let now = Utc::now();
        let faq = BlogFaq {
            id: Uuid::new_v4(),
            question: input.question.trim().to_string(),
            answer: input.answer.trim().to_string(),
            blog_id: input.blog_id,
            created_at: now,
            updated_at: now,
        };
        let faq = self.storage.insert_faq(faq).await?;

        tracing::info!(id = %faq.id, "faq created");
        self.hub.publish(ContentEvent::FaqCreated(faq.clone()));
        Ok(FaqWithBlog {
            faq,
            blog: blog.as_ref().map(BlogSummary::from),
        })
    }

    pub async fn get_faq(&self, id: Uuid) -> Result<FaqWithBlog> {
        let faq = self
            .storage
            .find_faq(id)
            .await?
            .ok_or(ContentError::NotFound("FAQ"))?;
        let blog = match faq.blog_id {
            Some(blog_id) => self.storage.find_blog_by_id(blog_id).await?,
            None => None,
        };
        Ok(FaqWithBlog {
            faq,
            blog: blog.as_ref().map(BlogSummary::from),
        })
    }

    pub async fn list_faqs(&self, blog_id: Option<Uuid>) -> Result<Vec<FaqWithBlog>> {
        let faqs = self.storage.list_faqs(blog_id).await?;
        let blogs: HashMap<Uuid, BlogSummary> = self
            .storage
            .list_blogs(false)
            .await?
            .iter()
            .map(|blog| (blog.id, BlogSummary::from(blog)))
            .collect();

        Ok(faqs
            .into_iter()
            .map(|faq| {
                let blog = faq.blog_id.and_then(|id| blogs.get(&id).cloned());
                FaqWithBlog { faq, blog }
            })
            .collect())
    }

    pub async fn update_faq(&self, id: Uuid, patch: FaqPatch) -> Result<FaqWithBlog> {
        patch.validate()?;
        let mut faq = self
            .storage
            .find_faq(id)
            .await?
            .ok_or(ContentError::NotFound("FAQ"))?;

        let blog_id = match patch.blog_id {
            Some(requested) => requested,
            None => faq.blog_id,
        };
        let blog = match patch.blog_id {
            Some(requested) => self.linked_blog(requested).await?,
            None => match blog_id {
                Some(current) => self.storage.find_blog_by_id(current).await?,
                None => None,
            },
        };

        if let Some(question) = patch.question {
            faq.question = question.trim().to_string();
        }
        if let Some(answer) = patch.answer {
            faq.answer = answer.trim().to_string();
        }
        faq.blog_id = blog_id;
        faq.updated_at = Utc::now();

        let faq = self.storage.update_faq(faq).await?;

        tracing::info!(id = %faq.id, "faq updated");
        self.hub.publish(ContentEvent::FaqUpdated(faq.clone()));
        Ok(FaqWithBlog {
            faq,
            blog: blog.as_ref().map(BlogSummary::from),
        })
    }

    pub async fn delete_faq(&self, id: Uuid) -> Result<()> {
        if !self.storage.delete_faq(id).await? {
            return Err(ContentError::NotFound("FAQ"));
        }
        tracing::info!(%id, "faq deleted");
        self.hub.publish(ContentEvent::FaqDeleted(id));
        Ok(())
    }

    pub async fn create_seo_page(&self, input: SeoPageInput) -> Result<SeoPage> {
        input.validate()?;
        let slug = input.slug.trim().to_string();
        if self.storage.find_seo_page(&slug).await?.is_some() {
            return Err(ContentError::Conflict(format!(
                "An SEO page with slug '{slug}' already exists"
            )));
        }

        let now = Utc::now();
        let mut page = SeoPage {
            id: Uuid::new_v4(),
            slug,
            meta_title: String::new(),
            meta_description: None,
            meta_keywords: None,
            og_title: None,
            og_description: None,
            og_image: None,
            canonical_url: None,
            schema_markup: None,
            content: None,
            created_at: now,
            updated_at: now,
        };
        input.apply(&mut page);
        let page = self.storage.insert_seo_page(page).await?;

        tracing::info!(slug = %page.slug, "seo page created");
        self.hub.publish(ContentEvent::SeoPageCreated(page.clone()));
        Ok(page)
    }

    pub async fn get_seo_page(&self, slug: &str) -> Result<SeoPage> {
        self.storage
            .find_seo_page(slug)
            .await?
            .ok_or(ContentError::NotFound("SEO page"))
    }

    pub async fn list_seo_pages(&self) -> Result<Vec<SeoPage>> {
        self.storage.list_seo_pages().await
    }

    /// Replaces every field of the page stored under `slug`, including the
    /// slug itself.
    pub async fn update_seo_page(&self, slug: &str, input: SeoPageInput) -> Result<SeoPage> {
        input.validate()?;
        let mut page = self.get_seo_page(slug).await?;

        let new_slug = input.slug.trim();
        if new_slug != page.slug && self.storage.find_seo_page(new_slug).await?.is_some() {
            return Err(ContentError::Conflict(format!(
                "An SEO page with slug '{new_slug}' already exists"
            )));
        }

        input.apply(&mut page);
        page.updated_at = Utc::now();
        let page = self.storage.update_seo_page(page).await?;

        tracing::info!(slug = %page.slug, "seo page updated");
        self.hub.publish(ContentEvent::SeoPageUpdated(page.clone()));
        Ok(page)
    }

    pub async fn delete_seo_page(&self, slug: &str) -> Result<()> {
        if !self.storage.delete_seo_page(slug).await? {
            return Err(ContentError::NotFound("SEO page"));
        }
        tracing::info!(slug, "seo page deleted");
        self.hub.publish(ContentEvent::SeoPageDeleted(slug.to_string()));
        Ok(())
    }

    pub async fn stats(&self) -> Result<DashboardStats> {
        let (blogs, published_blogs, faqs, seo_pages) = tokio::try_join!(
            self.storage.count_blogs(false),
            self.storage.count_blogs(true),
            self.storage.count_faqs(),
            self.storage.count_seo_pages(),
        )?;
        Ok(DashboardStats {
            blogs,
            published_blogs,
            faqs,
            seo_pages,
        })
    }

    /// Rebuilds the search index from storage and returns the number of
    /// blogs indexed.
    pub async fn reindex(&self) -> Result<usize> {
        self.index.clear().await?;
        let blogs = self.storage.list_blogs(false).await?;
        for blog in &blogs {
            self.index.upsert(IndexedBlog::from(blog)).await?;
        }
        tracing::info!(count = blogs.len(), "search index rebuilt");
        Ok(blogs.len())
    }
}
