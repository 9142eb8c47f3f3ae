use crate::entities::blog_faqs::Model as BlogFaq;
use crate::entities::blogs::Model as Blog;
use crate::entities::seo_pages::Model as SeoPage;
use crate::error::{ContentError, Result};
use crate::storage::ContentStorage;
use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct MemoryStorage {
    blogs: DashMap<Uuid, Blog>,
    faqs: DashMap<Uuid, BlogFaq>,
    seo_pages: DashMap<Uuid, SeoPage>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn blog_slug_taken(&self, slug: &str, except: Uuid) -> bool {
        self.blogs
            .iter()
            .any(|entry| entry.slug == slug && entry.id != except)
    }

    fn seo_slug_taken(&self, slug: &str, except: Uuid) -> bool {
        self.seo_pages
            .iter()
            .any(|entry| entry.slug == slug && entry.id != except)
    }
}

fn duplicate(slug: &str) -> ContentError {
    ContentError::Conflict(format!("Slug already exists ({slug})"))
}

#[async_trait]
impl ContentStorage for MemoryStorage {
    async fn insert_blog(&self, blog: Blog) -> Result<Blog> {
        if self.blog_slug_taken(&blog.slug, blog.id) {
            return Err(duplicate(&blog.slug));
        }
        self.blogs.insert(blog.id, blog.clone());
        Ok(blog)
    }

    async fn find_blog_by_slug(&self, slug: &str) -> Result<Option<Blog>> {
        Ok(self
            .blogs
            .iter()
            .find(|entry| entry.slug == slug)
            .map(|entry| entry.value().clone()))
    }

    async fn find_blog_by_id(&self, id: Uuid) -> Result<Option<Blog>> {
        Ok(self.blogs.get(&id).map(|blog| blog.clone()))
    }

    async fn list_blogs(&self, published_only: bool) -> Result<Vec<Blog>> {
        let mut blogs: Vec<Blog> = self
            .blogs
            .iter()
            .filter(|entry| !published_only || entry.is_published)
            .map(|entry| entry.value().clone())
            .collect();
        blogs.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(blogs)
    }

    async fn update_blog(&self, blog: Blog) -> Result<Blog> {
        if !self.blogs.contains_key(&blog.id) {
            return Err(ContentError::NotFound("Blog"));
        }
        if self.blog_slug_taken(&blog.slug, blog.id) {
            return Err(duplicate(&blog.slug));
        }
        self.blogs.insert(blog.id, blog.clone());
        Ok(blog)
    }

    async fn delete_blog(&self, slug: &str) -> Result<bool> {
        let id = match self.find_blog_by_slug(slug).await? {
            Some(blog) => blog.id,
            None => return Ok(false),
        };
        self.blogs.remove(&id);
        // Mirrors ON DELETE SET NULL.
        for mut faq in self.faqs.iter_mut() {
            if faq.blog_id == Some(id) {
                faq.blog_id = None;
            }
        }
        Ok(true)
    }

    async fn insert_faq(&self, faq: BlogFaq) -> Result<BlogFaq> {
        self.faqs.insert(faq.id, faq.clone());
        Ok(faq)
    }

    async fn find_faq(&self, id: Uuid) -> Result<Option<BlogFaq>> {
        Ok(self.faqs.get(&id).map(|faq| faq.clone()))
    }

    async fn list_faqs(&self, blog_id: Option<Uuid>) -> Result<Vec<BlogFaq>> {
        let mut faqs: Vec<BlogFaq> = self
            .faqs
            .iter()
            .filter(|entry| blog_id.is_none() || entry.blog_id == blog_id)
            .map(|entry| entry.value().clone())
            .collect();
        faqs.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(faqs)
    }

    async fn update_faq(&self, faq: BlogFaq) -> Result<BlogFaq> {
        if !self.faqs.contains_key(&faq.id) {
            return Err(ContentError::NotFound("FAQ"));
        }
        self.faqs.insert(faq.id, faq.clone());
        Ok(faq)
    }

    async fn delete_faq(&self, id: Uuid) -> Result<bool> {
        Ok(self.faqs.remove(&id).is_some())
    }

    async fn insert_seo_page(&self, page: SeoPage) -> Result<SeoPage> {
        if self.seo_slug_taken(&page.slug, page.id) {
            return Err(duplicate(&page.slug));
        }
        self.seo_pages.insert(page.id, page.clone());
        Ok(page)
    }

    async fn find_seo_page(&self, slug: &str) -> Result<Option<SeoPage>> {
        Ok(self
            .seo_pages
            .iter()
            .find(|entry| entry.slug == slug)
            .map(|entry| entry.value().clone()))
    }

    async fn list_seo_pages(&self) -> Result<Vec<SeoPage>> {
        let mut pages: Vec<SeoPage> = self
            .seo_pages
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        pages.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(pages)
    }

    async fn update_seo_page(&self, page: SeoPage) -> Result<SeoPage> {
        if !self.seo_pages.contains_key(&page.id) {
            return Err(ContentError::NotFound("SEO page"));
        }
        if self.seo_slug_taken(&page.slug, page.id) {
            return Err(duplicate(&page.slug));
        }
        self.seo_pages.insert(page.id, page.clone());
        Ok(page)
    }

    async fn delete_seo_page(&self, slug: &str) -> Result<bool> {
        let id = match self.find_seo_page(slug).await? {
            Some(page) => page.id,
            None => return Ok(false),
        };
        Ok(self.seo_pages.remove(&id).is_some())
    }

    async fn count_blogs(&self, published_only: bool) -> Result<u64> {
        Ok(self
            .blogs
            .iter()
            .filter(|entry| !published_only || entry.is_published)
            .count() as u64)
    }

    async fn count_faqs(&self) -> Result<u64> {
        Ok(self.faqs.len() as u64)
    }

    async fn count_seo_pages(&self) -> Result<u64> {
        Ok(self.seo_pages.len() as u64)
    }
}
