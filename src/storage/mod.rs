use crate::entities::blog_faqs::Model as BlogFaq;
use crate::entities::blogs::Model as Blog;
use crate::entities::seo_pages::Model as SeoPage;
use crate::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Persistence for blogs, FAQs and SEO pages.
///
/// Lookups return `Ok(None)` for missing records; the engine turns that into
/// a not-found error. Inserts and updates take complete models.
#[async_trait]
pub trait ContentStorage: Send + Sync {
    async fn insert_blog(&self, blog: Blog) -> Result<Blog>;
    async fn find_blog_by_slug(&self, slug: &str) -> Result<Option<Blog>>;
    async fn find_blog_by_id(&self, id: Uuid) -> Result<Option<Blog>>;
    /// Ordered by `updated_at`, newest first.
    async fn list_blogs(&self, published_only: bool) -> Result<Vec<Blog>>;
    async fn update_blog(&self, blog: Blog) -> Result<Blog>;
    async fn delete_blog(&self, slug: &str) -> Result<bool>;

    async fn insert_faq(&self, faq: BlogFaq) -> Result<BlogFaq>;
    async fn find_faq(&self, id: Uuid) -> Result<Option<BlogFaq>>;
    /// Ordered by `created_at`, oldest first.
    async fn list_faqs(&self, blog_id: Option<Uuid>) -> Result<Vec<BlogFaq>>;
    async fn update_faq(&self, faq: BlogFaq) -> Result<BlogFaq>;
    async fn delete_faq(&self, id: Uuid) -> Result<bool>;

    async fn insert_seo_page(&self, page: SeoPage) -> Result<SeoPage>;
    async fn find_seo_page(&self, slug: &str) -> Result<Option<SeoPage>>;
    /// Ordered by slug.
    async fn list_seo_pages(&self) -> Result<Vec<SeoPage>>;
    async fn update_seo_page(&self, page: SeoPage) -> Result<SeoPage>;
    async fn delete_seo_page(&self, slug: &str) -> Result<bool>;

    async fn count_blogs(&self, published_only: bool) -> Result<u64>;
    async fn count_faqs(&self) -> Result<u64>;
    async fn count_seo_pages(&self) -> Result<u64>;
}

pub mod database;
pub mod memory;
