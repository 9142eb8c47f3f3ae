use crate::entities::blogs::Model as Blog;
use anyhow::Result;
use async_trait::async_trait;

/// The searchable text of a blog, keyed by slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedBlog {
    pub slug: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub is_published: bool,
}

impl From<&Blog> for IndexedBlog {
    fn from(blog: &Blog) -> Self {
        Self {
            slug: blog.slug.clone(),
            title: blog.title.clone(),
            subtitle: blog.subtitle.clone().unwrap_or_default(),
            description: blog.description.clone().unwrap_or_default(),
            is_published: blog.is_published,
        }
    }
}

#[async_trait]
pub trait BlogIndex: Clone + Send + Sync + 'static {
    /// Adds the blog, replacing any entry with the same slug.
    async fn upsert(&self, blog: IndexedBlog) -> Result<()>;
    async fn remove(&self, slug: &str) -> Result<()>;
    async fn clear(&self) -> Result<()>;
    /// Matching slugs with their scores, best first. With `published_only`,
    /// drafts are dropped before `limit` is applied.
    async fn search(
        &self,
        query: &str,
        published_only: bool,
        limit: usize,
    ) -> Result<Vec<(String, f32)>>;
}

pub mod memory;
pub mod tantivy_index;

pub use memory::MemoryIndex;
pub use tantivy_index::TantivyIndex;
