use crate::search::{BlogIndex, IndexedBlog};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Case-insensitive substring matching over title, subtitle and description.
#[derive(Clone, Default)]
pub struct MemoryIndex {
    blogs: Arc<Mutex<HashMap<String, IndexedBlog>>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> anyhow::Error {
    anyhow!("memory index lock poisoned")
}

#[async_trait]
impl BlogIndex for MemoryIndex {
    async fn upsert(&self, blog: IndexedBlog) -> Result<()> {
        let mut blogs = self.blogs.lock().map_err(poisoned)?;
        blogs.insert(blog.slug.clone(), blog);
        Ok(())
    }

    async fn remove(&self, slug: &str) -> Result<()> {
        let mut blogs = self.blogs.lock().map_err(poisoned)?;
        blogs.remove(slug);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.blogs.lock().map_err(poisoned)?.clear();
        Ok(())
    }

    async fn search(
        &self,
        query: &str,
        published_only: bool,
        limit: usize,
    ) -> Result<Vec<(String, f32)>> {
        let blogs = self.blogs.lock().map_err(poisoned)?;
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut results: Vec<(String, f32)> = blogs
            .values()
            .filter(|blog| !published_only || blog.is_published)
            .filter_map(|blog| {
                // Title hits rank above subtitle/description hits.
                if blog.title.to_lowercase().contains(&query) {
                    Some((blog.slug.clone(), 2.0))
                } else if blog.subtitle.to_lowercase().contains(&query)
                    || blog.description.to_lowercase().contains(&query)
                {
                    Some((blog.slug.clone(), 1.0))
                } else {
                    None
                }
            })
            .collect();

        results.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        results.truncate(limit);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(slug: &str, title: &str, description: &str) -> IndexedBlog {
        IndexedBlog {
            slug: slug.to_string(),
            title: title.to_string(),
            subtitle: String::new(),
            description: description.to_string(),
            is_published: true,
        }
    }

    #[tokio::test]
    async fn test_index_and_search() -> Result<()> {
        let index = MemoryIndex::new();
        index
            .upsert(entry("rust", "Rust Programming", "Learn Rust language"))
            .await?;
        index
            .upsert(entry("python", "Python Guide", "Python programming tutorial"))
            .await?;

        assert_eq!(index.search("rust", false, 10).await?.len(), 1);
        assert_eq!(index.search("programming", false, 10).await?.len(), 2);
        assert!(index.search("javascript", false, 10).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_title_hits_rank_first() -> Result<()> {
        let index = MemoryIndex::new();
        index
            .upsert(entry("guide", "Python Guide", "Programming tutorial"))
            .await?;
        index
            .upsert(entry("programming", "Programming Basics", "Start here"))
            .await?;

        let results = index.search("PROGRAMMING", false, 10).await?;
        assert_eq!(results[0].0, "programming");
        assert_eq!(results[1].0, "guide");
        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_replaces_and_remove_deletes() -> Result<()> {
        let index = MemoryIndex::new();
        index.upsert(entry("post", "Old title", "")).await?;
        index.upsert(entry("post", "New title", "")).await?;
        assert!(index.search("old", false, 10).await?.is_empty());
        assert_eq!(index.search("new", false, 10).await?.len(), 1);

        index.remove("post").await?;
        assert!(index.search("new", false, 10).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_drafts_do_not_use_up_the_limit() -> Result<()> {
        let index = MemoryIndex::new();
        index
            .upsert(IndexedBlog {
                is_published: false,
                ..entry("draft", "Rust Draft", "")
            })
            .await?;
        index
            .upsert(entry("guide", "Systems Guide", "All about rust"))
            .await?;

        let public = index.search("rust", true, 1).await?;
        assert_eq!(public, vec![("guide".to_string(), 1.0)]);
        assert_eq!(index.search("rust", false, 1).await?[0].0, "draft");
        Ok(())
    }

    #[tokio::test]
    async fn test_blank_query_matches_nothing() -> Result<()> {
        let index = MemoryIndex::new();
        index.upsert(entry("post", "Anything", "")).await?;
        assert!(index.search("   ", false, 10).await?.is_empty());
        Ok(())
    }
}
