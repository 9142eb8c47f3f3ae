use crate::entities::blog_faqs::{self, Model as BlogFaq};
use crate::entities::blogs::{self, Model as Blog};
use crate::entities::seo_pages::{self, Model as SeoPage};
use crate::error::{ContentError, Result};
use crate::migration::Migrator;
use crate::storage::ContentStorage;
use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

/// sea-orm backed storage. Works against Postgres in production and SQLite
/// in tests.
pub struct DatabaseStorage {
    db: DatabaseConnection,
}

impl DatabaseStorage {
    /// Connects, then brings the schema up to date.
    pub async fn connect(options: impl Into<ConnectOptions>) -> Result<Self> {
        let db = Database::connect(options).await?;
        Migrator::up(&db, None).await?;
        tracing::info!("database connected and migrated");
        Ok(Self { db })
    }
}

fn not_updated(entity: &'static str) -> impl FnOnce(DbErr) -> ContentError {
    move |err| match err {
        DbErr::RecordNotUpdated => ContentError::NotFound(entity),
        other => other.into(),
    }
}

#[async_trait]
impl ContentStorage for DatabaseStorage {
    async fn insert_blog(&self, blog: Blog) -> Result<Blog> {
        Ok(blog.into_active_model().reset_all().insert(&self.db).await?)
    }

    async fn find_blog_by_slug(&self, slug: &str) -> Result<Option<Blog>> {
        Ok(blogs::Entity::find()
            .filter(blogs::Column::Slug.eq(slug))
            .one(&self.db)
            .await?)
    }

    async fn find_blog_by_id(&self, id: Uuid) -> Result<Option<Blog>> {
        Ok(blogs::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn list_blogs(&self, published_only: bool) -> Result<Vec<Blog>> {
        let mut query = blogs::Entity::find();
        if published_only {
            query = query.filter(blogs::Column::IsPublished.eq(true));
        }
        Ok(query
            .order_by_desc(blogs::Column::UpdatedAt)
            .all(&self.db)
            .await?)
    }

    async fn update_blog(&self, blog: Blog) -> Result<Blog> {
        blog.into_active_model()
            .reset_all()
            .update(&self.db)
            .await
            .map_err(not_updated("Blog"))
    }

    async fn delete_blog(&self, slug: &str) -> Result<bool> {
        let txn = self.db.begin().await?;
        let Some(blog) = blogs::Entity::find()
            .filter(blogs::Column::Slug.eq(slug))
            .one(&txn)
            .await?
        else {
            return Ok(false);
        };

        // SQLite only honours ON DELETE SET NULL with foreign keys enabled.
        blog_faqs::Entity::update_many()
            .col_expr(blog_faqs::Column::BlogId, Expr::value(Option::<Uuid>::None))
            .filter(blog_faqs::Column::BlogId.eq(blog.id))
            .exec(&txn)
            .await?;
        let result = blogs::Entity::delete_by_id(blog.id).exec(&txn).await?;
        txn.commit().await?;

        Ok(result.rows_affected > 0)
    }

    async fn insert_faq(&self, faq: BlogFaq) -> Result<BlogFaq> {
        Ok(faq.into_active_model().reset_all().insert(&self.db).await?)
    }

    async fn find_faq(&self, id: Uuid) -> Result<Option<BlogFaq>> {
        Ok(blog_faqs::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn list_faqs(&self, blog_id: Option<Uuid>) -> Result<Vec<BlogFaq>> {
        let mut query = blog_faqs::Entity::find();
        if let Some(blog_id) = blog_id {
            query = query.filter(blog_faqs::Column::BlogId.eq(blog_id));
        }
        Ok(query
            .order_by_asc(blog_faqs::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    async fn update_faq(&self, faq: BlogFaq) -> Result<BlogFaq> {
        faq.into_active_model()
            .reset_all()
            .update(&self.db)
            .await
            .map_err(not_updated("FAQ"))
    }

    async fn delete_faq(&self, id: Uuid) -> Result<bool> {
        let result = blog_faqs::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn insert_seo_page(&self, page: SeoPage) -> Result<SeoPage> {
        Ok(page.into_active_model().reset_all().insert(&self.db).await?)
    }

    async fn find_seo_page(&self, slug: &str) -> Result<Option<SeoPage>> {
        Ok(seo_pages::Entity::find()
            .filter(seo_pages::Column::Slug.eq(slug))
            .one(&self.db)
            .await?)
    }

    async fn list_seo_pages(&self) -> Result<Vec<SeoPage>> {
        Ok(seo_pages::Entity::find()
            .order_by_asc(seo_pages::Column::Slug)
            .all(&self.db)
            .await?)
    }

    async fn update_seo_page(&self, page: SeoPage) -> Result<SeoPage> {
        page.into_active_model()
            .reset_all()
            .update(&self.db)
            .await
            .map_err(not_updated("SEO page"))
    }

    async fn delete_seo_page(&self, slug: &str) -> Result<bool> {
        let result = seo_pages::Entity::delete_many()
            .filter(seo_pages::Column::Slug.eq(slug))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn count_blogs(&self, published_only: bool) -> Result<u64> {
        let mut query = blogs::Entity::find();
        if published_only {
            query = query.filter(blogs::Column::IsPublished.eq(true));
        }
        Ok(query.count(&self.db).await?)
    }

    async fn count_faqs(&self) -> Result<u64> {
        Ok(blog_faqs::Entity::find().count(&self.db).await?)
    }

    async fn count_seo_pages(&self) -> Result<u64> {
        Ok(seo_pages::Entity::find().count(&self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    async fn setup_test_db() -> Result<DatabaseStorage> {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).sqlx_logging(false);
        DatabaseStorage::connect(options).await
    }

    fn blog(slug: &str, published: bool) -> Blog {
        let now = Utc::now();
        Blog {
            id: Uuid::new_v4(),
            slug: slug.to_string(),
            title: format!("Title {slug}"),
            subtitle: Some("Subtitle".to_string()),
            description: None,
            content: "<p>Body</p>".to_string(),
            image: None,
            is_published: published,
            read_time: Some(4),
            meta_title: None,
            meta_description: None,
            meta_keywords: Some("schools, investment".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_crud_operations() -> Result<()> {
        let storage = setup_test_db().await?;

        let inserted = storage.insert_blog(blog("db-post", false)).await?;
        let found = storage.find_blog_by_slug("db-post").await?.unwrap();
        assert_eq!(found.id, inserted.id);
        assert_eq!(found.keywords(), vec!["schools", "investment"]);

        let mut changed = found.clone();
        changed.is_published = true;
        changed.title = "Renamed".to_string();
        let updated = storage.update_blog(changed).await?;
        assert!(updated.is_published);
        assert_eq!(updated.title, "Renamed");

        assert!(storage.delete_blog("db-post").await?);
        assert!(storage.find_blog_by_slug("db-post").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_unique_slug_maps_to_conflict() -> Result<()> {
        let storage = setup_test_db().await?;
        storage.insert_blog(blog("dup", true)).await?;
        let result = storage.insert_blog(blog("dup", true)).await;
        assert!(matches!(result, Err(ContentError::Conflict(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_blog_is_not_found() -> Result<()> {
        let storage = setup_test_db().await?;
        let result = storage.update_blog(blog("ghost", true)).await;
        assert!(matches!(result, Err(ContentError::NotFound("Blog"))));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_blog_unlinks_faqs() -> Result<()> {
        let storage = setup_test_db().await?;
        let post = storage.insert_blog(blog("parent", true)).await?;
        let now = Utc::now();
        let faq = storage
            .insert_faq(BlogFaq {
                id: Uuid::new_v4(),
                question: "Why?".to_string(),
                answer: "Because.".to_string(),
                blog_id: Some(post.id),
                created_at: now,
                updated_at: now,
            })
            .await?;

        assert_eq!(storage.list_faqs(Some(post.id)).await?.len(), 1);
        storage.delete_blog("parent").await?;

        let orphan = storage.find_faq(faq.id).await?.unwrap();
        assert_eq!(orphan.blog_id, None);
        assert_eq!(storage.count_faqs().await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_counts() -> Result<()> {
        let storage = setup_test_db().await?;
        storage.insert_blog(blog("a", true)).await?;
        storage.insert_blog(blog("b", false)).await?;
        assert_eq!(storage.count_blogs(false).await?, 2);
        assert_eq!(storage.count_blogs(true).await?, 1);
        assert_eq!(storage.count_seo_pages().await?, 0);
        Ok(())
    }
}
