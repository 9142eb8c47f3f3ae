use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251020_000001_create_blogs_table::Migration),
            Box::new(m20251020_000002_create_blog_faqs_table::Migration),
            Box::new(m20251020_000003_create_seo_pages_table::Migration),
        ]
    }
}

pub mod m20251020_000001_create_blogs_table;
pub mod m20251020_000002_create_blog_faqs_table;
pub mod m20251020_000003_create_seo_pages_table;
