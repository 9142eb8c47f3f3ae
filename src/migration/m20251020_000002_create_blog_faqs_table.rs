use sea_orm_migration::{prelude::*, schema::*};

use super::m20251020_000001_create_blogs_table::Blogs;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BlogFaqs::Table)
                    .if_not_exists()
                    .col(uuid(BlogFaqs::Id).primary_key())
                    .col(string(BlogFaqs::Question))
                    .col(text(BlogFaqs::Answer))
                    .col(uuid_null(BlogFaqs::BlogId))
                    .col(timestamp_with_time_zone(BlogFaqs::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(BlogFaqs::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blog_faqs_blog_id")
                            .from(BlogFaqs::Table, BlogFaqs::BlogId)
                            .to(Blogs::Table, Blogs::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blog_faqs_blog_id")
                    .table(BlogFaqs::Table)
                    .col(BlogFaqs::BlogId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BlogFaqs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BlogFaqs {
    Table,
    Id,
    Question,
    Answer,
    BlogId,
    CreatedAt,
    UpdatedAt,
}
