use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Blogs::Table)
                    .if_not_exists()
                    .col(uuid(Blogs::Id).primary_key())
                    .col(string(Blogs::Slug).unique_key())
                    .col(string(Blogs::Title))
                    .col(string_null(Blogs::Subtitle))
                    .col(text_null(Blogs::Description))
                    .col(text(Blogs::Content))
                    .col(string_null(Blogs::Image))
                    .col(boolean(Blogs::IsPublished).default(false))
                    .col(integer_null(Blogs::ReadTime))
                    .col(string_null(Blogs::MetaTitle))
                    .col(text_null(Blogs::MetaDescription))
                    .col(string_null(Blogs::MetaKeywords))
                    .col(timestamp_with_time_zone(Blogs::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Blogs::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Blogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Blogs {
    Table,
    Id,
    Slug,
    Title,
    Subtitle,
    Description,
    Content,
    Image,
    IsPublished,
    ReadTime,
    MetaTitle,
    MetaDescription,
    MetaKeywords,
    CreatedAt,
    UpdatedAt,
}
