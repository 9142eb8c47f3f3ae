use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SeoPages::Table)
                    .if_not_exists()
                    .col(uuid(SeoPages::Id).primary_key())
                    .col(string(SeoPages::Slug).unique_key())
                    .col(string(SeoPages::MetaTitle))
                    .col(text_null(SeoPages::MetaDescription))
                    .col(string_null(SeoPages::MetaKeywords))
                    .col(string_null(SeoPages::OgTitle))
                    .col(text_null(SeoPages::OgDescription))
                    .col(string_null(SeoPages::OgImage))
                    .col(string_null(SeoPages::CanonicalUrl))
                    .col(text_null(SeoPages::SchemaMarkup))
                    .col(text_null(SeoPages::Content))
                    .col(timestamp_with_time_zone(SeoPages::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(SeoPages::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SeoPages::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SeoPages {
    Table,
    Id,
    Slug,
    MetaTitle,
    MetaDescription,
    MetaKeywords,
    OgTitle,
    OgDescription,
    OgImage,
    CanonicalUrl,
    SchemaMarkup,
    Content,
    CreatedAt,
    UpdatedAt,
}
