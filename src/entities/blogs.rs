use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blogs")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub slug: String,
    pub title: String,
    pub subtitle: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub image: Option<String>,
    pub is_published: bool,
    pub read_time: Option<i32>,
    pub meta_title: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::blog_faqs::Entity")]
    Faqs,
}

impl Related<super::blog_faqs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Faqs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Comma separated `meta_keywords`, trimmed, blanks dropped.
    pub fn keywords(&self) -> Vec<String> {
        split_keywords(self.meta_keywords.as_deref())
    }
}

pub(crate) fn split_keywords(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}
