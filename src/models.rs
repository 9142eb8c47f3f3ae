use crate::entities::blog_faqs::Model as BlogFaq;
use crate::entities::blogs::Model as Blog;
use crate::entities::seo_pages::Model as SeoPage;
use crate::error::{ContentError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ContentEvent {
    BlogCreated(Blog),
    BlogUpdated(Blog),
    BlogDeleted(String),
    FaqCreated(BlogFaq),
    FaqUpdated(BlogFaq),
    FaqDeleted(Uuid),
    SeoPageCreated(SeoPage),
    SeoPageUpdated(SeoPage),
    SeoPageDeleted(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBlog {
    pub slug: Option<String>,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
    pub is_published: Option<bool>,
    pub read_time: Option<i32>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
}

impl NewBlog {
    /// The explicit slug, or one derived from the title.
    pub fn resolved_slug(&self) -> String {
        match non_blank(self.slug.clone()) {
            Some(slug) => slug,
            None => slug::slugify(&self.title),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_text("Title", &self.title)?;
        require_slug(&self.resolved_slug())?;
        check_read_time(self.read_time)
    }
}

/// Partial blog update. Absent and null fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
    pub is_published: Option<bool>,
    pub read_time: Option<i32>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
}

impl BlogPatch {
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            require_text("Title", title)?;
        }
        check_read_time(self.read_time)
    }

    pub fn apply(self, blog: &mut Blog) {
        if let Some(title) = self.title {
            blog.title = title.trim().to_string();
        }
        if let Some(subtitle) = self.subtitle {
            blog.subtitle = non_blank(Some(subtitle));
        }
        if let Some(description) = self.description {
            blog.description = non_blank(Some(description));
        }
        if let Some(content) = self.content {
            blog.content = content;
        }
        if let Some(image) = self.image {
            blog.image = non_blank(Some(image));
        }
        if let Some(is_published) = self.is_published {
            blog.is_published = is_published;
        }
        if self.read_time.is_some() {
            blog.read_time = self.read_time;
        }
        if let Some(meta_title) = self.meta_title {
            blog.meta_title = non_blank(Some(meta_title));
        }
        if let Some(meta_description) = self.meta_description {
            blog.meta_description = non_blank(Some(meta_description));
        }
        if let Some(meta_keywords) = self.meta_keywords {
            blog.meta_keywords = non_blank(Some(meta_keywords));
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFaq {
    pub question: String,
    pub answer: String,
    pub blog_id: Option<Uuid>,
}

impl NewFaq {
    pub fn validate(&self) -> Result<()> {
        require_text("Question", &self.question)?;
        require_text("Answer", &self.answer)
    }
}

/// Partial FAQ update.
///
/// `blog_id` distinguishes an absent key (keep the link) from `null` (unlink).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqPatch {
    pub question: Option<String>,
    pub answer: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub blog_id: Option<Option<Uuid>>,
}

impl FaqPatch {
    pub fn validate(&self) -> Result<()> {
        if let Some(question) = &self.question {
            require_text("Question", question)?;
        }
        if let Some(answer) = &self.answer {
            require_text("Answer", answer)?;
        }
        Ok(())
    }
}

/// Full SEO page payload, used by both create and update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoPageInput {
    pub slug: String,
    pub meta_title: String,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub canonical_url: Option<String>,
    pub schema_markup: Option<String>,
    pub content: Option<String>,
}

impl SeoPageInput {
    pub fn validate(&self) -> Result<()> {
        require_slug(self.slug.trim())?;
        require_text("Meta title", &self.meta_title)?;
        if let Some(url) = non_blank(self.canonical_url.clone()) {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ContentError::validation(
                    "Canonical URL must be an absolute http(s) URL",
                ));
            }
        }
        if let Some(markup) = non_blank(self.schema_markup.clone()) {
            serde_json::from_str::<serde_json::Value>(&markup).map_err(|_| {
                ContentError::validation("Invalid JSON format in Schema Markup field")
            })?;
        }
        Ok(())
    }

    pub fn apply(self, page: &mut SeoPage) {
        page.slug = self.slug.trim().to_string();
        page.meta_title = self.meta_title.trim().to_string();
        page.meta_description = non_blank(self.meta_description);
        page.meta_keywords = non_blank(self.meta_keywords);
        page.og_title = non_blank(self.og_title);
        page.og_description = non_blank(self.og_description);
        page.og_image = non_blank(self.og_image);
        page.canonical_url = non_blank(self.canonical_url);
        page.schema_markup = non_blank(self.schema_markup);
        page.content = non_blank(self.content);
    }
}

impl From<&SeoPage> for SeoPageInput {
    fn from(page: &SeoPage) -> Self {
        Self {
            slug: page.slug.clone(),
            meta_title: page.meta_title.clone(),
            meta_description: page.meta_description.clone(),
            meta_keywords: page.meta_keywords.clone(),
            og_title: page.og_title.clone(),
            og_description: page.og_description.clone(),
            og_image: page.og_image.clone(),
            canonical_url: page.canonical_url.clone(),
            schema_markup: page.schema_markup.clone(),
            content: page.content.clone(),
        }
    }
}

/// The slice of a blog shown next to a linked FAQ.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogSummary {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub image: Option<String>,
}

impl From<&Blog> for BlogSummary {
    fn from(blog: &Blog) -> Self {
        Self {
            id: blog.id,
            slug: blog.slug.clone(),
            title: blog.title.clone(),
            subtitle: blog.subtitle.clone(),
            image: blog.image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqWithBlog {
    #[serde(flatten)]
    pub faq: BlogFaq,
    pub blog: Option<BlogSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogWithFaqs {
    #[serde(flatten)]
    pub blog: Blog,
    pub faqs: Vec<BlogFaq>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub blogs: u64,
    pub published_blogs: u64,
    pub faqs: u64,
    pub seo_pages: u64,
}

/// Lowercase ASCII letters and digits in hyphen separated groups.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.split('-').all(|part| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        })
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ContentError::validation(format!("{field} is required")));
    }
    Ok(())
}

fn require_slug(slug: &str) -> Result<()> {
    if !is_valid_slug(slug) {
        return Err(ContentError::validation(
            "Slug must contain only lowercase letters, digits and single hyphens",
        ));
    }
    Ok(())
}

fn check_read_time(read_time: Option<i32>) -> Result<()> {
    match read_time {
        Some(minutes) if minutes <= 0 => Err(ContentError::validation(
            "Read time must be a positive number of minutes",
        )),
        _ => Ok(()),
    }
}

fn double_option<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_format() {
        assert!(is_valid_slug("school-investment-101"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Upper-Case"));
        assert!(!is_valid_slug("double--hyphen"));
        assert!(!is_valid_slug("-leading"));
        assert!(!is_valid_slug("with space"));
    }

    #[test]
    fn test_new_blog_derives_slug_from_title() {
        let blog = NewBlog {
            title: "Why Schools Matter!".into(),
            ..Default::default()
        };
        assert_eq!(blog.resolved_slug(), "why-schools-matter");
        assert!(blog.validate().is_ok());
    }

    #[test]
    fn test_new_blog_rejects_blank_title() {
        let blog = NewBlog {
            title: "   ".into(),
            slug: Some("valid".into()),
            ..Default::default()
        };
        assert!(matches!(blog.validate(), Err(ContentError::Validation(_))));
    }

    #[test]
    fn test_blog_patch_rejects_non_positive_read_time() {
        let patch = BlogPatch {
            read_time: Some(0),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_faq_patch_blog_id_tristate() {
        let absent: FaqPatch = serde_json::from_str(r#"{"question":"Q?"}"#).unwrap();
        assert_eq!(absent.blog_id, None);

        let unlink: FaqPatch = serde_json::from_str(r#"{"blogId":null}"#).unwrap();
        assert_eq!(unlink.blog_id, Some(None));

        let id = Uuid::new_v4();
        let link: FaqPatch = serde_json::from_str(&format!(r#"{{"blogId":"{id}"}}"#)).unwrap();
        assert_eq!(link.blog_id, Some(Some(id)));
    }

    #[test]
    fn test_seo_input_rejects_invalid_schema_markup() {
        let input = SeoPageInput {
            slug: "pricing".into(),
            meta_title: "Pricing".into(),
            schema_markup: Some("{not json".into()),
            ..Default::default()
        };
        match input.validate() {
            Err(ContentError::Validation(msg)) => assert!(msg.contains("Schema Markup")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_seo_input_blank_fields_become_none() {
        let input = SeoPageInput {
            slug: " pricing ".into(),
            meta_title: "Pricing".into(),
            og_title: Some("   ".into()),
            ..Default::default()
        };
        let mut page = SeoPage {
            id: Uuid::new_v4(),
            slug: String::new(),
            meta_title: String::new(),
            meta_description: None,
            meta_keywords: None,
            og_title: Some("old".into()),
            og_description: None,
            og_image: None,
            canonical_url: None,
            schema_markup: None,
            content: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        input.apply(&mut page);
        assert_eq!(page.slug, "pricing");
        assert_eq!(page.og_title, None);
    }
}
