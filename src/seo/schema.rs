//! schema.org JSON-LD builders.

use crate::config::Site;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};

const CONTEXT: &str = "https://schema.org";
pub const ORGANIZATION_DESCRIPTION: &str =
    "AI-powered platform helping investors and educators navigate the school investment landscape.";
pub const WEBSITE_DESCRIPTION: &str = "Transform education investment with AI-powered insights and comprehensive school management tools.";

pub fn organization_schema(site: &Site) -> Value {
    json!({
        "@context": CONTEXT,
        "@type": "Organization",
        "name": site.name,
        "url": site.base_url,
        "logo": site.absolute_url("/logo.png"),
        "description": ORGANIZATION_DESCRIPTION,
        "sameAs": [],
        "contactPoint": {
            "@type": "ContactPoint",
            "contactType": "customer service",
            "availableLanguage": ["English"],
        },
    })
}

pub fn website_schema(site: &Site) -> Value {
    json!({
        "@context": CONTEXT,
        "@type": "WebSite",
        "name": site.name,
        "url": site.base_url,
        "description": WEBSITE_DESCRIPTION,
        "potentialAction": {
            "@type": "SearchAction",
            "target": {
                "@type": "EntryPoint",
                "urlTemplate": site.absolute_url("/blogs?search={search_term_string}"),
            },
            "query-input": "required name=search_term_string",
        },
    })
}

#[derive(Debug, Clone)]
pub struct Article<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub slug: &'a str,
    pub published_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub image: Option<&'a str>,
}

pub fn article_schema(site: &Site, article: &Article<'_>) -> Value {
    let url = site.absolute_url(&format!("/blog/{}", article.slug));
    json!({
        "@context": CONTEXT,
        "@type": "Article",
        "headline": article.title,
        "description": article.description,
        "url": url,
        "datePublished": article.published_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        "dateModified": article.updated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        "author": {
            "@type": "Organization",
            "name": site.name,
        },
        "publisher": {
            "@type": "Organization",
            "name": site.name,
            "logo": {
                "@type": "ImageObject",
                "url": site.absolute_url("/logo.png"),
            },
        },
        "image": article
            .image
            .map(str::to_string)
            .unwrap_or_else(|| site.absolute_url("/og-image.png")),
        "mainEntityOfPage": {
            "@type": "WebPage",
            "@id": url,
        },
    })
}

pub fn faq_schema<'a, I>(faqs: I) -> Value
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let entities: Vec<Value> = faqs
        .into_iter()
        .map(|(question, answer)| {
            json!({
                "@type": "Question",
                "name": question,
                "acceptedAnswer": {
                    "@type": "Answer",
                    "text": answer,
                },
            })
        })
        .collect();

    json!({
        "@context": CONTEXT,
        "@type": "FAQPage",
        "mainEntity": entities,
    })
}

/// Breadcrumbs from `(name, url)` pairs; relative URLs are made absolute.
pub fn breadcrumb_schema(site: &Site, items: &[(&str, &str)]) -> Value {
    let elements: Vec<Value> = items
        .iter()
        .enumerate()
        .map(|(index, (name, url))| {
            json!({
                "@type": "ListItem",
                "position": index + 1,
                "name": name,
                "item": site.absolute_url(url),
            })
        })
        .collect();

    json!({
        "@context": CONTEXT,
        "@type": "BreadcrumbList",
        "itemListElement": elements,
    })
}

/// Serialises JSON-LD for a `<script type="application/ld+json">` body.
/// `</` is escaped so content can never close the script element.
pub fn json_ld_script_body(data: &Value) -> String {
    data.to_string().replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn site() -> Site {
        Site::new("https://example.org", "Example")
    }

    #[test]
    fn test_organization_schema() {
        let schema = organization_schema(&site());
        assert_eq!(schema["@type"], "Organization");
        assert_eq!(schema["logo"], "https://example.org/logo.png");
        assert_eq!(schema["contactPoint"]["@type"], "ContactPoint");
    }

    #[test]
    fn test_website_schema_search_action() {
        let schema = website_schema(&site());
        assert_eq!(
            schema["potentialAction"]["target"]["urlTemplate"],
            "https://example.org/blogs?search={search_term_string}"
        );
        assert_eq!(
            schema["potentialAction"]["query-input"],
            "required name=search_term_string"
        );
    }

    #[test]
    fn test_article_schema() {
        let published = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let schema = article_schema(
            &site(),
            &Article {
                title: "Hello",
                description: "World",
                slug: "hello",
                published_at: published,
                updated_at: published,
                image: None,
            },
        );
        assert_eq!(schema["headline"], "Hello");
        assert_eq!(schema["url"], "https://example.org/blog/hello");
        assert_eq!(schema["datePublished"], "2025-01-02T03:04:05.000Z");
        assert_eq!(schema["author"]["name"], "Example");
        assert_eq!(schema["image"], "https://example.org/og-image.png");
        assert_eq!(schema["mainEntityOfPage"]["@id"], "https://example.org/blog/hello");
    }

    #[test]
    fn test_faq_schema() {
        let schema = faq_schema([("Why?", "Because."), ("How?", "Carefully.")]);
        assert_eq!(schema["@type"], "FAQPage");
        assert_eq!(schema["mainEntity"].as_array().unwrap().len(), 2);
        assert_eq!(schema["mainEntity"][1]["acceptedAnswer"]["text"], "Carefully.");
    }

    #[test]
    fn test_breadcrumb_positions_and_urls() {
        let schema = breadcrumb_schema(
            &site(),
            &[("Home", "/"), ("Blog", "/blogs"), ("Ext", "https://other.org/x")],
        );
        let items = schema["itemListElement"].as_array().unwrap();
        assert_eq!(items[0]["position"], 1);
        assert_eq!(items[0]["item"], "https://example.org/");
        assert_eq!(items[1]["item"], "https://example.org/blogs");
        assert_eq!(items[2]["item"], "https://other.org/x");
    }

    #[test]
    fn test_script_body_escapes_closing_tags() {
        let body = json_ld_script_body(&json!({ "text": "</script><script>alert(1)" }));
        assert!(!body.contains("</script>"));
        let parsed: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed["text"], "</script><script>alert(1)");
    }
}
