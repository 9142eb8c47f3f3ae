use super::HOME_PAGE_SLUG;
use crate::config::Site;
use crate::entities::blogs::Model as Blog;
use crate::entities::seo_pages::Model as SeoPage;
use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

/// The pages that exist regardless of content.
pub fn static_entries(site: &Site, now: DateTime<Utc>) -> Vec<SitemapEntry> {
    vec![
        SitemapEntry {
            loc: site.base_url.clone(),
            last_modified: now,
            change_frequency: ChangeFrequency::Weekly,
            priority: 1.0,
        },
        SitemapEntry {
            loc: site.absolute_url("/blogs"),
            last_modified: now,
            change_frequency: ChangeFrequency::Daily,
            priority: 0.9,
        },
    ]
}

/// Published blogs only, in the order given (newest first from storage).
pub fn blog_entries(site: &Site, blogs: &[Blog]) -> Vec<SitemapEntry> {
    blogs
        .iter()
        .filter(|blog| blog.is_published)
        .map(|blog| SitemapEntry {
            loc: site.absolute_url(&format!("/blog/{}", blog.slug)),
            last_modified: blog.updated_at,
            change_frequency: ChangeFrequency::Weekly,
            priority: 0.8,
        })
        .collect()
}

/// Standalone pages, minus the home page override already listed as `/`.
pub fn seo_page_entries(site: &Site, pages: &[SeoPage]) -> Vec<SitemapEntry> {
    pages
        .iter()
        .filter(|page| page.slug != HOME_PAGE_SLUG)
        .map(|page| SitemapEntry {
            loc: site.absolute_url(&format!("/pages/{}", page.slug)),
            last_modified: page.updated_at,
            change_frequency: ChangeFrequency::Monthly,
            priority: 0.5,
        })
        .collect()
}

pub fn render_sitemap(entries: &[SitemapEntry]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", SITEMAP_NS));
    writer.write_event(Event::Start(urlset))?;

    for entry in entries {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        write_text_element(&mut writer, "loc", &entry.loc)?;
        write_text_element(
            &mut writer,
            "lastmod",
            &entry
                .last_modified
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        )?;
        write_text_element(&mut writer, "changefreq", entry.change_frequency.as_str())?;
        write_text_element(&mut writer, "priority", &format!("{:.1}", entry.priority))?;
        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;
    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}

fn write_text_element(writer: &mut Writer<Cursor<Vec<u8>>>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn blog(slug: &str, published: bool) -> Blog {
        let updated = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        Blog {
            id: Uuid::new_v4(),
            slug: slug.to_string(),
            title: slug.to_string(),
            subtitle: None,
            description: None,
            content: String::new(),
            image: None,
            is_published: published,
            read_time: None,
            meta_title: None,
            meta_description: None,
            meta_keywords: None,
            created_at: updated - Duration::days(1),
            updated_at: updated,
        }
    }

    fn seo_page(slug: &str) -> SeoPage {
        let updated = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        SeoPage {
            id: Uuid::new_v4(),
            slug: slug.to_string(),
            meta_title: slug.to_string(),
            meta_description: None,
            meta_keywords: None,
            og_title: None,
            og_description: None,
            og_image: None,
            canonical_url: None,
            schema_markup: None,
            content: None,
            created_at: updated,
            updated_at: updated,
        }
    }

    #[test]
    fn test_static_entries() {
        let site = Site::new("https://example.org", "Example");
        let entries = static_entries(&site, Utc::now());
        assert_eq!(entries[0].loc, "https://example.org");
        assert_eq!(entries[0].priority, 1.0);
        assert_eq!(entries[1].loc, "https://example.org/blogs");
        assert_eq!(entries[1].change_frequency, ChangeFrequency::Daily);
    }

    #[test]
    fn test_only_published_blogs_listed() {
        let site = Site::new("https://example.org", "Example");
        let entries = blog_entries(&site, &[blog("live", true), blog("draft", false)]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].loc, "https://example.org/blog/live");
        assert_eq!(entries[0].priority, 0.8);
    }

    #[test]
    fn test_home_override_not_listed_twice() {
        let site = Site::new("https://example.org", "Example");
        let entries = seo_page_entries(&site, &[seo_page(HOME_PAGE_SLUG), seo_page("pricing")]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].loc, "https://example.org/pages/pricing");
        assert_eq!(entries[0].change_frequency, ChangeFrequency::Monthly);
    }

    #[test]
    fn test_render_sitemap_xml() -> Result<()> {
        let site = Site::new("https://example.org", "Example");
        let xml = render_sitemap(&blog_entries(&site, &[blog("a&b", true)]))?;

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">"));
        assert!(xml.contains("<loc>https://example.org/blog/a&amp;b</loc>"));
        assert!(xml.contains("<lastmod>2025-03-01T12:00:00Z</lastmod>"));
        assert!(xml.contains("<changefreq>weekly</changefreq>"));
        assert!(xml.contains("<priority>0.8</priority>"));
        Ok(())
    }
}
