use crate::config::Site;
use crate::entities::blogs::Model as Blog;
use crate::entities::seo_pages::Model as SeoPage;
use quick_xml::escape::{resolve_html5_entity, unescape_with};
use serde::Serialize;

pub const DEFAULT_OG_IMAGE: &str = "/og-image.png";
pub const OG_IMAGE_WIDTH: u32 = 1200;
pub const OG_IMAGE_HEIGHT: u32 = 630;
pub const LOCALE: &str = "en_IN";
const DESCRIPTION_CHARS: usize = 160;

#[derive(Debug, Clone, Default)]
pub struct SeoConfig {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub og_image: Option<String>,
    pub no_index: bool,
    pub canonical: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub keywords: Option<Vec<String>>,
    pub open_graph: OpenGraph,
    pub twitter: TwitterCard,
    pub robots: Robots,
    pub canonical: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    pub images: Vec<OgImage>,
    #[serde(rename = "type")]
    pub og_type: String,
    pub site_name: String,
    pub locale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OgImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwitterCard {
    pub card: String,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Robots {
    pub index: bool,
    pub follow: bool,
}

impl Robots {
    /// Value of the `<meta name="robots">` tag.
    pub fn content(&self) -> String {
        format!(
            "{}, {}",
            if self.index { "index" } else { "noindex" },
            if self.follow { "follow" } else { "nofollow" }
        )
    }
}

pub fn generate_seo_metadata(site: &Site, config: SeoConfig) -> PageMetadata {
    let image = site.absolute_url(config.og_image.as_deref().unwrap_or(DEFAULT_OG_IMAGE));

    PageMetadata {
        keywords: (!config.keywords.is_empty()).then_some(config.keywords),
        open_graph: OpenGraph {
            title: config.title.clone(),
            description: config.description.clone(),
            images: vec![OgImage {
                url: image.clone(),
                width: OG_IMAGE_WIDTH,
                height: OG_IMAGE_HEIGHT,
                alt: config.title.clone(),
            }],
            og_type: "website".to_string(),
            site_name: site.name.clone(),
            locale: LOCALE.to_string(),
        },
        twitter: TwitterCard {
            card: "summary_large_image".to_string(),
            title: config.title.clone(),
            description: config.description.clone(),
            images: vec![image],
        },
        robots: Robots {
            index: !config.no_index,
            follow: !config.no_index,
        },
        canonical: config.canonical,
        title: config.title,
        description: config.description,
    }
}

/// Metadata for a public blog post: per-post overrides first, then the
/// title and the opening of the content.
pub fn blog_metadata(site: &Site, blog: &Blog) -> PageMetadata {
    let mut metadata = generate_seo_metadata(
        site,
        SeoConfig {
            title: blog.meta_title.clone().unwrap_or_else(|| blog.title.clone()),
            description: blog_description(blog),
            keywords: blog.keywords(),
            og_image: blog.image.clone(),
            no_index: false,
            canonical: Some(site.absolute_url(&format!("/blog/{}", blog.slug))),
        },
    );
    metadata.open_graph.og_type = "article".to_string();
    metadata
}

pub fn seo_page_metadata(site: &Site, page: &SeoPage) -> PageMetadata {
    let description = page.meta_description.clone().unwrap_or_default();
    let mut metadata = generate_seo_metadata(
        site,
        SeoConfig {
            title: page.meta_title.clone(),
            description: description.clone(),
            keywords: page.keywords(),
            og_image: page.og_image.clone(),
            no_index: false,
            canonical: page.canonical_url.clone(),
        },
    );
    if let Some(og_title) = &page.og_title {
        metadata.open_graph.title = og_title.clone();
        metadata.twitter.title = og_title.clone();
    }
    if let Some(og_description) = &page.og_description {
        metadata.open_graph.description = og_description.clone();
        metadata.twitter.description = og_description.clone();
    }
    metadata
}

pub fn blog_description(blog: &Blog) -> String {
    blog.meta_description
        .clone()
        .unwrap_or_else(|| excerpt(&blog.content, DESCRIPTION_CHARS))
}

/// Plain text prefix of an HTML fragment, at most `max_chars` characters.
/// Character references are decoded so the text can be escaped once on output.
pub fn excerpt(html: &str, max_chars: usize) -> String {
    let mut text = String::with_capacity(html.len().min(max_chars * 2));
    let mut in_tag = false;
    let mut pending_space = false;

    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                pending_space = true;
            }
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            c if c.is_whitespace() => pending_space = true,
            c => {
                if pending_space && !text.is_empty() {
                    text.push(' ');
                }
                pending_space = false;
                text.push(c);
            }
        }
    }

    // Unknown or malformed entities leave the text as written.
    let text = match unescape_with(&text, resolve_html5_entity) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => text,
    };
    text.chars().take(max_chars).collect()
}
