//! Search engine facing output: page metadata, JSON-LD, sitemap and robots.

pub mod metadata;
pub mod robots;
pub mod schema;
pub mod sitemap;

/// SEO page whose metadata, when present, replaces the built-in home page tags.
/// It is served at `/`, never at `/pages/home`.
pub const HOME_PAGE_SLUG: &str = "home";

pub use metadata::{generate_seo_metadata, PageMetadata, SeoConfig};
pub use schema::json_ld_script_body;
