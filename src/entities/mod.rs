pub mod blog_faqs;
pub mod blogs;
pub mod seo_pages;
