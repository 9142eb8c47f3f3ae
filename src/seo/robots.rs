use crate::config::Site;

/// Areas crawlers are kept out of: the API, the admin and signed-in app pages.
pub const DISALLOWED_PATHS: &[&str] = &[
    "/api/",
    "/admin/",
    "/dashboard/",
    "/investor/",
    "/lesson-planner/",
    "/monica-chat/",
    "/login",
    "/register",
];

pub fn robots_txt(site: &Site) -> String {
    let mut body = String::from("User-agent: *\nAllow: /\n");
    for path in DISALLOWED_PATHS {
        body.push_str("Disallow: ");
        body.push_str(path);
        body.push('\n');
    }
    body.push_str(&format!("\nSitemap: {}\n", site.absolute_url("/sitemap.xml")));
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_robots_txt() {
        let body = robots_txt(&Site::new("https://example.org", "Example"));
        assert!(body.starts_with("User-agent: *\nAllow: /\n"));
        assert!(body.contains("Disallow: /api/\n"));
        assert!(body.contains("Disallow: /admin/\n"));
        assert!(body.ends_with("Sitemap: https://example.org/sitemap.xml\n"));
    }
}
