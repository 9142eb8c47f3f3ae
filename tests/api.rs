mod common;

use axum::http::{header, Method, StatusCode};
use common::{test_app, ADMIN_EMAIL, ADMIN_PASSWORD};
use serde_json::json;

#[tokio::test]
async fn test_blog_crud_flow() {
    let app = test_app();

    let created = app
        .create_blog(json!({
            "title": "Choosing a School Site",
            "content": "<p>Location matters.</p>",
            "isPublished": true,
            "readTime": 4
        }))
        .await;
    assert_eq!(created["slug"], "choosing-a-school-site");
    assert_eq!(created["readTime"], 4);

    let fetched = app.get("/api/blogs/choosing-a-school-site").await;
    assert_eq!(fetched.status, StatusCode::OK);
    let body = fetched.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Blog retrieved successfully");
    assert_eq!(body["data"]["title"], "Choosing a School Site");

    let updated = app
        .json(
            Method::PUT,
            "/api/blogs/choosing-a-school-site",
            json!({ "subtitle": "A checklist" }),
            true,
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    let data = &updated.json()["data"];
    assert_eq!(data["subtitle"], "A checklist");
    assert_eq!(data["title"], "Choosing a School Site");
    assert_eq!(data["isPublished"], true);

    let deleted = app
        .json(Method::DELETE, "/api/blogs/choosing-a-school-site", json!({}), true)
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.json()["message"], "Blog deleted successfully");

    let missing = app.get("/api/blogs/choosing-a-school-site").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.json()["success"], false);
}

#[tokio::test]
async fn test_writes_require_admin_token() {
    let app = test_app();

    let create = app
        .json(Method::POST, "/api/blogs", json!({ "title": "Nope" }), false)
        .await;
    assert_eq!(create.status, StatusCode::UNAUTHORIZED);
    assert_eq!(create.json()["message"], "Admin authentication required");

    // Authentication is checked before the blog is looked up.
    let update = app
        .json(Method::PUT, "/api/blogs/missing", json!({ "title": "x" }), false)
        .await;
    assert_eq!(update.status, StatusCode::UNAUTHORIZED);

    let delete = app
        .json(Method::DELETE, "/api/faqs/not-an-id", json!({}), false)
        .await;
    assert_eq!(delete.status, StatusCode::UNAUTHORIZED);

    let stats = app.get("/api/admin/stats").await;
    assert_eq!(stats.status, StatusCode::UNAUTHORIZED);

    let events = app.get("/api/admin/events").await;
    assert_eq!(events.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_status_order() {
    let app = test_app();

    let missing = app
        .json(Method::PUT, "/api/blogs/missing", json!({ "title": "Fine" }), true)
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.json()["message"], "Blog not found");

    // Validation runs before the existence check.
    let invalid = app
        .json(Method::PUT, "/api/blogs/missing", json!({ "title": "  " }), true)
        .await;
    assert_eq!(invalid.status, StatusCode::UNPROCESSABLE_ENTITY);

    let mistyped = app
        .json(
            Method::PUT,
            "/api/blogs/missing",
            json!({ "isPublished": "yes" }),
            true,
        )
        .await;
    assert_eq!(mistyped.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_duplicate_slug_conflicts() {
    let app = test_app();
    app.create_blog(json!({ "title": "Fees", "slug": "fees" }))
        .await;

    let duplicate = app
        .json(
            Method::POST,
            "/api/blogs",
            json!({ "title": "Other", "slug": "fees" }),
            true,
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let seo = json!({ "slug": "about", "metaTitle": "About" });
    let first = app.json(Method::POST, "/api/seo", seo.clone(), true).await;
    assert_eq!(first.status, StatusCode::CREATED);
    let second = app.json(Method::POST, "/api/seo", seo, true).await;
    assert_eq!(second.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_drafts_hidden_from_public_listing() {
    let app = test_app();
    app.create_blog(json!({ "title": "Live", "isPublished": true }))
        .await;
    app.create_blog(json!({ "title": "Draft" })).await;

    let public = app.get("/api/blogs").await.json();
    let titles: Vec<&str> = public["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|blog| blog["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Live"]);

    let admin = app.admin_get("/api/blogs").await.json();
    assert_eq!(admin["data"].as_array().unwrap().len(), 2);

    assert_eq!(app.get("/api/blogs/draft").await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.admin_get("/api/blogs/draft").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_blog_search() {
    let app = test_app();
    app.create_blog(json!({ "title": "Rust for Schools", "isPublished": true }))
        .await;
    app.create_blog(json!({ "title": "Budget Planning", "isPublished": true }))
        .await;

    let results = app.get("/api/blogs?search=budget").await.json();
    let data = results["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["slug"], "budget-planning");
}

#[tokio::test]
async fn test_faq_linking_rules() {
    let app = test_app();
    let blog = app
        .create_blog(json!({ "title": "Admissions", "isPublished": true }))
        .await;

    let unknown = app
        .json(
            Method::POST,
            "/api/faqs",
            json!({
                "question": "When?",
                "answer": "Soon.",
                "blogId": "00000000-0000-0000-0000-000000000000"
            }),
            true,
        )
        .await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);

    let created = app
        .json(
            Method::POST,
            "/api/faqs",
            json!({ "question": "When?", "answer": "In March.", "blogId": blog["id"] }),
            true,
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let faq = created.json()["data"].clone();
    assert_eq!(faq["blog"]["title"], "Admissions");
    let uri = format!("/api/faqs/{}", faq["id"].as_str().unwrap());

    let kept = app
        .json(Method::PUT, &uri, json!({ "answer": "In April." }), true)
        .await
        .json();
    assert_eq!(kept["data"]["blogId"], blog["id"]);
    assert_eq!(kept["data"]["answer"], "In April.");

    let unlinked = app
        .json(Method::PUT, &uri, json!({ "blogId": null }), true)
        .await
        .json();
    assert!(unlinked["data"]["blogId"].is_null());
    assert!(unlinked["data"]["blog"].is_null());

    let filtered = app
        .get(&format!("/api/faqs?blogId={}", blog["id"].as_str().unwrap()))
        .await
        .json();
    assert!(filtered["data"].as_array().unwrap().is_empty());

    assert_eq!(app.get("/api/faqs/not-an-id").await.status, StatusCode::NOT_FOUND);

    let invalid = app
        .json(Method::PUT, "/api/faqs/not-an-id", json!({ "answer": " " }), true)
        .await;
    assert_eq!(invalid.status, StatusCode::UNPROCESSABLE_ENTITY);
    let missing = app
        .json(Method::PUT, "/api/faqs/not-an-id", json!({ "answer": "Yes." }), true)
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_seo_page_replace_and_validation() {
    let app = test_app();
    let created = app
        .json(
            Method::POST,
            "/api/seo",
            json!({ "slug": "pricing", "metaTitle": "Pricing", "ogTitle": "Our pricing" }),
            true,
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);

    let bad_schema = app
        .json(
            Method::PUT,
            "/api/seo/pricing",
            json!({ "slug": "pricing", "metaTitle": "Pricing", "schemaMarkup": "{not json" }),
            true,
        )
        .await;
    assert_eq!(bad_schema.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        bad_schema.json()["message"],
        "Invalid JSON format in Schema Markup field"
    );

    let replaced = app
        .json(
            Method::PUT,
            "/api/seo/pricing",
            json!({ "slug": "plans", "metaTitle": "Plans" }),
            true,
        )
        .await;
    assert_eq!(replaced.status, StatusCode::OK);
    let data = &replaced.json()["data"];
    assert_eq!(data["slug"], "plans");
    assert!(data["ogTitle"].is_null());

    assert_eq!(app.get("/api/seo/pricing").await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/api/seo/plans").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_stats() {
    let app = test_app();
    app.create_blog(json!({ "title": "One", "isPublished": true }))
        .await;
    app.create_blog(json!({ "title": "Two" })).await;

    let stats = app.admin_get("/api/admin/stats").await;
    assert_eq!(stats.status, StatusCode::OK);
    let data = &stats.json()["data"];
    assert_eq!(data["blogs"], 2);
    assert_eq!(data["publishedBlogs"], 1);
    assert_eq!(data["faqs"], 0);
    assert_eq!(data["seoPages"], 0);
}

#[tokio::test]
async fn test_login_issues_token_and_cookie() {
    let app = test_app();

    let rejected = app
        .json(
            Method::POST,
            "/api/auth/login",
            json!({ "email": ADMIN_EMAIL, "password": "wrong" }),
            false,
        )
        .await;
    assert_eq!(rejected.status, StatusCode::UNAUTHORIZED);
    assert_eq!(rejected.json()["message"], "Invalid email or password");

    let accepted = app
        .json(
            Method::POST,
            "/api/auth/login",
            json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
            false,
        )
        .await;
    assert_eq!(accepted.status, StatusCode::OK);
    assert!(accepted.json()["data"]["token"].as_str().unwrap().len() > 20);
    let cookie = accepted.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("admin_token="));
    assert!(cookie.contains("HttpOnly"));
}
