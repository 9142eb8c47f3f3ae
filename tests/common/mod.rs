#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use site_content::api::{self, AppState};
use site_content::auth::AdminAuth;
use site_content::config::{AdminSettings, Site};
use site_content::pages::Templates;
use site_content::search::MemoryIndex;
use site_content::storage::memory::MemoryStorage;
use site_content::ContentEngine;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "correct horse";

pub struct TestApp {
    pub router: Router,
    pub token: String,
}

pub fn admin_settings() -> AdminSettings {
    AdminSettings {
        jwt_secret: "integration-secret".to_string(),
        email: Some(ADMIN_EMAIL.to_string()),
        password: Some(ADMIN_PASSWORD.to_string()),
        token_ttl_hours: 1,
    }
}

pub fn test_app() -> TestApp {
    let auth = AdminAuth::new(&admin_settings());
    let token = auth.issue_token(ADMIN_EMAIL).unwrap();
    let state = AppState::new(
        ContentEngine::new(MemoryStorage::new(), MemoryIndex::new()),
        Site::new("https://example.org", "Example"),
        auth,
        Templates::new().unwrap(),
    );
    TestApp {
        router: api::router(state),
        token,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn admin_get(&self, uri: &str) -> TestResponse {
        let request = Request::get(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// A JSON request, authenticated when `admin` is set.
    pub async fn json(&self, method: Method, uri: &str, body: Value, admin: bool) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if admin {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// A urlencoded form post carrying the admin cookie.
    pub async fn admin_form(&self, uri: &str, form: &str) -> TestResponse {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(header::COOKIE, format!("admin_token={}", self.token))
            .body(Body::from(form.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn create_blog(&self, body: Value) -> Value {
        let response = self.json(Method::POST, "/api/blogs", body, true).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.json()["data"].clone()
    }
}
