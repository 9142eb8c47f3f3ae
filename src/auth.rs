//! Admin authentication with HS256 tokens.
//!
//! Tokens are read from `Authorization: Bearer <token>` first and from the
//! `admin_token` cookie second, so JSON clients and the HTML admin forms use
//! the same check.

use crate::config::AdminSettings;
use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const ADMIN_COOKIE: &str = "admin_token";
pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing authentication token")]
    MissingToken,

    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("token does not carry the admin role")]
    NotAdmin,

    #[error("invalid credentials")]
    InvalidCredentials,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!("admin authentication failed: {self}");
        let message = match self {
            AuthError::InvalidCredentials => "Invalid email or password",
            _ => "Admin authentication required",
        };
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "success": false,
                "message": message,
                "data": null,
            })),
        )
            .into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

pub struct AdminAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    email: Option<String>,
    password: Option<String>,
}

impl AdminAuth {
    pub fn new(settings: &AdminSettings) -> Self {
        let secret = settings.jwt_secret.as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: Duration::hours(settings.token_ttl_hours),
            email: settings.email.clone(),
            password: settings.password.clone(),
        }
    }

    pub fn issue_token(&self, subject: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = AdminClaims {
            sub: subject.to_string(),
            role: ADMIN_ROLE.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    pub fn verify(&self, token: &str) -> Result<AdminClaims, AuthError> {
        let data = decode::<AdminClaims>(token, &self.decoding, &Validation::new(Algorithm::HS256))?;
        if data.claims.role != ADMIN_ROLE {
            return Err(AuthError::NotAdmin);
        }
        Ok(data.claims)
    }

    /// Logs in the configured admin. Without configured credentials nobody can.
    pub fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        match (&self.email, &self.password) {
            (Some(expected_email), Some(expected_password))
                if expected_email.eq_ignore_ascii_case(email.trim())
                    && expected_password == password =>
            {
                self.issue_token(expected_email)
            }
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

/// The http-only cookie the admin forms authenticate with.
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((ADMIN_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Strict)
        .path("/")
        .build()
}

/// Expires the session cookie on the client.
pub fn cleared_cookie() -> Cookie<'static> {
    Cookie::build((ADMIN_COOKIE, "")).path("/").build()
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Extractor that only succeeds for requests carrying a valid admin token.
#[derive(Debug, Clone)]
pub struct Admin(pub AdminClaims);

#[async_trait]
impl<S> FromRequestParts<S> for Admin
where
    Arc<AdminAuth>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = Arc::<AdminAuth>::from_ref(state);
        let token = match bearer_token(&parts.headers) {
            Some(token) => token.to_string(),
            None => CookieJar::from_headers(&parts.headers)
                .get(ADMIN_COOKIE)
                .map(|cookie| cookie.value().to_string())
                .ok_or(AuthError::MissingToken)?,
        };
        Ok(Admin(auth.verify(&token)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> AdminSettings {
        AdminSettings {
            jwt_secret: "test-secret".to_string(),
            email: Some("admin@example.com".to_string()),
            password: Some("hunter2".to_string()),
            token_ttl_hours: 1,
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let auth = AdminAuth::new(&settings());
        let token = auth.issue_token("admin@example.com").unwrap();
        let claims = auth.verify(&token).unwrap();
        assert_eq!(claims.sub, "admin@example.com");
        assert_eq!(claims.role, ADMIN_ROLE);
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let auth = AdminAuth::new(&settings());
        let other = AdminAuth::new(&AdminSettings {
            jwt_secret: "other".to_string(),
            ..settings()
        });
        let token = other.issue_token("admin@example.com").unwrap();
        assert!(matches!(auth.verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = AdminAuth::new(&AdminSettings {
            token_ttl_hours: -2,
            ..settings()
        });
        let token = auth.issue_token("admin@example.com").unwrap();
        assert!(auth.verify(&token).is_err());
    }

    #[test]
    fn test_non_admin_role_rejected() {
        let auth = AdminAuth::new(&settings());
        let claims = AdminClaims {
            sub: "reader".to_string(),
            role: "viewer".to_string(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &auth.encoding).unwrap();
        assert!(matches!(auth.verify(&token), Err(AuthError::NotAdmin)));
    }

    #[test]
    fn test_login() {
        let auth = AdminAuth::new(&settings());
        assert!(auth.login("ADMIN@example.com", "hunter2").is_ok());
        assert!(matches!(
            auth.login("admin@example.com", "wrong"),
            Err(AuthError::InvalidCredentials)
        ));

        let locked = AdminAuth::new(&AdminSettings {
            email: None,
            password: None,
            ..settings()
        });
        assert!(locked.login("admin@example.com", "hunter2").is_err());
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, "Bearer abc.def".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc".to_string());
        assert_eq!(cookie.name(), ADMIN_COOKIE);
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn test_rejection_is_401() {
        let response = AuthError::MissingToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
