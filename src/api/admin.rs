use super::response::{decode_json, ApiResultExt};
use super::{ApiError, ApiResponse, AppState};
use crate::auth::{self, Admin};
use crate::notifications::NotificationHub;
use crate::search::BlogIndex;
use crate::storage::ContentStorage;
use crate::DashboardStats;
use axum::body::Bytes;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginToken {
    pub token: String,
    pub expires_in: i64,
}

pub async fn stats<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    _admin: Admin,
) -> Result<ApiResponse<DashboardStats>, ApiError> {
    let stats = state
        .engine
        .stats()
        .await
        .api_context("Failed to fetch dashboard stats")?;
    Ok(ApiResponse::ok(stats, "Stats retrieved successfully"))
}

/// GET /api/admin/events: websocket feed of every content change.
pub async fn events<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    _admin: Admin,
    ws: WebSocketUpgrade,
) -> Response {
    let sender = state.engine.event_sender();
    ws.on_upgrade(move |socket| NotificationHub::handle_socket(socket, sender))
}

/// POST /api/auth/login. The token is returned and also set as a cookie.
pub async fn login<S: ContentStorage + 'static, I: BlogIndex>(
    State(state): State<AppState<S, I>>,
    jar: CookieJar,
    body: Bytes,
) -> Result<(CookieJar, ApiResponse<LoginToken>), Response> {
    let credentials: LoginRequest = decode_json(&body)
        .api_context("Failed to log in")
        .map_err(IntoResponse::into_response)?;
    let token = state
        .auth
        .login(&credentials.email, &credentials.password)
        .map_err(IntoResponse::into_response)?;

    tracing::info!(email = %credentials.email.trim(), "admin logged in");
    let response = LoginToken {
        token: token.clone(),
        expires_in: state.auth.ttl().num_seconds(),
    };
    Ok((
        jar.add(auth::session_cookie(token)),
        ApiResponse::ok(response, "Logged in successfully"),
    ))
}
