use crate::error::ContentError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// The `{ success, message, data }` envelope every JSON route answers with.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    success: bool,
    message: String,
    data: Option<T>,
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            status: StatusCode::OK,
        }
    }

    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::ok(data, message)
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            status: StatusCode::OK,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Client errors keep their own message; anything else is logged and
    /// answered with `context`.
    pub fn from_content(err: ContentError, context: &str) -> Self {
        match client_status(&err) {
            Some(status) => Self::new(status, err.to_string()),
            None => {
                tracing::error!(error = %err, "{context}");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, context)
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()> {
            success: false,
            message: self.message,
            data: None,
            status: self.status,
        };
        body.into_response()
    }
}

/// The status for errors caused by the request; `None` for server faults.
pub fn client_status(err: &ContentError) -> Option<StatusCode> {
    match err {
        ContentError::NotFound(_) => Some(StatusCode::NOT_FOUND),
        ContentError::Validation(_) => Some(StatusCode::UNPROCESSABLE_ENTITY),
        ContentError::Conflict(_) => Some(StatusCode::CONFLICT),
        ContentError::BadRequest(_) => Some(StatusCode::BAD_REQUEST),
        _ => None,
    }
}

pub trait ApiResultExt<T> {
    fn api_context(self, context: &str) -> Result<T, ApiError>;
}

impl<T> ApiResultExt<T> for crate::error::Result<T> {
    fn api_context(self, context: &str) -> Result<T, ApiError> {
        self.map_err(|err| ApiError::from_content(err, context))
    }
}

/// Decodes a JSON body; malformed or mistyped payloads are validation errors.
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> crate::error::Result<T> {
    serde_json::from_slice(body)
        .map_err(|err| ContentError::validation(format!("Invalid request body: {err}")))
}
