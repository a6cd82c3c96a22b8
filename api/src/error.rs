//! Error types for the API.
//!
//! Each variant maps to exactly one status and body. Provider and
//! verification details never reach the client; they are logged where the
//! error is raised.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;
use widgetgen_values::ErrorMap;

/// Body of every 401 response.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized call";

/// Body of every 500 response.
pub const GENERATION_FAILED_MESSAGE: &str =
    "Server error, please refresh if some widgets failed to load.";

/// Body of a 400 response for an unreadable request body.
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// API error types.
#[derive(Debug)]
pub enum ApiError {
    /// Unauthorized (401) - missing, malformed or rejected bearer token
    Unauthorized,

    /// Validation failed (400) - per-field messages
    Validation(ErrorMap),

    /// Bad request (400) - body could not be read
    BadRequest(String),

    /// Generation failed (500) - the string is for logs only
    Generation(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "Unauthorized"),
            Self::Validation(errors) => {
                let fields: Vec<&str> = errors.failing_fields().collect();
                write!(f, "Validation Error [fields: {}]", fields.join(", "))
            }
            Self::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            Self::Generation(msg) => write!(f, "Generation Failed: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn plain_text(status: StatusCode, body: &'static str) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::Unauthorized => plain_text(status, UNAUTHORIZED_MESSAGE),
            Self::Validation(errors) => (status, Json(errors)).into_response(),
            Self::BadRequest(_) => plain_text(status, INVALID_BODY_MESSAGE),
            Self::Generation(_) => plain_text(status, GENERATION_FAILED_MESSAGE),
        }
    }
}

impl From<crate::traits::AuthError> for ApiError {
    fn from(_: crate::traits::AuthError) -> Self {
        ApiError::Unauthorized
    }
}

impl From<crate::traits::GenerationError> for ApiError {
    fn from(err: crate::traits::GenerationError) -> Self {
        ApiError::Generation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_unauthorized_is_plain_text() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
        assert_eq!(body_text(response).await, "Unauthorized call");
    }

    #[tokio::test]
    async fn test_generation_hides_detail() {
        let response =
            ApiError::Generation("upstream returned 503: quota exceeded".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, GENERATION_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_validation_is_json_map() {
        let mut errors = ErrorMap::new();
        errors.insert_group([
            ("flashcardKey", String::new()),
            ("flashcardValue", "Flashcard value is required".to_string()),
        ]);

        let response = ApiError::Validation(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "flashcardKey": "",
                "flashcardValue": "Flashcard value is required"
            })
        );
    }

    #[test]
    fn test_display_lists_failing_fields() {
        let mut errors = ErrorMap::new();
        errors.insert_group([
            ("title", "Widget title is required".to_string()),
            ("prompt", String::new()),
        ]);
        assert_eq!(
            ApiError::Validation(errors).to_string(),
            "Validation Error [fields: title]"
        );
    }
}
