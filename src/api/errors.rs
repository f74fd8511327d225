use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Error envelope shared by every endpoint.
#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    #[serde(rename = "statusCode")]
    status_code: u16,
    message: String,
    success: bool,
}

#[derive(Debug)]
pub(crate) enum ApiError {
    Unauthorized(String),
    Forbidden(&'static str),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    TooManyRequests(&'static str),
    Internal(String),
}

impl ApiError {
    /// Log the underlying error with context and return an `Internal` variant.
    pub(crate) fn internal(err: impl std::fmt::Display, context: &str) -> Self {
        tracing::error!(error = %err, "{context}");
        Self::Internal(context.to_string())
    }

    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub(crate) fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(self) -> String {
        match self {
            Self::Forbidden(message) | Self::TooManyRequests(message) => message.to_string(),
            Self::Unauthorized(message)
            | Self::BadRequest(message)
            | Self::NotFound(message)
            | Self::Conflict(message) => message,
            // Details were logged by `ApiError::internal`; clients get a generic text.
            Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let challenge = matches!(self, Self::Unauthorized(_));
        let envelope =
            ErrorEnvelope { status_code: status.as_u16(), message: self.message(), success: false };

        let mut response = (status, Json(envelope)).into_response();
        if challenge {
            response.headers_mut().insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body(error: ApiError) -> (StatusCode, Option<HeaderValue>, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let challenge = response.headers().get(header::WWW_AUTHENTICATE).cloned();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, challenge, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn unauthorized_carries_bearer_challenge() {
        let (status, challenge, json) =
            body(ApiError::Unauthorized("Unauthorized: No token provided".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(challenge.unwrap(), "Bearer");
        assert_eq!(json["statusCode"], 401);
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Unauthorized: No token provided");
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let (status, challenge, json) =
            body(ApiError::internal("relation \"exams\" does not exist", "Failed to list exams"))
                .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(challenge.is_none());
        assert_eq!(json["message"], "Internal server error");
    }
}
