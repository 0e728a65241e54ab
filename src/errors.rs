use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Failures that can escape the aggregation-and-scoring core.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An upstream provider failed and no cached data exists. Callers are
    /// expected to substitute the built-in sample dataset.
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Unauthorized")]
    Unauthorized,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".into()),
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidInput(msg) => AppError::BadRequest(msg),
            CoreError::SourceUnavailable(msg) => AppError::Unavailable(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_status() {
        let bad = AppError::from(CoreError::InvalidInput("invalid wallet address: 0x1".into())).into_response();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let down = AppError::from(CoreError::SourceUnavailable("defillama catalog".into())).into_response();
        assert_eq!(down.status(), StatusCode::SERVICE_UNAVAILABLE);

        assert_eq!(AppError::Unauthorized.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}
