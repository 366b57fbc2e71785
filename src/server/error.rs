use crate::service::LeaderboardError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors returned at the HTTP boundary
///
/// Upstream failures never reach this type; the service absorbs them and
/// serves stale or empty data instead.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Too many requests")]
    TooManyRequests { retry_after_secs: u64 },
}

impl From<LeaderboardError> for ApiError {
    fn from(error: LeaderboardError) -> Self {
        match error {
            LeaderboardError::RateLimitExceeded { retry_after } => ApiError::TooManyRequests {
                // Round up so clients never retry before the window resets
                retry_after_secs: retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::TooManyRequests { retry_after_secs } => (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_after_secs.to_string())],
                self.to_string(),
            )
                .into_response(),
        }
    }
}
