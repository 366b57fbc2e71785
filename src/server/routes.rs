use crate::server::error::ApiError;
use crate::service::LeaderboardService;
use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

/// Header used as the rate limit key
pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// Key used when no forwarded address is present
pub const LOOPBACK_CLIENT: &str = "127.0.0.1";

/// Response header reporting whether entries came from the cache
pub const CACHE_STATUS_HEADER: &str = "x-cache-status";

/// Builds the application router
pub fn router(service: Arc<LeaderboardService>) -> Router {
    Router::new()
        .route("/", get(|| async { "KOL leaderboard API" }))
        .route("/health", get(|| async { "OK" }))
        .route("/leaderboard", get(get_leaderboard))
        .route("/api/leaderboard", get(get_leaderboard))
        .with_state(service)
}

async fn get_leaderboard(
    State(service): State<Arc<LeaderboardService>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let client = client_key(&headers);
    let served = service.leaderboard(&client).await?;

    let status = HeaderValue::from_static(served.status.as_str());

    Ok(([(CACHE_STATUS_HEADER, status)], Json(served.entries.to_vec())))
}

/// Derives the rate limit key for a request
///
/// Uses the first address in `X-Forwarded-For` when present, otherwise the
/// loopback placeholder.
pub fn client_key(headers: &HeaderMap) -> String {
    headers
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(LOOPBACK_CLIENT)
        .to_string()
}
