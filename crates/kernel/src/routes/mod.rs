//! HTTP route handlers.

pub mod content;
pub mod health;
pub mod helpers;
pub mod taxonomy;

use axum::Router;

use crate::error::ApiError;
use crate::state::AppState;

/// The content API routes, unprefixed.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(content::router())
        .merge(taxonomy::router())
}

/// Full route table: the API under `namespace`, the health check at the
/// root, and a JSON 404 for everything else.
///
/// `namespace` is either empty or a `/`-prefixed path without a trailing slash.
pub fn router(namespace: &str) -> Router<AppState> {
    let api = if namespace.is_empty() {
        api_router()
    } else {
        Router::new().nest(namespace, api_router())
    };

    api.merge(health::router()).fallback(no_route)
}

async fn no_route() -> ApiError {
    ApiError::NoRoute
}
