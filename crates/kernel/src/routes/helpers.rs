//! Shared route helpers: parameter shapes, type checks, list formatting.

use crate::content::ContentRecord;
use crate::error::{ApiError, ApiResult};
use crate::models::{ContentItem, ContentType, PublishedQuery};
use crate::state::AppState;
use crate::store::StoreError;

/// Accept a content type or slug token: ASCII letters, digits, hyphens.
///
/// Anything else is treated like an unmatched route.
pub fn slug_token(raw: &str) -> ApiResult<&str> {
    token(raw, |c| c.is_ascii_alphanumeric() || c == '-')
}

/// Accept a taxonomy token: ASCII letters, digits, hyphens, underscores.
pub fn taxonomy_token(raw: &str) -> ApiResult<&str> {
    token(raw, |c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Accept a decimal ID.
pub fn id_token(raw: &str) -> ApiResult<i64> {
    token(raw, |c| c.is_ascii_digit())?
        .parse()
        .map_err(|_| ApiError::NoRoute)
}

fn token(raw: &str, allowed: impl Fn(char) -> bool) -> ApiResult<&str> {
    if !raw.is_empty() && raw.chars().all(allowed) {
        Ok(raw)
    } else {
        Err(ApiError::NoRoute)
    }
}

/// Every registered public content type.
pub async fn public_types(state: &AppState) -> Result<Vec<ContentType>, StoreError> {
    Ok(state
        .store()
        .content_types()
        .await?
        .into_iter()
        .filter(|t| t.public)
        .collect())
}

/// Look up a content type that exists and is public.
pub async fn require_type(state: &AppState, name: &str) -> ApiResult<ContentType> {
    state
        .store()
        .content_type(name)
        .await?
        .filter(|t| t.public)
        .ok_or(ApiError::InvalidPostType)
}

/// First published item matching a query.
pub async fn first_published(
    state: &AppState,
    query: &PublishedQuery,
) -> ApiResult<ContentItem> {
    state
        .store()
        .published_items(query)
        .await?
        .into_iter()
        .next()
        .ok_or(ApiError::PostNotFound)
}

/// Format items with the base formatter, resolving each item's type from `types`.
pub async fn format_list(
    state: &AppState,
    items: &[ContentItem],
    types: &[ContentType],
) -> ApiResult<Vec<ContentRecord>> {
    let mut records = Vec::with_capacity(items.len());
    for item in items {
        let content_type = types.iter().find(|t| t.name == item.item_type);
        records.push(state.formatter().format(item, content_type).await?);
    }
    Ok(records)
}
