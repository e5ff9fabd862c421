//! Content routes.
//!
//! Read-only endpoints returning published items. Lists use the base
//! formatter; single-item lookups also carry custom fields.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use super::helpers::{
    first_published, format_list, id_token, public_types, require_type, slug_token,
};
use crate::content::ContentRecord;
use crate::error::{ApiError, ApiResult};
use crate::models::PublishedQuery;
use crate::state::AppState;

/// Create the content router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/all-content", get(all_content))
        .route("/content/{type}", get(content_by_type))
        .route("/content/id/{id}", get(content_by_id))
        .route("/content/{type}/id/{id}", get(content_by_type_and_id))
        .route("/content/{type}/slug/{slug}", get(content_by_type_and_slug))
        .route("/content/slug/{slug}", get(content_by_slug))
}

/// Every published item of every public type.
///
/// GET /all-content
async fn all_content(State(state): State<AppState>) -> ApiResult<Json<Vec<ContentRecord>>> {
    let types = public_types(&state).await?;
    let query = PublishedQuery::new().of_types(types.iter().map(|t| t.name.clone()));
    let items = state.store().published_items(&query).await?;

    let records = format_list(&state, &items, &types).await?;
    tracing::debug!(count = records.len(), "listed all content");
    Ok(Json(records))
}

/// Published items of one type.
///
/// GET /content/{type}
async fn content_by_type(
    State(state): State<AppState>,
    Path(item_type): Path<String>,
) -> ApiResult<Json<Vec<ContentRecord>>> {
    let item_type = slug_token(&item_type)?;
    let content_type = require_type(&state, item_type).await?;

    let query = PublishedQuery::new().of_types([content_type.name.clone()]);
    let items = state.store().published_items(&query).await?;

    let records = format_list(&state, &items, std::slice::from_ref(&content_type)).await?;
    tracing::debug!(item_type = %content_type.name, count = records.len(), "listed content");
    Ok(Json(records))
}

/// A published item of any type, by ID.
///
/// GET /content/id/{id}
async fn content_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ContentRecord>> {
    let id = id_token(&id)?;
    let item = first_published(&state, &PublishedQuery::new().with_id(id)).await?;
    let content_type = state.store().content_type(&item.item_type).await?;

    let record = state
        .formatter()
        .format_with_fields(&item, content_type.as_ref())
        .await?;
    Ok(Json(record))
}

/// A published item by ID, which must be of the given type.
///
/// GET /content/{type}/id/{id}
async fn content_by_type_and_id(
    State(state): State<AppState>,
    Path((item_type, id)): Path<(String, String)>,
) -> ApiResult<Json<ContentRecord>> {
    let item_type = slug_token(&item_type)?;
    let id = id_token(&id)?;
    let content_type = require_type(&state, item_type).await?;

    let item = first_published(&state, &PublishedQuery::new().with_id(id)).await?;
    if item.item_type != content_type.name {
        tracing::debug!(
            id,
            requested = %content_type.name,
            actual = %item.item_type,
            "content type mismatch"
        );
        return Err(ApiError::PostMismatch);
    }

    let record = state
        .formatter()
        .format_with_fields(&item, Some(&content_type))
        .await?;
    Ok(Json(record))
}

/// A published item of the given type, by slug.
///
/// GET /content/{type}/slug/{slug}
async fn content_by_type_and_slug(
    State(state): State<AppState>,
    Path((item_type, slug)): Path<(String, String)>,
) -> ApiResult<Json<ContentRecord>> {
    let item_type = slug_token(&item_type)?;
    let slug = slug_token(&slug)?;
    let content_type = require_type(&state, item_type).await?;

    let query = PublishedQuery::new()
        .of_types([content_type.name.clone()])
        .with_slug(slug);
    let item = first_published(&state, &query).await?;

    let record = state
        .formatter()
        .format_with_fields(&item, Some(&content_type))
        .await?;
    Ok(Json(record))
}

/// The newest published item with the slug, across public types.
///
/// GET /content/slug/{slug}
async fn content_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<ContentRecord>> {
    let slug = slug_token(&slug)?;
    let types = public_types(&state).await?;

    let query = PublishedQuery::new()
        .of_types(types.iter().map(|t| t.name.clone()))
        .with_slug(slug);
    let item = first_published(&state, &query).await?;
    let content_type = types.iter().find(|t| t.name == item.item_type);

    let record = state
        .formatter()
        .format_with_fields(&item, content_type)
        .await?;
    Ok(Json(record))
}
