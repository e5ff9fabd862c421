//! Taxonomy routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::Serialize;
use serde_json::{Map, Value};

use super::helpers::{
    format_list, id_token, public_types, require_type, slug_token, taxonomy_token,
};
use crate::content::ContentRecord;
use crate::content::fields::deserialize_raw;
use crate::error::ApiResult;
use crate::models::{ContentType, PublishedQuery, Term};
use crate::state::AppState;

/// Create the taxonomy router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/taxonomies/{type}", get(taxonomies_for_type))
        .route(
            "/posts-by-taxonomy/{taxonomy}/{term_id}",
            get(posts_by_taxonomy),
        )
}

// -------------------------------------------------------------------------
// Response types
// -------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct TaxonomyResponse {
    name: String,
    label: String,
    terms: Vec<TermResponse>,
}

#[derive(Debug, Serialize)]
struct TermResponse {
    id: i64,
    name: String,
    slug: String,
    count: i64,
    meta: Map<String, Value>,
}

impl From<Term> for TermResponse {
    fn from(term: Term) -> Self {
        let meta = term
            .meta
            .into_iter()
            .map(|(key, values)| {
                let values = values.iter().map(|v| deserialize_raw(v)).collect();
                (key, Value::Array(values))
            })
            .collect();

        Self {
            id: term.id,
            name: term.name,
            slug: term.slug,
            count: term.count,
            meta,
        }
    }
}

// -------------------------------------------------------------------------
// Handlers
// -------------------------------------------------------------------------

/// Public taxonomies of a type, each with all of its terms.
///
/// GET /taxonomies/{type}
async fn taxonomies_for_type(
    State(state): State<AppState>,
    Path(item_type): Path<String>,
) -> ApiResult<Json<Vec<TaxonomyResponse>>> {
    let item_type = slug_token(&item_type)?;
    let content_type = require_type(&state, item_type).await?;

    let taxonomies = state.store().taxonomies_for_type(&content_type.name).await?;

    let mut response = Vec::with_capacity(taxonomies.len());
    for taxonomy in taxonomies.into_iter().filter(|t| t.public) {
        let terms = match state.store().terms(&taxonomy.name).await {
            Ok(terms) => terms,
            Err(e) => {
                tracing::warn!(
                    taxonomy = %taxonomy.name,
                    error = %e,
                    "skipping taxonomy whose terms could not be loaded"
                );
                continue;
            }
        };

        response.push(TaxonomyResponse {
            name: taxonomy.name,
            label: taxonomy.label,
            terms: terms.into_iter().map(TermResponse::from).collect(),
        });
    }

    Ok(Json(response))
}

/// Published items carrying a term, across the public types that use the taxonomy.
///
/// GET /posts-by-taxonomy/{taxonomy}/{term_id}
async fn posts_by_taxonomy(
    State(state): State<AppState>,
    Path((taxonomy, term_id)): Path<(String, String)>,
) -> ApiResult<Json<Vec<ContentRecord>>> {
    let taxonomy = taxonomy_token(&taxonomy)?;
    let term_id = id_token(&term_id)?;

    let types: Vec<ContentType> = match state.store().taxonomy(taxonomy).await? {
        Some(tax) => public_types(&state)
            .await?
            .into_iter()
            .filter(|t| tax.applies_to(&t.name))
            .collect(),
        None => Vec::new(),
    };

    if types.is_empty() {
        tracing::debug!(taxonomy, "no public content type uses taxonomy");
        return Ok(Json(Vec::new()));
    }

    let query = PublishedQuery::new()
        .of_types(types.iter().map(|t| t.name.clone()))
        .with_term(taxonomy, term_id);
    let items = state.store().published_items(&query).await?;

    Ok(Json(format_list(&state, &items, &types).await?))
}
