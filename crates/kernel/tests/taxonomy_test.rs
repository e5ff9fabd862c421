#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Taxonomy route tests.

mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

use common::{TestApp, seeded_store};
use content_api_test_utils::assert;

async fn app() -> TestApp {
    TestApp::new(seeded_store()).await
}

fn names(body: &Value) -> Vec<&str> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect()
}

// -------------------------------------------------------------------------
// /taxonomies/{type}
// -------------------------------------------------------------------------

#[tokio::test]
async fn test_taxonomies_for_type_lists_public_taxonomies() {
    let (status, body) = app().await.get("/taxonomies/post").await;

    assert_eq!(status, StatusCode::OK);
    // `audience` is registered for posts but not public.
    assert_eq!(names(&body), vec!["category", "post_tag"]);
    assert_eq!(body[0]["label"], json!("category"));
}

#[tokio::test]
async fn test_terms_include_empty_terms_and_counts() {
    let (_, body) = app().await.get("/taxonomies/post").await;
    let terms = body[0]["terms"].as_array().unwrap();

    assert_eq!(terms.len(), 2);
    assert_eq!(
        terms[0],
        json!({"id": 11, "name": "Empty", "slug": "empty", "count": 0, "meta": {}})
    );
    // Counts every published item carrying the term, whatever its type.
    assert_eq!(terms[1]["id"], json!(10));
    assert_eq!(terms[1]["count"], json!(4));
}

#[tokio::test]
async fn test_term_meta_values_are_arrays() {
    let (_, body) = app().await.get("/taxonomies/post").await;
    let news = &body[0]["terms"][1];

    assert_eq!(news["meta"], json!({"color": ["red"], "priority": ["3"]}));
}

#[tokio::test]
async fn test_taxonomies_for_other_types() {
    let app = app().await;

    let (_, body) = app.get("/taxonomies/event").await;
    assert_eq!(names(&body), vec!["category"]);

    let (status, body) = app.get("/taxonomies/page").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_taxonomies_for_invalid_type() {
    let app = app().await;

    let (status, body) = app.get("/taxonomies/widget").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert::not_found(&body, "invalid_post_type", "Invalid post type");

    let (_, body) = app.get("/taxonomies/internal").await;
    assert::not_found(&body, "invalid_post_type", "Invalid post type");

    let (_, body) = app.get("/taxonomies/not_a_type").await;
    assert_eq!(body["code"], json!("rest_no_route"));
}

#[tokio::test]
async fn test_failing_term_lookup_skips_taxonomy() {
    let app = app().await;
    app.store.fail_term_lookup("category");

    let (status, body) = app.get("/taxonomies/post").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["post_tag"]);
}

// -------------------------------------------------------------------------
// /posts-by-taxonomy/{taxonomy}/{term_id}
// -------------------------------------------------------------------------

#[tokio::test]
async fn test_posts_by_taxonomy_filters_by_registered_public_types() {
    let (status, body) = app().await.get("/posts-by-taxonomy/category/10").await;

    assert_eq!(status, StatusCode::OK);
    // Draft 3, page 4 (page does not use `category`) and internal 6 are excluded.
    assert_eq!(assert::ids(&body), vec![5, 1]);
    for record in body.as_array().unwrap() {
        assert::lacks_key(record, "custom_fields");
    }
}

#[tokio::test]
async fn test_posts_by_taxonomy_underscored_name() {
    let (_, body) = app().await.get("/posts-by-taxonomy/post_tag/12").await;

    assert_eq!(assert::ids(&body), vec![2]);
}

#[tokio::test]
async fn test_posts_by_taxonomy_term_must_belong_to_taxonomy() {
    let app = app().await;

    // Term 10 is a category.
    let (status, body) = app.get("/posts-by-taxonomy/post_tag/10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (_, body) = app.get("/posts-by-taxonomy/category/11").await;
    assert_eq!(body, json!([]));

    let (_, body) = app.get("/posts-by-taxonomy/category/999").await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_posts_by_unknown_taxonomy_is_empty() {
    let (status, body) = app().await.get("/posts-by-taxonomy/genre/10").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_posts_by_non_public_taxonomy() {
    // Only the item types are checked for visibility.
    let (_, body) = app().await.get("/posts-by-taxonomy/audience/13").await;

    assert_eq!(assert::ids(&body), vec![1]);
}

#[tokio::test]
async fn test_posts_by_taxonomy_malformed_parameters() {
    let app = app().await;

    for path in [
        "/posts-by-taxonomy/category/abc",
        "/posts-by-taxonomy/cat.egory/10",
    ] {
        let (status, body) = app.get(path).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
        assert_eq!(body["code"], json!("rest_no_route"), "{path}");
    }
}
