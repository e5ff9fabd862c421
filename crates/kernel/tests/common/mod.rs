#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Tests drive the REAL router and handlers; only the content store is
//! swapped for the in-memory implementation.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use content_api::AppState;
use content_api::content::{DefinedFieldProvider, FieldProvider, Permalinks, RegistryRenderer};
use content_api::models::{Attachment, FieldDefinition, FieldType};
use content_api::routes;
use content_api::store::MemoryContentStore;
use content_api_test_utils::{private_type, test_item, test_taxonomy, test_term, test_type};

/// Route prefix used by every test app.
pub const NAMESPACE: &str = "/content-api/v1";

/// Site URL used for permalinks.
pub const SITE_URL: &str = "http://example.test";

/// Test application wrapper using the real routes over a memory store.
pub struct TestApp {
    router: Router,
    pub store: Arc<MemoryContentStore>,
}

impl TestApp {
    /// Build an app with typed fields resolved from the store's definitions.
    pub async fn new(store: Arc<MemoryContentStore>) -> Self {
        let provider = DefinedFieldProvider::load(store.as_ref())
            .await
            .expect("failed to load field definitions");
        Self::with_fields(store, Some(Arc::new(provider)))
    }

    /// Build an app with an explicit (or no) field provider.
    pub fn with_fields(
        store: Arc<MemoryContentStore>,
        fields: Option<Arc<dyn FieldProvider>>,
    ) -> Self {
        Self::build(store, fields, NAMESPACE)
    }

    /// Build an app that mounts the API at the root instead of a namespace.
    pub fn at_root(store: Arc<MemoryContentStore>) -> Self {
        Self::build(store, None, "")
    }

    fn build(
        store: Arc<MemoryContentStore>,
        fields: Option<Arc<dyn FieldProvider>>,
        namespace: &str,
    ) -> Self {
        let state = AppState::from_parts(
            store.clone(),
            Arc::new(RegistryRenderer::new()),
            fields,
            Permalinks::new(SITE_URL),
        );
        let router = routes::router(namespace).with_state(state);
        Self { router, store }
    }

    /// Send a request to the test application.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request")
    }

    /// GET an absolute path and decode the JSON body.
    pub async fn get_raw(&self, path: &str) -> (StatusCode, Value) {
        let response = self
            .request(Request::get(path).body(Body::empty()).unwrap())
            .await;
        let status = response.status();
        (status, body_json(response).await)
    }

    /// GET a path under the API namespace and decode the JSON body.
    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        self.get_raw(&format!("{NAMESPACE}{path}")).await
    }
}

/// Decode a response body as JSON (`Null` for an empty body).
pub async fn body_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response body is not JSON")
    }
}

/// A small site:
///
/// | id | type     | status  | slug         | published  |
/// |----|----------|---------|--------------|------------|
/// | 1  | post     | publish | hello-world  | 2024-03-01 |
/// | 2  | post     | publish | second-post  | 2024-04-01 |
/// | 3  | post     | draft   | draft-post   | 2024-06-01 |
/// | 4  | page     | publish | about        | 2024-02-01 |
/// | 5  | event    | publish | launch       | 2024-05-01 |
/// | 6  | internal | publish | secret       | 2024-03-15 |
/// | 7  | page     | publish | hello-world  | 2023-01-01 |
///
/// `internal` is not public. Taxonomies: `category` (post, event),
/// `post_tag` (post), `audience` (post, not public).
pub fn seeded_store() -> Arc<MemoryContentStore> {
    let store = MemoryContentStore::new();

    store.add_type(test_type("post"));
    store.add_type(test_type("page"));
    store.add_type(content_api::models::ContentType {
        rewrite_slug: Some("events".to_string()),
        ..test_type("event")
    });
    store.add_type(private_type("internal"));

    store.add_attachment(Attachment {
        id: 100,
        url: "http://example.test/uploads/hero.jpg".to_string(),
    });

    store.add_item(
        test_item(1, "post", "Hello World")
            .with_slug("hello-world")
            .published_on(2024, 3, 1)
            .with_featured_media(100)
            .with_body(concat!(
                "<!-- wp:heading {\"level\":2} --><h2>Welcome</h2><!-- /wp:heading -->\n",
                "<!-- wp:paragraph --><p>First post.</p><!-- /wp:paragraph -->"
            ))
            .build(),
    );
    store.add_item(
        test_item(2, "post", "Second Post")
            .with_slug("second-post")
            .published_on(2024, 4, 1)
            .with_excerpt("Manual excerpt.")
            .build(),
    );
    store.add_item(
        test_item(3, "post", "Draft Post")
            .with_slug("draft-post")
            .published_on(2024, 6, 1)
            .unpublished()
            .build(),
    );
    store.add_item(
        test_item(4, "page", "About")
            .with_slug("about")
            .published_on(2024, 2, 1)
            .build(),
    );
    store.add_item(
        test_item(5, "event", "Launch")
            .with_slug("launch")
            .published_on(2024, 5, 1)
            .build(),
    );
    store.add_item(
        test_item(6, "internal", "Secret")
            .with_slug("secret")
            .published_on(2024, 3, 15)
            .build(),
    );
    store.add_item(
        test_item(7, "page", "Hello World (old page)")
            .with_slug("hello-world")
            .published_on(2023, 1, 1)
            .build(),
    );

    store.add_taxonomy(test_taxonomy("category", &["post", "event"]));
    store.add_taxonomy(test_taxonomy("post_tag", &["post"]));
    store.add_taxonomy(content_api::models::Taxonomy {
        public: false,
        ..test_taxonomy("audience", &["post"])
    });

    store.add_term(test_term(10, "category", "News"));
    store.add_term(test_term(11, "category", "Empty"));
    store.add_term(test_term(12, "post_tag", "Rust"));
    store.add_term(test_term(13, "audience", "Staff"));

    store.assign_term(1, 10);
    store.assign_term(3, 10);
    store.assign_term(4, 10);
    store.assign_term(5, 10);
    store.assign_term(6, 10);
    store.assign_term(2, 12);
    store.assign_term(1, 13);

    store.add_term_meta(10, "color", "red");
    store.add_term_meta(10, "priority", "3");

    store.add_meta(1, "_thumbnail_id", "100");
    store.add_meta(1, "subtitle", "Greetings");
    store.add_meta(1, "rating", "5");
    store.add_meta(1, "keywords", "intro, welcome");
    store.add_meta(1, "settings", r#"{"comments":false}"#);

    store.define_field(FieldDefinition {
        name: "keywords".to_string(),
        field_type: FieldType::List,
    });
    store.define_field(FieldDefinition {
        name: "rating".to_string(),
        field_type: FieldType::Number,
    });

    Arc::new(store)
}
