//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::{Config, StoreBackend};
use crate::content::{
    BlockRenderer, DefinedFieldProvider, FieldProvider, Permalinks, RecordFormatter,
    RegistryRenderer,
};
use crate::db;
use crate::store::{ContentStore, MemoryContentStore, PgContentStore};

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Content store every handler reads from.
    store: Arc<dyn ContentStore>,

    /// Record formatter (renderer, field provider, permalinks).
    formatter: RecordFormatter,
}

impl AppState {
    /// Create application state from configuration.
    ///
    /// Connects to PostgreSQL and applies migrations, or loads the memory
    /// store's fixture, depending on the configured backend.
    pub async fn new(config: &Config) -> Result<Self> {
        let store: Arc<dyn ContentStore> = match config.store_backend {
            StoreBackend::Postgres => {
                let pool = db::create_pool(config)
                    .await
                    .context("failed to create database pool")?;
                db::run_migrations(&pool).await?;
                info!("PostgreSQL content store ready");
                Arc::new(PgContentStore::new(pool))
            }
            StoreBackend::Memory => {
                let store = match &config.content_fixture {
                    Some(path) => {
                        let json = std::fs::read_to_string(path).with_context(|| {
                            format!("failed to read content fixture {}", path.display())
                        })?;
                        let store = MemoryContentStore::from_json(&json).with_context(|| {
                            format!("failed to parse content fixture {}", path.display())
                        })?;
                        info!(fixture = %path.display(), "memory content store loaded");
                        store
                    }
                    None => {
                        info!("memory content store started empty");
                        MemoryContentStore::new()
                    }
                };
                Arc::new(store)
            }
        };

        let fields: Option<Arc<dyn FieldProvider>> = if config.typed_fields {
            let provider = DefinedFieldProvider::load(store.as_ref())
                .await
                .context("failed to load field definitions")?;
            info!(definitions = provider.len(), "typed field provider enabled");
            Some(Arc::new(provider))
        } else {
            None
        };

        Ok(Self::from_parts(
            store,
            Arc::new(RegistryRenderer::new()),
            fields,
            Permalinks::new(&config.site_url),
        ))
    }

    /// Assemble state from already-built collaborators.
    pub fn from_parts(
        store: Arc<dyn ContentStore>,
        renderer: Arc<dyn BlockRenderer>,
        fields: Option<Arc<dyn FieldProvider>>,
        permalinks: Permalinks,
    ) -> Self {
        let formatter = RecordFormatter::new(store.clone(), renderer, fields, permalinks);
        Self {
            inner: Arc::new(AppStateInner { store, formatter }),
        }
    }

    /// Get the content store.
    pub fn store(&self) -> &dyn ContentStore {
        self.inner.store.as_ref()
    }

    /// Get the record formatter.
    pub fn formatter(&self) -> &RecordFormatter {
        &self.inner.formatter
    }

    /// Check if the content store is reachable.
    pub async fn store_healthy(&self) -> bool {
        self.inner.store.ping().await
    }
}
