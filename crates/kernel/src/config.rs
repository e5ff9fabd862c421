//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Which content store backs the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// PostgreSQL via sqlx.
    Postgres,
    /// In-process store, optionally seeded from a JSON fixture.
    Memory,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// Content store backend: "postgres" (default) or "memory".
    pub store_backend: StoreBackend,

    /// PostgreSQL connection URL. Required for the postgres backend.
    pub database_url: Option<String>,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// JSON fixture loaded into the memory backend.
    pub content_fixture: Option<PathBuf>,

    /// Versioned route prefix (default: /content-api/v1). Empty mounts at root.
    pub api_namespace: String,

    /// Public site URL used to build permalinks.
    pub site_url: String,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,

    /// Resolve custom fields through typed field definitions (default: true).
    pub typed_fields: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let store_backend = match lookup("CONTENT_STORE")
            .unwrap_or_else(|| "postgres".to_string())
            .to_lowercase()
            .as_str()
        {
            "postgres" => StoreBackend::Postgres,
            "memory" => StoreBackend::Memory,
            other => bail!("CONTENT_STORE must be \"postgres\" or \"memory\", got {other:?}"),
        };

        let database_url = lookup("DATABASE_URL");
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL environment variable is required");
        }

        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let content_fixture = lookup("CONTENT_FIXTURE").map(PathBuf::from);

        let api_namespace = normalize_namespace(
            &lookup("API_NAMESPACE").unwrap_or_else(|| "/content-api/v1".to_string()),
        );

        let site_url = lookup("SITE_URL")
            .unwrap_or_else(|| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_string();

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(|| vec!["*".to_string()]);

        let typed_fields = match lookup("TYPED_FIELDS") {
            None => true,
            Some(v) => parse_flag(&v).context("TYPED_FIELDS must be a boolean")?,
        };

        Ok(Self {
            port,
            store_backend,
            database_url,
            database_max_connections,
            content_fixture,
            api_namespace,
            site_url,
            cors_allowed_origins,
            typed_fields,
        })
    }
}

/// Normalize a route prefix to `/a/b` form, or the empty string for root.
fn normalize_namespace(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("unrecognized flag value {other:?}"),
    }
}
