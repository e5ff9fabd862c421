//! Headless content API.
//!
//! Read-only JSON endpoints over published content: items, their rendered
//! blocks and custom fields, and the taxonomies that classify them.
//! The `content-api` binary is the entry point for running the server.

pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
