//! Permalink construction.

use crate::models::ContentType;

/// Builds public URLs for items.
#[derive(Debug, Clone)]
pub struct Permalinks {
    site_url: String,
}

impl Permalinks {
    /// Create a builder rooted at `site_url` (a trailing slash is ignored).
    pub fn new(site_url: &str) -> Self {
        Self {
            site_url: site_url.trim_end_matches('/').to_string(),
        }
    }

    /// `{site}/{slug}/`, or `{site}/{rewrite_slug}/{slug}/` when the type has one.
    pub fn item(&self, content_type: Option<&ContentType>, slug: &str) -> String {
        match content_type
            .and_then(|t| t.rewrite_slug.as_deref())
            .map(|s| s.trim_matches('/'))
            .filter(|s| !s.is_empty())
        {
            Some(prefix) => format!("{}/{prefix}/{slug}/", self.site_url),
            None => format!("{}/{slug}/", self.site_url),
        }
    }
}
