//! Server-side block rendering.
//!
//! Static blocks render to their saved markup, with every inner-block
//! placeholder replaced by that inner block's rendered output. Blocks with a
//! registered render callback are dynamic: the callback receives the block's
//! attributes and its rendered inner content and returns the final markup.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::block_parser::ParsedBlock;

/// Renders a parsed block to markup.
pub trait BlockRenderer: Send + Sync {
    fn render(&self, block: &ParsedBlock) -> String;
}

/// Render callback for a dynamic block: `(attrs, inner content) -> markup`.
pub type RenderCallback = Arc<dyn Fn(&Map<String, Value>, &str) -> String + Send + Sync>;

/// Renderer with a registry of dynamic block callbacks.
#[derive(Clone, Default)]
pub struct RegistryRenderer {
    callbacks: HashMap<String, RenderCallback>,
}

impl RegistryRenderer {
    /// Create a renderer with no dynamic blocks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a render callback for a fully-qualified block name.
    ///
    /// Replaces any callback already registered under that name.
    pub fn register<F>(&mut self, name: &str, callback: F)
    where
        F: Fn(&Map<String, Value>, &str) -> String + Send + Sync + 'static,
    {
        self.callbacks.insert(name.to_string(), Arc::new(callback));
    }

    /// Concatenate the saved markup, rendering inner blocks in place.
    fn render_inner(&self, block: &ParsedBlock) -> String {
        let mut inner_blocks = block.inner_blocks.iter();
        let mut html = String::new();
        for chunk in &block.inner_content {
            match chunk {
                Some(fragment) => html.push_str(fragment),
                None => {
                    if let Some(inner) = inner_blocks.next() {
                        html.push_str(&self.render(inner));
                    }
                }
            }
        }
        html
    }
}

impl BlockRenderer for RegistryRenderer {
    fn render(&self, block: &ParsedBlock) -> String {
        let content = self.render_inner(block);
        match block.name.as_deref().and_then(|n| self.callbacks.get(n)) {
            Some(callback) => callback(&block.attrs, &content),
            None => content,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::content::block_parser::{MAX_DEPTH, parse_blocks};

    #[test]
    fn static_block_renders_saved_markup() {
        let blocks = parse_blocks("<!-- wp:paragraph --><p>Hello</p><!-- /wp:paragraph -->");
        let html = RegistryRenderer::new().render(&blocks[0]);
        assert_eq!(html, "<p>Hello</p>");
    }

    #[test]
    fn inner_blocks_render_in_place() {
        let blocks = parse_blocks(concat!(
            "<!-- wp:quote --><blockquote>",
            "<!-- wp:paragraph --><p>One</p><!-- /wp:paragraph -->",
            "<!-- wp:paragraph --><p>Two</p><!-- /wp:paragraph -->",
            "</blockquote><!-- /wp:quote -->"
        ));
        let html = RegistryRenderer::new().render(&blocks[0]);
        assert_eq!(html, "<blockquote><p>One</p><p>Two</p></blockquote>");
    }

    #[test]
    fn dynamic_callback_overrides_static_markup() {
        let mut renderer = RegistryRenderer::new();
        renderer.register("acme/counter", |attrs, _inner| {
            let start = attrs.get("start").and_then(Value::as_i64).unwrap_or(0);
            format!("<span class=\"counter\">{start}</span>")
        });

        let blocks = parse_blocks(r#"<!-- wp:acme/counter {"start":4} /-->"#);
        assert_eq!(
            renderer.render(&blocks[0]),
            "<span class=\"counter\">4</span>"
        );
    }

    #[test]
    fn dynamic_callback_sees_rendered_inner_content() {
        let mut renderer = RegistryRenderer::new();
        renderer.register("core/group", |_attrs, inner| format!("<section>{inner}</section>"));
        renderer.register("core/paragraph", |_attrs, inner| inner.to_uppercase());

        let blocks = parse_blocks(concat!(
            "<!-- wp:group --><div>",
            "<!-- wp:paragraph --><p>x</p><!-- /wp:paragraph -->",
            "</div><!-- /wp:group -->"
        ));
        assert_eq!(
            renderer.render(&blocks[0]),
            "<section><div><P>X</P></div></section>"
        );
    }

    #[test]
    fn deeply_nested_body_renders() {
        let levels = 20_000;
        let doc = format!(
            "{}<p>deep</p>{}",
            "<!-- wp:group -->".repeat(levels),
            "<!-- /wp:group -->".repeat(levels)
        );
        let blocks = parse_blocks(&doc);

        let mut renderer = RegistryRenderer::new();
        renderer.register("core/group", |_attrs, inner| format!("<div>{inner}</div>"));
        let html = renderer.render(&blocks[0]);

        assert_eq!(html.matches("<div>").count(), MAX_DEPTH);
        assert!(html.contains("<p>deep</p>"));
    }
}
