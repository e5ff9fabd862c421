//! Parser for comment-delimited block markup.
//!
//! A body is a sequence of blocks written as HTML comments:
//!
//! ```text
//! <!-- wp:heading {"level":2} --><h2>Title</h2><!-- /wp:heading -->
//! <!-- wp:core/separator /-->
//! ```
//!
//! Markup outside any block becomes a freeform block with no name. Nested
//! blocks are collected into `inner_blocks`, and their positions are marked
//! with `None` in `inner_content`. Blocks nested deeper than [`MAX_DEPTH`]
//! are not parsed: their delimiters stay in the enclosing block's markup.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

/// Namespace assumed for block names written without one.
const DEFAULT_NAMESPACE: &str = "core/";

/// Deepest block nesting the parser builds. Rendering and dropping a block
/// tree recurse once per level, so this bounds stack use.
pub const MAX_DEPTH: usize = 100;

/// A parsed block.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBlock {
    /// Fully-qualified name (`namespace/name`), `None` for freeform markup.
    pub name: Option<String>,
    pub attrs: Map<String, Value>,
    pub inner_blocks: Vec<ParsedBlock>,
    /// Inner markup with inner-block positions removed.
    pub inner_html: String,
    /// Markup fragments; `None` marks where an inner block sits.
    pub inner_content: Vec<Option<String>>,
}

impl ParsedBlock {
    fn named(name: String, attrs: Map<String, Value>) -> Self {
        Self {
            name: Some(name),
            attrs,
            inner_blocks: Vec::new(),
            inner_html: String::new(),
            inner_content: Vec::new(),
        }
    }

    fn freeform(html: &str) -> Self {
        Self {
            name: None,
            attrs: Map::new(),
            inner_blocks: Vec::new(),
            inner_html: html.to_string(),
            inner_content: vec![Some(html.to_string())],
        }
    }

    fn push_html(&mut self, html: &str) {
        if !html.is_empty() {
            self.inner_html.push_str(html);
            self.inner_content.push(Some(html.to_string()));
        }
    }
}

// The delimiter grammar never changes; the pattern is a compile-time constant.
#[allow(clippy::expect_used)]
static DELIMITER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)<!--\s+(?P<closer>/)?wp:(?P<namespace>[a-z][a-z0-9_-]*/)?(?P<name>[a-z][a-z0-9_-]*)\s+(?P<attrs>\{.*?\}\s+)?(?P<void>/)?-->",
    )
    .expect("block delimiter pattern must compile")
});

enum Token {
    Opener(ParsedBlock),
    Void(ParsedBlock),
    Closer,
}

struct Frame {
    block: ParsedBlock,
    token_start: usize,
    token_len: usize,
    prev_offset: usize,
    leading_html_start: Option<usize>,
}

struct Parser<'a> {
    document: &'a str,
    offset: usize,
    output: Vec<ParsedBlock>,
    stack: Vec<Frame>,
    /// Openers seen past `MAX_DEPTH` whose closers are still to come.
    overflow: usize,
}

/// Parse a body into its top-level blocks.
pub fn parse_blocks(document: &str) -> Vec<ParsedBlock> {
    let mut parser = Parser {
        document,
        offset: 0,
        output: Vec::new(),
        stack: Vec::new(),
        overflow: 0,
    };
    while parser.proceed() {}
    parser.output
}

impl Parser<'_> {
    /// Consume one token. Returns false once the document is exhausted.
    fn proceed(&mut self) -> bool {
        let Some((token, start, len)) = self.next_token() else {
            // No more delimiters: close whatever is still open.
            if self.stack.is_empty() {
                self.add_freeform();
            } else {
                while !self.stack.is_empty() {
                    self.add_block_from_stack(None);
                }
            }
            return false;
        };

        let leading_html_start = (start > self.offset).then_some(self.offset);

        // Too deep: keep the delimiter as markup of the innermost open block.
        let too_deep = match token {
            Token::Opener(_) if self.stack.len() >= MAX_DEPTH => {
                self.overflow += 1;
                true
            }
            Token::Void(_) => self.stack.len() >= MAX_DEPTH,
            Token::Closer if self.overflow > 0 => {
                self.overflow -= 1;
                true
            }
            _ => false,
        };
        if too_deep {
            self.offset = start + len;
            return true;
        }

        match token {
            Token::Void(block) => {
                if self.stack.is_empty() {
                    if let Some(html_start) = leading_html_start {
                        self.output
                            .push(ParsedBlock::freeform(&self.document[html_start..start]));
                    }
                    self.output.push(block);
                } else {
                    self.add_inner_block(block, start, len, None);
                }
                self.offset = start + len;
                true
            }
            Token::Opener(block) => {
                self.stack.push(Frame {
                    block,
                    token_start: start,
                    token_len: len,
                    prev_offset: start + len,
                    leading_html_start,
                });
                self.offset = start + len;
                true
            }
            Token::Closer => {
                if self.stack.is_empty() {
                    // Closer with nothing open: the rest is plain markup.
                    self.add_freeform();
                    return false;
                }

                if self.stack.len() == 1 {
                    self.add_block_from_stack(Some(start));
                    self.offset = start + len;
                    return true;
                }

                let Some(mut frame) = self.stack.pop() else {
                    return false;
                };
                let html = &self.document[frame.prev_offset..start];
                frame.block.push_html(html);
                self.add_inner_block(
                    frame.block,
                    frame.token_start,
                    frame.token_len,
                    Some(start + len),
                );
                self.offset = start + len;
                true
            }
        }
    }

    fn next_token(&self) -> Option<(Token, usize, usize)> {
        let caps = DELIMITER.captures_at(self.document, self.offset)?;
        let whole = caps.get(0)?;

        let namespace = caps
            .name("namespace")
            .map_or(DEFAULT_NAMESPACE, |m| m.as_str());
        let name = format!("{namespace}{}", caps.name("name")?.as_str());

        let attrs = caps
            .name("attrs")
            .and_then(|m| serde_json::from_str::<Value>(m.as_str().trim()).ok())
            .and_then(|v| match v {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .unwrap_or_default();

        let token = if caps.name("closer").is_some() {
            Token::Closer
        } else if caps.name("void").is_some() {
            Token::Void(ParsedBlock::named(name, attrs))
        } else {
            Token::Opener(ParsedBlock::named(name, attrs))
        };

        Some((token, whole.start(), whole.len()))
    }

    fn add_freeform(&mut self) {
        let html = &self.document[self.offset..];
        if !html.is_empty() {
            self.output.push(ParsedBlock::freeform(html));
        }
    }

    fn add_inner_block(
        &mut self,
        block: ParsedBlock,
        token_start: usize,
        token_len: usize,
        last_offset: Option<usize>,
    ) {
        let document = self.document;
        let Some(parent) = self.stack.last_mut() else {
            self.output.push(block);
            return;
        };
        let html = &document[parent.prev_offset..token_start];
        parent.block.push_html(html);
        parent.block.inner_blocks.push(block);
        parent.block.inner_content.push(None);
        parent.prev_offset = last_offset.unwrap_or(token_start + token_len);
    }

    fn add_block_from_stack(&mut self, end_offset: Option<usize>) {
        let Some(mut frame) = self.stack.pop() else {
            return;
        };

        let end = end_offset.unwrap_or(self.document.len());
        let html = &self.document[frame.prev_offset..end];
        frame.block.push_html(html);

        if let Some(html_start) = frame.leading_html_start {
            self.output.push(ParsedBlock::freeform(
                &self.document[html_start..frame.token_start],
            ));
        }

        self.output.push(frame.block);
    }
}
