//! Content shaping: block parsing and rendering, excerpts, permalinks,
//! custom fields, and the record formatter built on them.

pub mod block_parser;
pub mod block_render;
pub mod excerpt;
pub mod fields;
pub mod format;
pub mod permalink;

pub use block_parser::{ParsedBlock, parse_blocks};
pub use block_render::{BlockRenderer, RegistryRenderer, RenderCallback};
pub use fields::{DefinedFieldProvider, FieldProvider};
pub use format::{BlockRecord, ContentRecord, RecordFormatter};
pub use permalink::Permalinks;
