//! Data models for the content store.

pub mod field;
pub mod item;
pub mod item_type;
pub mod taxonomy;

pub use field::{FieldDefinition, FieldType};
pub use item::{Attachment, ContentItem, ItemMeta, PublishedQuery, STATUS_PUBLISH};
pub use item_type::ContentType;
pub use taxonomy::{Taxonomy, Term};
