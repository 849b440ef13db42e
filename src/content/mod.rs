//! Content module - posts, rich text and the derived reading/navigation data

pub mod adjacent;
mod document;
pub mod reading_time;
pub mod rich_text;

pub use adjacent::{resolve, resolve_linkable, AdjacentPosts};
pub use document::{ContentBlock, Document, PostSummary};
pub use reading_time::{estimate, ReadingEstimate};
pub use rich_text::RichTextNode;
