//! Rendering module for converting inspection results to output formats.

mod json;
mod markdown;
mod options;

pub use json::{to_json, JsonFormat};
pub use markdown::{to_markdown_table, MarkdownTableRenderer};
pub use options::MarkdownTableOptions;
