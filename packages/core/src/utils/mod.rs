//! Utility functions for the resource builder core
//!
//! Markdown helpers and the default text conversion collaborator.

mod convert;
mod markdown;

pub use convert::{MarkdownConverter, TextConverter};
pub use markdown::{html_to_markdown, markdown_to_html, strip_markdown, summarize};
