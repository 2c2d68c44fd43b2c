//! Rich-text conversion collaborator
//!
//! Text blocks switch between markdown and rich-text (HTML) authoring. The
//! editor hands the old content to a [`TextConverter`] and stores whatever it
//! returns; it never inspects the markup itself.

use crate::models::TextMode;
use crate::utils::markdown::{html_to_markdown, markdown_to_html};

/// Pure `content, from, to -> content` conversion
pub trait TextConverter: Send + Sync {
    fn convert(&self, content: &str, from: TextMode, to: TextMode) -> String;
}

/// Default converter: pulldown-cmark for markdown → HTML, tag rewriting for
/// HTML → markdown
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownConverter;

impl TextConverter for MarkdownConverter {
    fn convert(&self, content: &str, from: TextMode, to: TextMode) -> String {
        match (from, to) {
            (TextMode::Markdown, TextMode::RichText) => markdown_to_html(content),
            (TextMode::RichText, TextMode::Markdown) => html_to_markdown(content),
            _ => content.to_string(),
        }
    }
}

impl<F> TextConverter for F
where
    F: Fn(&str, TextMode, TextMode) -> String + Send + Sync,
{
    fn convert(&self, content: &str, from: TextMode, to: TextMode) -> String {
        self(content, from, to)
    }
}
