//! Type-Safe Text Block Wrapper
//!
//! Text blocks store their content in one of two authoring modes. In
//! `markdown` mode the content lives in `data.markdown`; in `richtext` mode it
//! lives in `data.html`. Switching modes is done through a
//! [`crate::utils::TextConverter`], never by this wrapper.
//!
//! # Examples
//!
//! ```rust
//! use resource_builder_core::models::{Block, BlockType, TextBlock, TextMode};
//! use serde_json::json;
//!
//! let block = Block::leaf("t1", BlockType::Text, json!({"mode": "markdown", "markdown": "# Hi"})).unwrap();
//! let text = TextBlock::from_block(&block).unwrap();
//!
//! assert_eq!(text.mode(), TextMode::Markdown);
//! assert_eq!(text.content(), "# Hi");
//! ```

use crate::models::block::{Block, BlockData, BlockType};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use thiserror::Error;

/// Authoring mode of a text block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMode {
    #[default]
    Markdown,
    RichText,
}

impl TextMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextMode::Markdown => "markdown",
            TextMode::RichText => "richtext",
        }
    }

    /// The `data` field holding content in this mode
    pub fn content_field(&self) -> &'static str {
        match self {
            TextMode::Markdown => "markdown",
            TextMode::RichText => "html",
        }
    }

    /// Default payload for a new text block in this mode
    pub fn empty_payload(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("mode".to_string(), json!(self.as_str()));
        payload.insert(self.content_field().to_string(), json!(""));
        Value::Object(payload)
    }
}

impl fmt::Display for TextMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum TextBlockError {
    #[error("Wrong block type: expected 'text', got '{actual}'")]
    WrongBlockType { actual: BlockType },

    #[error("Unknown text mode '{0}'")]
    UnknownMode(String),
}

/// Read-only typed view over a text block
pub struct TextBlock<'a> {
    fields: &'a Map<String, Value>,
    mode: TextMode,
}

impl<'a> TextBlock<'a> {
    /// Wrap a block, checking that it is a text block with a known mode
    ///
    /// A missing `mode` field is read as markdown.
    pub fn from_block(block: &'a Block) -> Result<Self, TextBlockError> {
        let fields = match &block.data {
            BlockData::Leaf {
                block_type: BlockType::Text,
                fields,
            } => fields,
            other => {
                return Err(TextBlockError::WrongBlockType {
                    actual: other.block_type(),
                })
            }
        };

        let mode = match fields.get("mode").and_then(Value::as_str) {
            None | Some("markdown") => TextMode::Markdown,
            Some("richtext") => TextMode::RichText,
            Some(other) => return Err(TextBlockError::UnknownMode(other.to_string())),
        };

        Ok(Self { fields, mode })
    }

    pub fn mode(&self) -> TextMode {
        self.mode
    }

    pub fn markdown(&self) -> Option<&str> {
        self.fields.get("markdown").and_then(Value::as_str)
    }

    pub fn html(&self) -> Option<&str> {
        self.fields.get("html").and_then(Value::as_str)
    }

    /// Content of the active mode, empty when absent
    pub fn content(&self) -> &str {
        self.fields
            .get(self.mode.content_field())
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}
