//! Editor Error Types
//!
//! Errors returned by [`crate::services::ResourceEditor`]. Whenever a method
//! returns one of these the document is unchanged and nothing was saved or
//! broadcast.

use crate::models::{BlockType, ModelError, TabMode};
use crate::operations::TreeOperationError;
use crate::services::upload::UploadError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Tab not found: {tab_id}")]
    TabNotFound { tab_id: String },

    #[error("Section not found: {section_id} in tab {tab_id}")]
    SectionNotFound { tab_id: String, section_id: String },

    /// A section scope was given for a direct tab, or no section for a sectioned one
    #[error("Tab {tab_id} is in {mode} mode")]
    ScopeModeMismatch { tab_id: String, mode: TabMode },

    #[error("No block insertion is pending")]
    NoPendingInsertion,

    #[error("Block '{block_id}' is a {actual} block, expected {expected}")]
    WrongBlockType {
        block_id: String,
        expected: String,
        actual: BlockType,
    },

    #[error("Invalid editor config: {0}")]
    InvalidConfig(String),

    #[error("Upload failed: {0}")]
    Upload(#[from] UploadError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Tree operation failed: {0}")]
    Operation(#[from] TreeOperationError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl EditorError {
    pub fn tab_not_found(tab_id: impl Into<String>) -> Self {
        Self::TabNotFound {
            tab_id: tab_id.into(),
        }
    }

    pub fn section_not_found(tab_id: impl Into<String>, section_id: impl Into<String>) -> Self {
        Self::SectionNotFound {
            tab_id: tab_id.into(),
            section_id: section_id.into(),
        }
    }

    pub fn scope_mode_mismatch(tab_id: impl Into<String>, mode: TabMode) -> Self {
        Self::ScopeModeMismatch {
            tab_id: tab_id.into(),
            mode,
        }
    }

    pub fn wrong_block_type(
        block_id: impl Into<String>,
        expected: impl Into<String>,
        actual: BlockType,
    ) -> Self {
        Self::WrongBlockType {
            block_id: block_id.into(),
            expected: expected.into(),
            actual,
        }
    }

    /// Whether the operation was rejected by a minimum-cardinality rule
    pub fn is_structural_floor(&self) -> bool {
        matches!(self, Self::Operation(e) if e.is_structural_floor())
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            Self::TabNotFound { .. } | Self::SectionNotFound { .. } => true,
            Self::Operation(e) => e.is_not_found(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for EditorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
