//! Error types for the tree mutation engine
//!
//! The public engine functions never surface these: they log the error and
//! hand back the input tree. The `try_*` twins return them so callers that
//! need to tell a no-op from a success (the editor, tests) can.

use crate::models::{BlockType, ModelError, Slot};
use thiserror::Error;

/// Errors that can occur while rewriting a block tree
///
/// # Examples
///
/// ```rust
/// use resource_builder_core::operations::TreeOperationError;
///
/// let err = TreeOperationError::target_not_found("blk-42");
/// assert_eq!(err.to_string(), "Block 'blk-42' not found");
///
/// let err = TreeOperationError::structural_floor("cols", "column", 1);
/// assert!(err.is_structural_floor());
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeOperationError {
    /// No block with this id exists anywhere in the tree
    ///
    /// Stale ids are expected (a re-render can race a delete), so callers
    /// usually treat this as a no-op.
    #[error("Block '{id}' not found")]
    TargetNotFound { id: String },

    /// The operation would drop a container below its minimum slot count
    ///
    /// Also used for the last-tab rule, with `slot_kind = "tab"`.
    #[error("Cannot remove the last {slot_kind} of '{container_id}': at least {minimum} must remain")]
    StructuralFloor {
        container_id: String,
        slot_kind: String,
        minimum: usize,
    },

    #[error("Block '{id}' of type '{block_type}' is not a container")]
    NotAContainer { id: String, block_type: BlockType },

    #[error("Container '{container_id}' has no slot {slot}")]
    SlotNotFound { container_id: String, slot: Slot },

    /// Patch was not a JSON object, or produced data that no longer decodes
    #[error("Invalid patch for block '{id}': {reason}")]
    InvalidPatch { id: String, reason: String },

    #[error("Index {index} out of bounds for collection of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Invalid block path: {reason}")]
    InvalidPath { reason: String },

    /// The container type does not support this slot operation (e.g. adding a
    /// grid cell outside of a layout change)
    #[error("Unsupported slot operation on '{container_id}': {reason}")]
    UnsupportedSlotOperation {
        container_id: String,
        reason: String,
    },

    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

impl TreeOperationError {
    pub fn target_not_found(id: impl Into<String>) -> Self {
        Self::TargetNotFound { id: id.into() }
    }

    pub fn structural_floor(
        container_id: impl Into<String>,
        slot_kind: impl Into<String>,
        minimum: usize,
    ) -> Self {
        Self::StructuralFloor {
            container_id: container_id.into(),
            slot_kind: slot_kind.into(),
            minimum,
        }
    }

    pub fn not_a_container(id: impl Into<String>, block_type: BlockType) -> Self {
        Self::NotAContainer {
            id: id.into(),
            block_type,
        }
    }

    pub fn slot_not_found(container_id: impl Into<String>, slot: Slot) -> Self {
        Self::SlotNotFound {
            container_id: container_id.into(),
            slot,
        }
    }

    pub fn invalid_patch(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPatch {
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub fn index_out_of_bounds(index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds { index, len }
    }

    pub fn invalid_path(reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            reason: reason.into(),
        }
    }

    pub fn unsupported_slot_operation(
        container_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnsupportedSlotOperation {
            container_id: container_id.into(),
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TargetNotFound { .. })
    }

    pub fn is_structural_floor(&self) -> bool {
        matches!(self, Self::StructuralFloor { .. })
    }
}
