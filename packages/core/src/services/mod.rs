//! Editor Services
//!
//! This module contains the stateful side of the resource builder:
//!
//! - `ResourceEditor` - owns a document and applies every edit to it
//! - `SelectionState` - active block per scope, pending insertion, container view state
//! - `EditorEvent` - broadcast after every applied edit
//! - Collaborator seams: `SaveHandler`, `UploadService`, `CommentStore`
//!
//! The tree engine in [`crate::operations`] stays pure; services decide which
//! collection an edit targets and what happens after it is applied.

pub mod comments;
pub mod editor;
pub mod error;
pub mod events;
pub mod persistence;
pub mod selection;
pub mod upload;

pub use comments::{Comment, CommentError, CommentStore, InMemoryCommentStore, NewComment};
pub use editor::{ResourceEditor, SectionUpdate, MIN_TABS};
pub use error::EditorError;
pub use events::EditorEvent;
pub use persistence::SaveHandler;
pub use selection::{ContainerUiState, InsertionTarget, SelectionState};
pub use upload::{StorageTarget, UploadError, UploadRequest, UploadService, UploadedFile};

#[cfg(test)]
mod editor_document_test;
