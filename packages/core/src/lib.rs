//! Resource Builder Core
//!
//! This crate provides the document model and tree mutation engine behind
//! the resource builder: a block editor where container blocks (tabs,
//! columns, grids, accordions, callouts, toggles) nest other blocks to any
//! depth.
//!
//! # Architecture
//!
//! - **Recursive blocks**: a single `Block` type; containers hold child
//!   collections in named slots
//! - **Pure tree operations**: every mutation takes a collection and returns
//!   a new one, so callers swap state in one step
//! - **Editor service**: `ResourceEditor` owns the resource and selection,
//!   applies operations per scope and broadcasts an `EditorEvent` per change
//! - **Collaborators behind traits**: persistence, uploads, comments and text
//!   conversion are injected
//!
//! # Modules
//!
//! - [`models`] - Resource, tabs, sections, blocks and container payloads
//! - [`operations`] - Tree and slot operations, path-addressed dispatch
//! - [`registry`] - Block type catalog and empty block construction
//! - [`render`] - Recursive rendering dispatch and the outline renderer
//! - [`services`] - `ResourceEditor`, events, selection and collaborators
//! - [`config`] - `EditorConfig`
//! - [`ids`] - Id generation
//! - [`utils`] - Markdown helpers and text conversion

pub mod config;
pub mod ids;
pub mod models;
pub mod operations;
pub mod registry;
pub mod render;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::{EditorConfig, IdStrategy};
pub use ids::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use models::*;
pub use operations::{BlockAddress, BlockOp, BlockPath, ChildTarget, DuplicatePolicy, TreeOperationError};
pub use registry::{create_empty_block, BlockRegistry};
pub use services::*;
