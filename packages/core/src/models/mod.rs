//! Data Models
//!
//! This module contains the document structures of the resource builder:
//!
//! - `Block` - the polymorphic content node, with a closed set of `BlockType`s
//! - Container payloads (`TabsData`, `ColumnsData`, `GridData`, ...) and `Slot`
//! - `Resource` → `Tab` → `Section` → `Block` document hierarchy
//! - `TextBlock` - typed view over text block content
//!
//! Every entity serializes to the plain nested JSON the persistence
//! collaborator stores.

mod block;
mod container;
mod resource;
mod text;

pub use block::{Block, BlockData, BlockType, ModelError};
pub use container::{
    AccordionData, AccordionItem, BodyData, Column, ColumnsData, GridCell, GridData, GridLayout,
    Slot, TabItem, TabsData,
};
pub use resource::{
    renumber_sections, Resource, ResourceMetadata, Scope, Section, Tab, TabContent, TabMode,
};
pub use text::{TextBlock, TextBlockError, TextMode};

#[cfg(test)]
mod resource_test;
