//! Block Data Structures
//!
//! This module defines the polymorphic `Block` node of a resource document and
//! its closed set of types.
//!
//! # Architecture
//!
//! - **Closed type set**: `BlockType` lists every block the builder knows about.
//!   There is no runtime registration of new shapes.
//! - **Leaf blocks** keep their payload as a plain JSON object (`fields`), read
//!   only by the block's own widget.
//! - **Container blocks** carry typed payloads (`TabsData`, `ColumnsData`, ...)
//!   so the tree engine can reach every nested child collection without
//!   inspecting JSON.
//!
//! # Wire format
//!
//! ```json
//! { "id": "b1", "type": "columns", "title": "Layout",
//!   "data": { "columns": [ { "id": "c1", "blocks": [] } ] } }
//! ```
//!
//! # Examples
//!
//! ```rust
//! use resource_builder_core::models::{Block, BlockData, BlockType};
//! use serde_json::json;
//!
//! let block: Block = serde_json::from_value(json!({
//!     "id": "intro",
//!     "type": "text",
//!     "data": { "mode": "markdown", "markdown": "# Welcome" }
//! }))
//! .unwrap();
//!
//! assert_eq!(block.block_type(), BlockType::Text);
//! assert!(!block.is_container());
//! ```

use crate::ids::IdGenerator;
use crate::models::container::{AccordionData, BodyData, ColumnsData, GridData, Slot, TabsData};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while building or decoding blocks
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// The type tag is not one of the closed block types
    #[error("Invalid block type: '{0}'")]
    InvalidBlockType(String),

    #[error("Invalid data for '{block_type}' block: {reason}")]
    InvalidBlockData {
        block_type: BlockType,
        reason: String,
    },

    /// Leaf payloads can only be attached to leaf types
    #[error("Block type '{0}' is a container and cannot hold leaf data")]
    NotALeafType(BlockType),
}

impl ModelError {
    pub fn invalid_block_type(tag: impl Into<String>) -> Self {
        Self::InvalidBlockType(tag.into())
    }

    pub fn invalid_block_data(block_type: BlockType, reason: impl Into<String>) -> Self {
        Self::InvalidBlockData {
            block_type,
            reason: reason.into(),
        }
    }
}

/// The closed set of block types
///
/// Serialized as the lowercase tag stored in the block's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Text,
    Image,
    Video,
    File,
    Table,
    Divider,
    Code,
    Quote,
    Button,
    Alert,
    Checklist,
    Embed,
    Quiz,
    Tabs,
    Columns,
    Grid,
    Accordion,
    Callout,
    Toggle,
}

impl BlockType {
    /// Every block type, leaves first
    pub const ALL: [BlockType; 19] = [
        BlockType::Text,
        BlockType::Image,
        BlockType::Video,
        BlockType::File,
        BlockType::Table,
        BlockType::Divider,
        BlockType::Code,
        BlockType::Quote,
        BlockType::Button,
        BlockType::Alert,
        BlockType::Checklist,
        BlockType::Embed,
        BlockType::Quiz,
        BlockType::Tabs,
        BlockType::Columns,
        BlockType::Grid,
        BlockType::Accordion,
        BlockType::Callout,
        BlockType::Toggle,
    ];

    /// Wire tag for this type
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Text => "text",
            BlockType::Image => "image",
            BlockType::Video => "video",
            BlockType::File => "file",
            BlockType::Table => "table",
            BlockType::Divider => "divider",
            BlockType::Code => "code",
            BlockType::Quote => "quote",
            BlockType::Button => "button",
            BlockType::Alert => "alert",
            BlockType::Checklist => "checklist",
            BlockType::Embed => "embed",
            BlockType::Quiz => "quiz",
            BlockType::Tabs => "tabs",
            BlockType::Columns => "columns",
            BlockType::Grid => "grid",
            BlockType::Accordion => "accordion",
            BlockType::Callout => "callout",
            BlockType::Toggle => "toggle",
        }
    }

    /// Container types own nested block collections
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            BlockType::Tabs
                | BlockType::Columns
                | BlockType::Grid
                | BlockType::Accordion
                | BlockType::Callout
                | BlockType::Toggle
        )
    }

    pub fn is_leaf(&self) -> bool {
        !self.is_container()
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ModelError::invalid_block_type(s))
    }
}

/// Type-specific payload of a block
///
/// `Leaf` holds the raw widget fields. The container variants hold typed
/// child collections; their `extra` maps keep any scalar settings the UI
/// stores alongside (callout variant, toggle label, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum BlockData {
    Leaf {
        block_type: BlockType,
        fields: Map<String, Value>,
    },
    Tabs(TabsData),
    Columns(ColumnsData),
    Grid(GridData),
    Accordion(AccordionData),
    Callout(BodyData),
    Toggle(BodyData),
}

impl BlockData {
    /// Build a leaf payload
    ///
    /// # Errors
    ///
    /// Returns `ModelError::NotALeafType` for container types.
    pub fn leaf(block_type: BlockType, fields: Map<String, Value>) -> Result<Self, ModelError> {
        if block_type.is_container() {
            return Err(ModelError::NotALeafType(block_type));
        }
        Ok(BlockData::Leaf { block_type, fields })
    }

    /// Decode a payload for `block_type` from JSON
    ///
    /// `null` is normalized to an empty payload, and container collections
    /// that are missing or `null` become empty arrays.
    pub fn from_value(block_type: BlockType, value: Value) -> Result<Self, ModelError> {
        let value = match value {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };

        let invalid = |e: serde_json::Error| ModelError::invalid_block_data(block_type, e.to_string());

        match block_type {
            BlockType::Tabs => serde_json::from_value(value).map(BlockData::Tabs).map_err(invalid),
            BlockType::Columns => serde_json::from_value(value)
                .map(BlockData::Columns)
                .map_err(invalid),
            BlockType::Grid => serde_json::from_value(value).map(BlockData::Grid).map_err(invalid),
            BlockType::Accordion => serde_json::from_value(value)
                .map(BlockData::Accordion)
                .map_err(invalid),
            BlockType::Callout => serde_json::from_value(value)
                .map(BlockData::Callout)
                .map_err(invalid),
            BlockType::Toggle => serde_json::from_value(value)
                .map(BlockData::Toggle)
                .map_err(invalid),
            leaf => match value {
                Value::Object(fields) => BlockData::leaf(leaf, fields),
                other => Err(ModelError::invalid_block_data(
                    leaf,
                    format!("expected a JSON object, got {}", other),
                )),
            },
        }
    }

    /// Encode the payload back to JSON
    pub fn to_value(&self) -> Result<Value, ModelError> {
        serde_json::to_value(self)
            .map_err(|e| ModelError::invalid_block_data(self.block_type(), e.to_string()))
    }

    pub fn block_type(&self) -> BlockType {
        match self {
            BlockData::Leaf { block_type, .. } => *block_type,
            BlockData::Tabs(_) => BlockType::Tabs,
            BlockData::Columns(_) => BlockType::Columns,
            BlockData::Grid(_) => BlockType::Grid,
            BlockData::Accordion(_) => BlockType::Accordion,
            BlockData::Callout(_) => BlockType::Callout,
            BlockData::Toggle(_) => BlockType::Toggle,
        }
    }

    pub fn is_container(&self) -> bool {
        !matches!(self, BlockData::Leaf { .. })
    }

    /// Payload keys that hold child collections or their shape
    ///
    /// Only slot operations may change these.
    pub fn structural_keys(&self) -> &'static [&'static str] {
        match self {
            BlockData::Leaf { .. } => &[],
            BlockData::Tabs(_) => &["tabs"],
            BlockData::Columns(_) => &["columns"],
            BlockData::Grid(_) => &["cells", "layout"],
            BlockData::Accordion(_) => &["items", "sections"],
            BlockData::Callout(_) | BlockData::Toggle(_) => &["blocks"],
        }
    }

    /// Shallow-merge `patch` into this payload
    ///
    /// Top-level keys of `patch` replace the payload's keys; everything else is
    /// kept. A container patch may only touch settings: keys listed by
    /// [`BlockData::structural_keys`] are rejected, and the merged object must
    /// still decode as the same container shape.
    pub fn merged(&self, patch: &Map<String, Value>) -> Result<BlockData, ModelError> {
        let structural = self.structural_keys();
        if let Some(key) = patch.keys().find(|k| structural.contains(&k.as_str())) {
            return Err(ModelError::invalid_block_data(
                self.block_type(),
                format!("'{}' can only be changed through slot operations", key),
            ));
        }

        if let BlockData::Leaf { block_type, fields } = self {
            let mut fields = fields.clone();
            for (key, value) in patch {
                fields.insert(key.clone(), value.clone());
            }
            return Ok(BlockData::Leaf {
                block_type: *block_type,
                fields,
            });
        }

        let mut current = match self.to_value()? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, value) in patch {
            current.insert(key.clone(), value.clone());
        }
        BlockData::from_value(self.block_type(), Value::Object(current))
    }

    /// Read a scalar field (leaf field or container setting)
    pub fn field(&self, key: &str) -> Option<&Value> {
        match self {
            BlockData::Leaf { fields, .. } => fields.get(key),
            BlockData::Tabs(d) => d.extra.get(key),
            BlockData::Columns(d) => d.extra.get(key),
            BlockData::Grid(d) => d.extra.get(key),
            BlockData::Accordion(d) => d.extra.get(key),
            BlockData::Callout(d) | BlockData::Toggle(d) => d.extra.get(key),
        }
    }

    /// Every child collection of this payload, in display order
    ///
    /// Leaves have none. This is the single dispatch point the tree engine
    /// uses to descend into any container shape.
    pub fn slots(&self) -> Vec<(Slot, &Vec<Block>)> {
        match self {
            BlockData::Leaf { .. } => Vec::new(),
            BlockData::Tabs(d) => d
                .tabs
                .iter()
                .map(|t| (Slot::Tab(t.id.clone()), &t.blocks))
                .collect(),
            BlockData::Columns(d) => d
                .columns
                .iter()
                .map(|c| (Slot::Column(c.id.clone()), &c.blocks))
                .collect(),
            BlockData::Grid(d) => d
                .cells
                .iter()
                .map(|c| (Slot::Cell(c.id.clone()), &c.blocks))
                .collect(),
            BlockData::Accordion(d) => d
                .items
                .iter()
                .map(|i| (Slot::Item(i.id.clone()), &i.blocks))
                .collect(),
            BlockData::Callout(d) | BlockData::Toggle(d) => vec![(Slot::Body, &d.blocks)],
        }
    }

    /// Mutable twin of [`BlockData::slots`]
    pub fn slots_mut(&mut self) -> Vec<(Slot, &mut Vec<Block>)> {
        match self {
            BlockData::Leaf { .. } => Vec::new(),
            BlockData::Tabs(d) => d
                .tabs
                .iter_mut()
                .map(|t| (Slot::Tab(t.id.clone()), &mut t.blocks))
                .collect(),
            BlockData::Columns(d) => d
                .columns
                .iter_mut()
                .map(|c| (Slot::Column(c.id.clone()), &mut c.blocks))
                .collect(),
            BlockData::Grid(d) => d
                .cells
                .iter_mut()
                .map(|c| (Slot::Cell(c.id.clone()), &mut c.blocks))
                .collect(),
            BlockData::Accordion(d) => d
                .items
                .iter_mut()
                .map(|i| (Slot::Item(i.id.clone()), &mut i.blocks))
                .collect(),
            BlockData::Callout(d) | BlockData::Toggle(d) => vec![(Slot::Body, &mut d.blocks)],
        }
    }

    /// Look up one child collection by slot
    pub fn slot(&self, slot: &Slot) -> Option<&Vec<Block>> {
        self.slots()
            .into_iter()
            .find(|(s, _)| s == slot)
            .map(|(_, blocks)| blocks)
    }

    pub fn slot_mut(&mut self, slot: &Slot) -> Option<&mut Vec<Block>> {
        self.slots_mut()
            .into_iter()
            .find(|(s, _)| s == slot)
            .map(|(_, blocks)| blocks)
    }

    /// The slot the fixed "first slot" insertion policy targets
    pub fn first_slot(&self) -> Option<Slot> {
        self.slots().into_iter().next().map(|(slot, _)| slot)
    }

    /// Give every slot (tab item, column, cell, accordion item) a fresh id
    pub fn regenerate_slot_ids(&mut self, ids: &dyn IdGenerator) {
        match self {
            BlockData::Tabs(d) => d.tabs.iter_mut().for_each(|t| t.id = ids.next_id()),
            BlockData::Columns(d) => d.columns.iter_mut().for_each(|c| c.id = ids.next_id()),
            BlockData::Grid(d) => d.cells.iter_mut().for_each(|c| c.id = ids.next_id()),
            BlockData::Accordion(d) => d.items.iter_mut().for_each(|i| i.id = ids.next_id()),
            BlockData::Leaf { .. } | BlockData::Callout(_) | BlockData::Toggle(_) => {}
        }
    }
}

impl Serialize for BlockData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BlockData::Leaf { fields, .. } => fields.serialize(serializer),
            BlockData::Tabs(d) => d.serialize(serializer),
            BlockData::Columns(d) => d.serialize(serializer),
            BlockData::Grid(d) => d.serialize(serializer),
            BlockData::Accordion(d) => d.serialize(serializer),
            BlockData::Callout(d) | BlockData::Toggle(d) => d.serialize(serializer),
        }
    }
}

/// A content block: the polymorphic node of the document tree
///
/// Ids are unique across the whole document. The engine relies on that but
/// never generates ids on its own; see [`crate::ids::IdGenerator`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawBlock")]
pub struct Block {
    pub id: String,
    pub title: Option<String>,
    pub data: BlockData,
}

impl Block {
    pub fn new(id: impl Into<String>, data: BlockData) -> Self {
        Self {
            id: id.into(),
            title: None,
            data,
        }
    }

    /// Convenience constructor for leaf blocks
    pub fn leaf(
        id: impl Into<String>,
        block_type: BlockType,
        fields: Value,
    ) -> Result<Self, ModelError> {
        let data = BlockData::from_value(block_type, fields)?;
        if data.is_container() {
            return Err(ModelError::NotALeafType(block_type));
        }
        Ok(Self::new(id, data))
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn block_type(&self) -> BlockType {
        self.data.block_type()
    }

    pub fn is_container(&self) -> bool {
        self.data.is_container()
    }

    /// Shallow-merge `patch` into this block's data
    pub fn merge_data(&mut self, patch: &Map<String, Value>) -> Result<(), ModelError> {
        self.data = self.data.merged(patch)?;
        Ok(())
    }

    /// Number of blocks nested below this one, at any depth
    pub fn descendant_count(&self) -> usize {
        self.data
            .slots()
            .into_iter()
            .flat_map(|(_, blocks)| blocks.iter())
            .map(|child| 1 + child.descendant_count())
            .sum()
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let field_count = if self.title.is_some() { 4 } else { 3 };
        let mut state = serializer.serialize_struct("Block", field_count)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("type", &self.block_type())?;
        match &self.title {
            Some(title) => state.serialize_field("title", title)?,
            None => state.skip_field("title")?,
        }
        state.serialize_field("data", &self.data)?;
        state.end()
    }
}

/// Untyped wire shape; decoded into [`Block`] after the type tag is known
#[derive(Deserialize)]
struct RawBlock {
    id: String,
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    data: Value,
}

impl TryFrom<RawBlock> for Block {
    type Error = ModelError;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        let block_type: BlockType = raw.block_type.parse()?;
        Ok(Block {
            id: raw.id,
            title: raw.title,
            data: BlockData::from_value(block_type, raw.data)?,
        })
    }
}
