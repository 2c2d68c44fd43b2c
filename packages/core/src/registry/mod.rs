//! Block Type Registry
//!
//! Creates empty instances of every block type and describes each type for a
//! block picker. The factory is exhaustive over [`BlockType`]; unknown wire
//! tags are rejected with `ModelError::InvalidBlockType` before a block is
//! ever built.

use crate::ids::IdGenerator;
use crate::models::{
    AccordionData, AccordionItem, Block, BlockData, BlockType, BodyData, Column, ColumnsData,
    GridData, GridLayout, ModelError, TabItem, TabsData, TextMode,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Picker grouping of a block type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockCategory {
    Basic,
    Media,
    Layout,
    Interactive,
}

/// Catalog entry for one block type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockTypeInfo {
    pub block_type: BlockType,
    pub label: &'static str,
    pub category: BlockCategory,
    pub container: bool,
}

impl BlockType {
    pub fn info(&self) -> BlockTypeInfo {
        let (label, category) = match self {
            BlockType::Text => ("Text", BlockCategory::Basic),
            BlockType::Image => ("Image", BlockCategory::Media),
            BlockType::Video => ("Video", BlockCategory::Media),
            BlockType::File => ("File", BlockCategory::Media),
            BlockType::Table => ("Table", BlockCategory::Basic),
            BlockType::Divider => ("Divider", BlockCategory::Basic),
            BlockType::Code => ("Code", BlockCategory::Basic),
            BlockType::Quote => ("Quote", BlockCategory::Basic),
            BlockType::Button => ("Button", BlockCategory::Interactive),
            BlockType::Alert => ("Alert", BlockCategory::Basic),
            BlockType::Checklist => ("Checklist", BlockCategory::Interactive),
            BlockType::Embed => ("Embed", BlockCategory::Media),
            BlockType::Quiz => ("Quiz", BlockCategory::Interactive),
            BlockType::Tabs => ("Tabs", BlockCategory::Layout),
            BlockType::Columns => ("Columns", BlockCategory::Layout),
            BlockType::Grid => ("Grid", BlockCategory::Layout),
            BlockType::Accordion => ("Accordion", BlockCategory::Layout),
            BlockType::Callout => ("Callout", BlockCategory::Layout),
            BlockType::Toggle => ("Toggle", BlockCategory::Layout),
        };
        BlockTypeInfo {
            block_type: *self,
            label,
            category,
            container: self.is_container(),
        }
    }
}

/// The full picker catalog, in `BlockType::ALL` order
pub fn catalog() -> Vec<BlockTypeInfo> {
    BlockType::ALL.iter().map(BlockType::info).collect()
}

/// Empty-block factory
///
/// Holds the few defaults that vary per editor (new text mode, new grid
/// shape). Everything else about an empty block is fixed per type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockRegistry {
    pub text_mode: TextMode,
    pub grid_layout: GridLayout,
}

impl BlockRegistry {
    pub fn new(text_mode: TextMode, grid_layout: GridLayout) -> Self {
        Self {
            text_mode,
            grid_layout,
        }
    }

    /// Create a block of `block_type` with a fresh id and default data
    ///
    /// Slot ids of containers (tab items, columns, cells, accordion items) are
    /// drawn from the same generator, so they are distinct from each other and
    /// from every earlier call.
    pub fn create_empty_block(&self, block_type: BlockType, ids: &dyn IdGenerator) -> Block {
        let id = ids.next_id();
        let data = match block_type {
            BlockType::Tabs => BlockData::Tabs(TabsData {
                tabs: vec![
                    TabItem::new(ids.next_id(), "Tab 1"),
                    TabItem::new(ids.next_id(), "Tab 2"),
                ],
                extra: Map::new(),
            }),
            BlockType::Columns => BlockData::Columns(ColumnsData {
                columns: vec![Column::new(ids.next_id()), Column::new(ids.next_id())],
                extra: Map::new(),
            }),
            BlockType::Grid => BlockData::Grid(GridData::new(self.grid_layout, ids)),
            BlockType::Accordion => BlockData::Accordion(AccordionData {
                items: vec![AccordionItem::new(ids.next_id(), "Section 1")],
                extra: Map::new(),
            }),
            BlockType::Callout => BlockData::Callout(BodyData {
                blocks: Vec::new(),
                extra: settings(json!({"variant": "info"})),
            }),
            BlockType::Toggle => BlockData::Toggle(BodyData {
                blocks: Vec::new(),
                extra: settings(json!({"label": "Toggle"})),
            }),
            leaf => BlockData::Leaf {
                block_type: leaf,
                fields: settings(self.leaf_defaults(leaf)),
            },
        };
        Block::new(id, data)
    }

    /// Same as [`BlockRegistry::create_empty_block`], from a wire tag
    pub fn create_empty_block_named(
        &self,
        tag: &str,
        ids: &dyn IdGenerator,
    ) -> Result<Block, ModelError> {
        let block_type: BlockType = tag.parse()?;
        Ok(self.create_empty_block(block_type, ids))
    }

    fn leaf_defaults(&self, block_type: BlockType) -> Value {
        match block_type {
            BlockType::Text => self.text_mode.empty_payload(),
            BlockType::Image => json!({"url": "", "alt": "", "caption": ""}),
            BlockType::Video => json!({"url": "", "caption": ""}),
            BlockType::File => json!({"url": "", "filename": "", "size": 0, "mimeType": ""}),
            BlockType::Table => json!({
                "headers": ["Column 1", "Column 2"],
                "rows": [["", ""]]
            }),
            BlockType::Divider => json!({"style": "solid"}),
            BlockType::Code => json!({"language": "javascript", "code": ""}),
            BlockType::Quote => json!({"text": "", "author": ""}),
            BlockType::Button => json!({"label": "Click me", "url": "", "variant": "primary"}),
            BlockType::Alert => json!({"variant": "info", "title": "", "message": ""}),
            BlockType::Checklist => json!({"items": []}),
            BlockType::Embed => json!({"url": "", "height": 400}),
            BlockType::Quiz => json!({"questions": []}),
            _ => json!({}),
        }
    }
}

/// Create an empty block with the stock registry defaults
pub fn create_empty_block(block_type: BlockType, ids: &dyn IdGenerator) -> Block {
    BlockRegistry::default().create_empty_block(block_type, ids)
}

fn settings(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod registry_test;
