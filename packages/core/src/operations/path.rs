//! Path-addressed dispatch
//!
//! A [`BlockPath`] is the address of one block: the index in the root
//! collection, then for each level below a `(slot, index)` step into the
//! child collection of the block reached so far.
//!
//! [`apply_at`] walks that address one level per call, so each level only
//! rewrites its own child collection and hands the rest of the path down.
//! The host applies the result to its root and re-renders from the new tree;
//! there is no chain of per-level callbacks.
//!
//! ```rust
//! use resource_builder_core::ids::SequentialIdGenerator;
//! use resource_builder_core::models::{Block, BlockType, Slot};
//! use resource_builder_core::operations::{apply_at, locate, BlockOp};
//! use serde_json::json;
//!
//! let blocks: Vec<Block> = serde_json::from_value(json!([
//!     { "id": "cols", "type": "columns", "data": { "columns": [
//!         { "id": "c1", "blocks": [
//!             { "id": "t", "type": "text", "data": { "markdown": "" } } ] } ] } }
//! ]))
//! .unwrap();
//!
//! let path = locate(&blocks, "t").unwrap();
//! assert_eq!(path.to_string(), "0/column:c1/0");
//!
//! let ids = SequentialIdGenerator::new("n");
//! let applied = apply_at(&blocks, &path, BlockOp::Update(json!({"markdown": "hi"})), &ids).unwrap();
//! assert_eq!(applied.blocks[0].data.slot(&Slot::Column("c1".into())).unwrap()[0]
//!     .data.field("markdown"), Some(&json!("hi")));
//! ```

use crate::ids::IdGenerator;
use crate::models::{Block, Scope, Slot};
use crate::operations::error::TreeOperationError;
use crate::operations::tree::{
    duplicate_block, move_item, resolve_target, ChildTarget, DuplicatePolicy,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

type Result<T> = std::result::Result<T, TreeOperationError>;

/// Which collection a path step indexes into
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "slot", rename_all = "camelCase")]
pub enum Collection {
    /// The top-level collection the path is resolved against
    Root,
    /// A child collection of the block reached by the previous step
    Child(Slot),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathStep {
    pub collection: Collection,
    pub index: usize,
}

/// Address of a block, from the root collection down
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockPath {
    steps: Vec<PathStep>,
}

impl BlockPath {
    pub fn root(index: usize) -> Self {
        Self {
            steps: vec![PathStep {
                collection: Collection::Root,
                index,
            }],
        }
    }

    /// Address of the `index`th block in `slot` of the block at this path
    pub fn child(&self, slot: Slot, index: usize) -> Self {
        let mut steps = self.steps.clone();
        steps.push(PathStep {
            collection: Collection::Child(slot),
            index,
        });
        Self { steps }
    }

    /// Address of the enclosing container; `None` at the root level
    pub fn parent(&self) -> Option<Self> {
        if self.steps.len() <= 1 {
            return None;
        }
        Some(Self {
            steps: self.steps[..self.steps.len() - 1].to_vec(),
        })
    }

    /// Nesting depth; root-level blocks are at depth 0
    pub fn depth(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Index within the block's own collection
    pub fn index(&self) -> usize {
        self.steps.last().map(|s| s.index).unwrap_or_default()
    }

    /// Slot holding the block, `None` for root-level blocks
    pub fn slot(&self) -> Option<&Slot> {
        match self.steps.last().map(|s| &s.collection) {
            Some(Collection::Child(slot)) => Some(slot),
            _ => None,
        }
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    fn validate(&self) -> Result<()> {
        match self.steps.split_first() {
            None => Err(TreeOperationError::invalid_path("path is empty")),
            Some((first, _)) if first.collection != Collection::Root => Err(
                TreeOperationError::invalid_path("first step must index the root collection"),
            ),
            Some((_, rest)) if rest.iter().any(|s| s.collection == Collection::Root) => Err(
                TreeOperationError::invalid_path("only the first step may index the root"),
            ),
            Some(_) => Ok(()),
        }
    }
}

impl fmt::Display for BlockPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, step) in self.steps.iter().enumerate() {
            if n > 0 {
                f.write_str("/")?;
            }
            if let Collection::Child(slot) = &step.collection {
                write!(f, "{}/", slot)?;
            }
            write!(f, "{}", step.index)?;
        }
        Ok(())
    }
}

/// A block address within a whole resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockAddress {
    pub scope: Scope,
    pub path: BlockPath,
}

/// Operation applied to the block at a path
#[derive(Debug, Clone, PartialEq)]
pub enum BlockOp {
    /// Shallow-merge a JSON object into the block's data
    Update(Value),
    Replace(Block),
    SetTitle(Option<String>),
    Delete,
    Duplicate { policy: DuplicatePolicy },
    /// Move within the block's own collection
    Move { to: usize },
    /// Append a block inside this (container) block
    InsertChild { block: Block, target: ChildTarget },
    /// Insert a sibling right after this block
    InsertAfter(Block),
}

impl BlockOp {
    pub fn name(&self) -> &'static str {
        match self {
            BlockOp::Update(_) => "update",
            BlockOp::Replace(_) => "replace",
            BlockOp::SetTitle(_) => "set_title",
            BlockOp::Delete => "delete",
            BlockOp::Duplicate { .. } => "duplicate",
            BlockOp::Move { .. } => "move",
            BlockOp::InsertChild { .. } => "insert_child",
            BlockOp::InsertAfter(_) => "insert_after",
        }
    }
}

/// Result of [`apply_at`]
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub blocks: Vec<Block>,
    /// Id of the block the operation created (duplicate, inserts)
    pub created: Option<String>,
}

/// Find the address of the block with `id`
pub fn locate(blocks: &[Block], id: &str) -> Option<BlockPath> {
    fn search(
        blocks: &[Block],
        id: &str,
        collection: &Collection,
        trail: &mut Vec<PathStep>,
    ) -> bool {
        for (index, block) in blocks.iter().enumerate() {
            trail.push(PathStep {
                collection: collection.clone(),
                index,
            });
            if block.id == id {
                return true;
            }
            for (slot, children) in block.data.slots() {
                if search(children, id, &Collection::Child(slot), trail) {
                    return true;
                }
            }
            trail.pop();
        }
        false
    }

    let mut trail = Vec::new();
    if search(blocks, id, &Collection::Root, &mut trail) {
        Some(BlockPath { steps: trail })
    } else {
        None
    }
}

/// Resolve a path to the block it addresses
pub fn block_at<'a>(blocks: &'a [Block], path: &BlockPath) -> Option<&'a Block> {
    let mut current: Option<&'a Block> = None;
    for step in &path.steps {
        let collection: &'a [Block] = match (&step.collection, current) {
            (Collection::Root, None) => blocks,
            (Collection::Child(slot), Some(block)) => block.data.slot(slot)?,
            _ => return None,
        };
        current = Some(collection.get(step.index)?);
    }
    current
}

/// Apply `op` to the block at `path`, returning the rewritten tree
pub fn apply_at(
    blocks: &[Block],
    path: &BlockPath,
    op: BlockOp,
    ids: &dyn IdGenerator,
) -> Result<Applied> {
    path.validate()?;
    let mut tree = blocks.to_vec();
    let created = apply_in(&mut tree, &path.steps, op, ids)?;
    Ok(Applied {
        blocks: tree,
        created,
    })
}

/// Descend one level, or apply the operation when this is the last step
fn apply_in(
    collection: &mut Vec<Block>,
    steps: &[PathStep],
    op: BlockOp,
    ids: &dyn IdGenerator,
) -> Result<Option<String>> {
    let (step, rest) = steps
        .split_first()
        .ok_or_else(|| TreeOperationError::invalid_path("path is empty"))?;

    let len = collection.len();
    if step.index >= len {
        return Err(TreeOperationError::index_out_of_bounds(step.index, len));
    }

    let Some(next) = rest.first() else {
        return apply_here(collection, step.index, op, ids);
    };
    let Collection::Child(slot) = &next.collection else {
        return Err(TreeOperationError::invalid_path(
            "only the first step may index the root",
        ));
    };

    let Block { id, data, .. } = &mut collection[step.index];
    let children = data
        .slot_mut(slot)
        .ok_or_else(|| TreeOperationError::slot_not_found(id.as_str(), slot.clone()))?;
    apply_in(children, rest, op, ids)
}

fn apply_here(
    collection: &mut Vec<Block>,
    index: usize,
    op: BlockOp,
    ids: &dyn IdGenerator,
) -> Result<Option<String>> {
    match op {
        BlockOp::Update(patch) => {
            let block = &mut collection[index];
            let patch = patch.as_object().ok_or_else(|| {
                TreeOperationError::invalid_patch(&block.id, "patch must be a JSON object")
            })?;
            block
                .merge_data(patch)
                .map_err(|e| TreeOperationError::invalid_patch(&block.id, e.to_string()))?;
            Ok(None)
        }
        BlockOp::Replace(replacement) => {
            collection[index] = replacement;
            Ok(None)
        }
        BlockOp::SetTitle(title) => {
            collection[index].title = title;
            Ok(None)
        }
        BlockOp::Delete => {
            collection.remove(index);
            Ok(None)
        }
        BlockOp::Duplicate { policy } => {
            let copy = duplicate_block(&collection[index], ids, policy);
            let new_id = copy.id.clone();
            collection.insert(index + 1, copy);
            Ok(Some(new_id))
        }
        BlockOp::Move { to } => {
            move_item(collection, index, to)?;
            Ok(None)
        }
        BlockOp::InsertChild { block, target } => {
            let container = &mut collection[index];
            let slot = resolve_target(container, &target)?;
            let new_id = block.id.clone();
            let container_id = container.id.clone();
            container
                .data
                .slot_mut(&slot)
                .ok_or_else(|| TreeOperationError::slot_not_found(container_id, slot.clone()))?
                .push(block);
            Ok(Some(new_id))
        }
        BlockOp::InsertAfter(block) => {
            let new_id = block.id.clone();
            collection.insert(index + 1, block);
            Ok(Some(new_id))
        }
    }
}
