//! Tree Mutation Engine
//!
//! Pure functions over a block collection: each takes the blocks of one scope
//! (a section, a direct tab, or any container slot) and returns a rewritten
//! copy. The input is never modified.
//!
//! # Traversal
//!
//! Every recursive operation is built on one primitive,
//! [`visit_collections_mut`], which walks a collection and then every child
//! collection of every container below it, depth-first, stopping at the
//! first visitor that reports a result. Operations only decide what to do
//! with the collection that directly holds their target; none of them knows
//! about individual container shapes.
//!
//! # Failure policy
//!
//! The plain functions (`find_and_update`, `insert_child`, `delete_node`,
//! `duplicate_node`, `reorder`) never fail. A missing target, an invalid
//! patch or an out-of-range index gives back the input unchanged and logs at
//! debug level. The `try_*` twins return the reason instead.

use crate::ids::IdGenerator;
use crate::models::{Block, Slot};
use crate::operations::error::TreeOperationError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

type Result<T> = std::result::Result<T, TreeOperationError>;

/// Which child collection of a container receives an inserted block
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "target", content = "slot", rename_all = "camelCase")]
pub enum ChildTarget {
    /// The container's first slot: first tab item, column, cell or accordion
    /// item, or the body of a callout/toggle
    #[default]
    FirstSlot,
    Slot(Slot),
}

/// How duplicating a container treats the ids of its descendants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Deep clone with a fresh id for every nested block and slot
    #[default]
    RegenerateDescendantIds,
    /// Only the duplicated block gets a new id; nested blocks keep theirs
    ShareDescendantIds,
}

/// Walk `blocks` and every nested child collection, pre-order
///
/// Stops at the first collection for which `visit` returns `Some`.
pub(crate) fn visit_collections<'a, R>(
    blocks: &'a [Block],
    visit: &mut dyn FnMut(&'a [Block]) -> Option<R>,
) -> Option<R> {
    if let Some(found) = visit(blocks) {
        return Some(found);
    }
    for block in blocks {
        for (_, children) in block.data.slots() {
            if let Some(found) = visit_collections(children, visit) {
                return Some(found);
            }
        }
    }
    None
}

/// Mutable twin of [`visit_collections`]
///
/// A visitor that returns `None` must leave the collection untouched.
pub(crate) fn visit_collections_mut<R>(
    blocks: &mut Vec<Block>,
    visit: &mut dyn FnMut(&mut Vec<Block>) -> Option<R>,
) -> Option<R> {
    if let Some(found) = visit(blocks) {
        return Some(found);
    }
    for block in blocks.iter_mut() {
        for (_, children) in block.data.slots_mut() {
            if let Some(found) = visit_collections_mut(children, visit) {
                return Some(found);
            }
        }
    }
    None
}

/// Run `apply` on the block with `id`, wherever it is
pub(crate) fn with_block_mut<R>(
    blocks: &mut Vec<Block>,
    id: &str,
    apply: impl FnOnce(&mut Block) -> Result<R>,
) -> Result<R> {
    let mut apply = Some(apply);
    visit_collections_mut(blocks, &mut |collection| {
        let block = collection.iter_mut().find(|b| b.id == id)?;
        let apply = apply.take()?;
        Some(apply(block))
    })
    .unwrap_or_else(|| Err(TreeOperationError::target_not_found(id)))
}

/// Turn a failed operation into "input unchanged"
fn or_unchanged(operation: &str, blocks: &[Block], result: Result<Vec<Block>>) -> Vec<Block> {
    match result {
        Ok(tree) => tree,
        Err(err) => {
            tracing::debug!("{} left blocks unchanged: {}", operation, err);
            blocks.to_vec()
        }
    }
}

pub fn find_block<'a>(blocks: &'a [Block], id: &str) -> Option<&'a Block> {
    visit_collections(blocks, &mut |collection| {
        collection.iter().find(|b| b.id == id)
    })
}

pub fn contains_block(blocks: &[Block], id: &str) -> bool {
    find_block(blocks, id).is_some()
}

// ---------------------------------------------------------------------------
// Update

pub(crate) fn update_in(blocks: &mut Vec<Block>, target_id: &str, patch: &Value) -> Result<()> {
    let patch = patch.as_object().ok_or_else(|| {
        TreeOperationError::invalid_patch(target_id, "patch must be a JSON object")
    })?;
    with_block_mut(blocks, target_id, |block| {
        block
            .merge_data(patch)
            .map_err(|e| TreeOperationError::invalid_patch(target_id, e.to_string()))
    })
}

/// Shallow-merge `patch` into the data of the block with `target_id`
pub fn try_find_and_update(
    blocks: &[Block],
    target_id: &str,
    patch: &Value,
) -> Result<Vec<Block>> {
    let mut tree = blocks.to_vec();
    update_in(&mut tree, target_id, patch)?;
    Ok(tree)
}

/// Shallow-merge `patch` into the target's data at any depth
///
/// Returns the input unchanged when the target does not exist or the patch
/// is not an object.
pub fn find_and_update(blocks: &[Block], target_id: &str, patch: &Value) -> Vec<Block> {
    or_unchanged(
        "find_and_update",
        blocks,
        try_find_and_update(blocks, target_id, patch),
    )
}

pub(crate) fn replace_in(blocks: &mut Vec<Block>, target_id: &str, replacement: Block) -> Result<()> {
    with_block_mut(blocks, target_id, |block| {
        *block = replacement;
        Ok(())
    })
}

/// Swap the whole block with `target_id` for `replacement`
pub fn try_replace_block(
    blocks: &[Block],
    target_id: &str,
    replacement: Block,
) -> Result<Vec<Block>> {
    let mut tree = blocks.to_vec();
    replace_in(&mut tree, target_id, replacement)?;
    Ok(tree)
}

pub(crate) fn set_title_in(
    blocks: &mut Vec<Block>,
    target_id: &str,
    title: Option<String>,
) -> Result<()> {
    with_block_mut(blocks, target_id, |block| {
        block.title = title;
        Ok(())
    })
}

pub fn try_set_title(
    blocks: &[Block],
    target_id: &str,
    title: Option<String>,
) -> Result<Vec<Block>> {
    let mut tree = blocks.to_vec();
    set_title_in(&mut tree, target_id, title)?;
    Ok(tree)
}

// ---------------------------------------------------------------------------
// Insert

/// Resolve a child target against a concrete container
pub(crate) fn resolve_target(container: &Block, target: &ChildTarget) -> Result<Slot> {
    if !container.is_container() {
        return Err(TreeOperationError::not_a_container(
            &container.id,
            container.block_type(),
        ));
    }
    match target {
        ChildTarget::FirstSlot => container.data.first_slot().ok_or_else(|| {
            TreeOperationError::unsupported_slot_operation(&container.id, "container has no slots")
        }),
        ChildTarget::Slot(slot) => {
            if container.data.slot(slot).is_some() {
                Ok(slot.clone())
            } else {
                Err(TreeOperationError::slot_not_found(&container.id, slot.clone()))
            }
        }
    }
}

pub(crate) fn insert_child_in(
    blocks: &mut Vec<Block>,
    container_id: &str,
    new_block: Block,
    target: &ChildTarget,
    index: Option<usize>,
) -> Result<()> {
    with_block_mut(blocks, container_id, |container| {
        let slot = resolve_target(container, target)?;
        let children = container
            .data
            .slot_mut(&slot)
            .ok_or_else(|| TreeOperationError::slot_not_found(container_id, slot.clone()))?;
        match index {
            None => children.push(new_block),
            Some(index) if index <= children.len() => children.insert(index, new_block),
            Some(index) => {
                return Err(TreeOperationError::index_out_of_bounds(index, children.len()))
            }
        }
        Ok(())
    })
}

/// Append `new_block` to a child collection of the container `container_id`
pub fn try_insert_child(
    blocks: &[Block],
    container_id: &str,
    new_block: Block,
    target: &ChildTarget,
) -> Result<Vec<Block>> {
    let mut tree = blocks.to_vec();
    insert_child_in(&mut tree, container_id, new_block, target, None)?;
    Ok(tree)
}

/// Append `new_block` inside the container `container_id`, at any depth
///
/// `ChildTarget::FirstSlot` appends to the container's first slot.
pub fn insert_child(
    blocks: &[Block],
    container_id: &str,
    new_block: Block,
    target: &ChildTarget,
) -> Vec<Block> {
    or_unchanged(
        "insert_child",
        blocks,
        try_insert_child(blocks, container_id, new_block, target),
    )
}

/// Insert `new_block` at `index` within a container slot
pub fn try_insert_child_at(
    blocks: &[Block],
    container_id: &str,
    new_block: Block,
    target: &ChildTarget,
    index: usize,
) -> Result<Vec<Block>> {
    let mut tree = blocks.to_vec();
    insert_child_in(&mut tree, container_id, new_block, target, Some(index))?;
    Ok(tree)
}

pub(crate) fn insert_after_in(blocks: &mut Vec<Block>, anchor_id: &str, new_block: Block) -> Result<()> {
    let mut new_block = Some(new_block);
    visit_collections_mut(blocks, &mut |collection| {
        let index = collection.iter().position(|b| b.id == anchor_id)?;
        collection.insert(index + 1, new_block.take()?);
        Some(())
    })
    .ok_or_else(|| TreeOperationError::target_not_found(anchor_id))
}

/// Insert `new_block` right after `anchor_id`, in the anchor's own collection
pub fn try_insert_after(blocks: &[Block], anchor_id: &str, new_block: Block) -> Result<Vec<Block>> {
    let mut tree = blocks.to_vec();
    insert_after_in(&mut tree, anchor_id, new_block)?;
    Ok(tree)
}

pub fn insert_after(blocks: &[Block], anchor_id: &str, new_block: Block) -> Vec<Block> {
    or_unchanged(
        "insert_after",
        blocks,
        try_insert_after(blocks, anchor_id, new_block),
    )
}

/// Insert into a flat collection at `index` (`index == len` appends)
pub fn try_insert_at(blocks: &[Block], index: usize, new_block: Block) -> Result<Vec<Block>> {
    if index > blocks.len() {
        return Err(TreeOperationError::index_out_of_bounds(index, blocks.len()));
    }
    let mut tree = blocks.to_vec();
    tree.insert(index, new_block);
    Ok(tree)
}

// ---------------------------------------------------------------------------
// Delete

/// Remove the block with `target_id` and hand it back
pub(crate) fn remove_in(blocks: &mut Vec<Block>, target_id: &str) -> Result<Block> {
    visit_collections_mut(blocks, &mut |collection| {
        let index = collection.iter().position(|b| b.id == target_id)?;
        Some(collection.remove(index))
    })
    .ok_or_else(|| TreeOperationError::target_not_found(target_id))
}

pub fn try_delete_node(blocks: &[Block], target_id: &str) -> Result<Vec<Block>> {
    let mut tree = blocks.to_vec();
    remove_in(&mut tree, target_id)?;
    Ok(tree)
}

/// Remove the target, with all its descendants, from whichever collection
/// holds it
pub fn delete_node(blocks: &[Block], target_id: &str) -> Vec<Block> {
    or_unchanged("delete_node", blocks, try_delete_node(blocks, target_id))
}

// ---------------------------------------------------------------------------
// Duplicate

/// Copy of `block` with a fresh id, following `policy` for descendants
pub fn duplicate_block(block: &Block, ids: &dyn IdGenerator, policy: DuplicatePolicy) -> Block {
    let mut copy = block.clone();
    match policy {
        DuplicatePolicy::RegenerateDescendantIds => regenerate_ids(&mut copy, ids),
        DuplicatePolicy::ShareDescendantIds => copy.id = ids.next_id(),
    }
    copy
}

pub(crate) fn duplicate_in(
    blocks: &mut Vec<Block>,
    target_id: &str,
    ids: &dyn IdGenerator,
    policy: DuplicatePolicy,
) -> Result<String> {
    visit_collections_mut(blocks, &mut |collection| {
        let index = collection.iter().position(|b| b.id == target_id)?;
        let copy = duplicate_block(&collection[index], ids, policy);
        let new_id = copy.id.clone();
        collection.insert(index + 1, copy);
        Some(new_id)
    })
    .ok_or_else(|| TreeOperationError::target_not_found(target_id))
}

/// Clone the target right after itself; returns the new tree and the copy's id
pub fn try_duplicate_node(
    blocks: &[Block],
    target_id: &str,
    ids: &dyn IdGenerator,
    policy: DuplicatePolicy,
) -> Result<(Vec<Block>, String)> {
    let mut tree = blocks.to_vec();
    let new_id = duplicate_in(&mut tree, target_id, ids, policy)?;
    Ok((tree, new_id))
}

/// Clone the target into the slot right after it, in the same collection
///
/// The second value is the id of the copy, or `None` when nothing was
/// duplicated.
pub fn duplicate_node(
    blocks: &[Block],
    target_id: &str,
    ids: &dyn IdGenerator,
    policy: DuplicatePolicy,
) -> (Vec<Block>, Option<String>) {
    match try_duplicate_node(blocks, target_id, ids, policy) {
        Ok((tree, new_id)) => (tree, Some(new_id)),
        Err(err) => {
            tracing::debug!("duplicate_node left blocks unchanged: {}", err);
            (blocks.to_vec(), None)
        }
    }
}

// ---------------------------------------------------------------------------
// Reorder

/// Move `items[from]` to position `to`
pub(crate) fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<()> {
    let len = items.len();
    if from >= len {
        return Err(TreeOperationError::index_out_of_bounds(from, len));
    }
    if to >= len {
        return Err(TreeOperationError::index_out_of_bounds(to, len));
    }
    let item = items.remove(from);
    items.insert(to, item);
    Ok(())
}

pub fn try_reorder(blocks: &[Block], from: usize, to: usize) -> Result<Vec<Block>> {
    let mut tree = blocks.to_vec();
    move_item(&mut tree, from, to)?;
    Ok(tree)
}

/// Move the block at `from` to `to` within this one flat collection
pub fn reorder(blocks: &[Block], from: usize, to: usize) -> Vec<Block> {
    or_unchanged("reorder", blocks, try_reorder(blocks, from, to))
}

pub(crate) fn reorder_within_in(
    blocks: &mut Vec<Block>,
    container_id: &str,
    slot: &Slot,
    from: usize,
    to: usize,
) -> Result<()> {
    with_block_mut(blocks, container_id, |container| {
        if !container.is_container() {
            return Err(TreeOperationError::not_a_container(
                container_id,
                container.block_type(),
            ));
        }
        let children = container
            .data
            .slot_mut(slot)
            .ok_or_else(|| TreeOperationError::slot_not_found(container_id, slot.clone()))?;
        move_item(children, from, to)
    })
}

/// Reorder inside one slot of a nested container
pub fn try_reorder_within(
    blocks: &[Block],
    container_id: &str,
    slot: &Slot,
    from: usize,
    to: usize,
) -> Result<Vec<Block>> {
    let mut tree = blocks.to_vec();
    reorder_within_in(&mut tree, container_id, slot, from, to)?;
    Ok(tree)
}

pub fn reorder_within(
    blocks: &[Block],
    container_id: &str,
    slot: &Slot,
    from: usize,
    to: usize,
) -> Vec<Block> {
    or_unchanged(
        "reorder_within",
        blocks,
        try_reorder_within(blocks, container_id, slot, from, to),
    )
}

// ---------------------------------------------------------------------------
// Id hygiene

/// Ids of every block in the tree, collection by collection; slot ids are
/// not included
pub fn collect_ids(blocks: &[Block]) -> Vec<String> {
    let mut ids = Vec::new();
    let _: Option<()> = visit_collections(blocks, &mut |collection| {
        ids.extend(collection.iter().map(|b| b.id.clone()));
        None
    });
    ids
}

/// Ids that appear more than once in the tree, sorted
pub fn duplicate_ids(blocks: &[Block]) -> Vec<String> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for id in collect_ids(blocks) {
        *counts.entry(id).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(id, _)| id)
        .collect()
}

/// Give `block`, its slots and every descendant a fresh id
pub fn regenerate_ids(block: &mut Block, ids: &dyn IdGenerator) {
    block.id = ids.next_id();
    block.data.regenerate_slot_ids(ids);
    for (_, children) in block.data.slots_mut() {
        for child in children.iter_mut() {
            regenerate_ids(child, ids);
        }
    }
}
