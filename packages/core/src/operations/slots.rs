//! Container slot operations
//!
//! Slots are the child collections of a container: tab items, columns, grid
//! cells, accordion items and the single body of callouts and toggles. These
//! functions add, remove, rename, resize and reorder slots, enforcing each
//! container's minimum slot count.
//!
//! | Container   | Add | Remove (floor) | Rename | Reorder |
//! |-------------|-----|----------------|--------|---------|
//! | `tabs`      | yes | yes (1)        | label  | yes     |
//! | `columns`   | yes | yes (1)        | -      | yes     |
//! | `accordion` | yes | yes (1)        | title  | yes     |
//! | `grid`      | -   | -              | -      | -       |
//! | `callout`   | -   | -              | -      | -       |
//! | `toggle`    | -   | -              | -      | -       |
//!
//! Grid cells only change through [`try_set_grid_layout`].

use crate::ids::IdGenerator;
use crate::models::{AccordionItem, Block, BlockData, Column, GridLayout, Slot, TabItem};
use crate::operations::error::TreeOperationError;
use crate::operations::tree::{move_item, with_block_mut};

type Result<T> = std::result::Result<T, TreeOperationError>;

/// Minimum slot count of containers that allow removal
pub const MIN_SLOTS: usize = 1;

/// Run `apply` on the payload of the container `container_id`
fn with_container_mut<R>(
    blocks: &[Block],
    container_id: &str,
    apply: impl FnOnce(&mut BlockData) -> Result<R>,
) -> Result<(Vec<Block>, R)> {
    let mut tree = blocks.to_vec();
    let outcome = with_block_mut(&mut tree, container_id, |block| {
        if !block.is_container() {
            return Err(TreeOperationError::not_a_container(
                container_id,
                block.block_type(),
            ));
        }
        apply(&mut block.data)
    })?;
    Ok((tree, outcome))
}

fn position_of(
    container_id: &str,
    slot: &Slot,
    found: Option<usize>,
) -> Result<usize> {
    found.ok_or_else(|| TreeOperationError::slot_not_found(container_id, slot.clone()))
}

fn fixed_slots(container_id: &str, data: &BlockData) -> TreeOperationError {
    let reason = match data {
        BlockData::Grid(_) => "grid cells follow the grid layout",
        _ => "container has a single fixed body",
    };
    TreeOperationError::unsupported_slot_operation(container_id, reason)
}

/// Append a new slot to a tabs, columns or accordion container
///
/// `label` names new tab items and accordion items; it defaults to
/// "Tab N" / "Section N". Returns the new tree and the new slot.
pub fn try_add_slot(
    blocks: &[Block],
    container_id: &str,
    label: Option<&str>,
    ids: &dyn IdGenerator,
) -> Result<(Vec<Block>, Slot)> {
    with_container_mut(blocks, container_id, |data| match data {
        BlockData::Tabs(d) => {
            let label = label
                .map(str::to_string)
                .unwrap_or_else(|| format!("Tab {}", d.tabs.len() + 1));
            let item = TabItem::new(ids.next_id(), label);
            let slot = Slot::Tab(item.id.clone());
            d.tabs.push(item);
            Ok(slot)
        }
        BlockData::Columns(d) => {
            let column = Column::new(ids.next_id());
            let slot = Slot::Column(column.id.clone());
            d.columns.push(column);
            Ok(slot)
        }
        BlockData::Accordion(d) => {
            let label = label
                .map(str::to_string)
                .unwrap_or_else(|| format!("Section {}", d.items.len() + 1));
            let item = AccordionItem::new(ids.next_id(), label);
            let slot = Slot::Item(item.id.clone());
            d.items.push(item);
            Ok(slot)
        }
        other => Err(fixed_slots(container_id, other)),
    })
}

/// Remove a slot, and every block inside it
///
/// Rejected with `StructuralFloor` when the slot is the container's last one.
pub fn try_remove_slot(blocks: &[Block], container_id: &str, slot: &Slot) -> Result<Vec<Block>> {
    fn remove_checked<T>(
        items: &mut Vec<T>,
        index: Option<usize>,
        container_id: &str,
        slot: &Slot,
    ) -> Result<()> {
        let index = position_of(container_id, slot, index)?;
        if items.len() <= MIN_SLOTS {
            return Err(TreeOperationError::structural_floor(
                container_id,
                slot.kind_name(),
                MIN_SLOTS,
            ));
        }
        items.remove(index);
        Ok(())
    }

    let (tree, ()) = with_container_mut(blocks, container_id, |data| match data {
        BlockData::Tabs(d) => {
            let index = match slot {
                Slot::Tab(id) => d.tabs.iter().position(|t| &t.id == id),
                _ => None,
            };
            remove_checked(&mut d.tabs, index, container_id, slot)
        }
        BlockData::Columns(d) => {
            let index = match slot {
                Slot::Column(id) => d.columns.iter().position(|c| &c.id == id),
                _ => None,
            };
            remove_checked(&mut d.columns, index, container_id, slot)
        }
        BlockData::Accordion(d) => {
            let index = match slot {
                Slot::Item(id) => d.items.iter().position(|i| &i.id == id),
                _ => None,
            };
            remove_checked(&mut d.items, index, container_id, slot)
        }
        other => Err(fixed_slots(container_id, other)),
    })?;
    Ok(tree)
}

/// Remove a slot; the input is returned unchanged when removal is not allowed
pub fn remove_slot(blocks: &[Block], container_id: &str, slot: &Slot) -> Vec<Block> {
    match try_remove_slot(blocks, container_id, slot) {
        Ok(tree) => tree,
        Err(err) => {
            tracing::debug!("remove_slot left blocks unchanged: {}", err);
            blocks.to_vec()
        }
    }
}

/// Whether [`try_remove_slot`] would succeed, for disabling the UI action
pub fn can_remove_slot(blocks: &[Block], container_id: &str, slot: &Slot) -> bool {
    try_remove_slot(blocks, container_id, slot).is_ok()
}

/// Rename a tab item (label) or accordion item (title)
pub fn try_rename_slot(
    blocks: &[Block],
    container_id: &str,
    slot: &Slot,
    label: &str,
) -> Result<Vec<Block>> {
    let (tree, ()) = with_container_mut(blocks, container_id, |data| {
        let name = match data {
            BlockData::Tabs(d) => match slot {
                Slot::Tab(id) => d.tabs.iter_mut().find(|t| &t.id == id).map(|t| &mut t.label),
                _ => None,
            },
            BlockData::Accordion(d) => match slot {
                Slot::Item(id) => d.items.iter_mut().find(|i| &i.id == id).map(|i| &mut i.title),
                _ => None,
            },
            _ => {
                return Err(TreeOperationError::unsupported_slot_operation(
                    container_id,
                    format!("{} slots have no label", slot.kind_name()),
                ))
            }
        };
        let name = name
            .ok_or_else(|| TreeOperationError::slot_not_found(container_id, slot.clone()))?;
        *name = label.to_string();
        Ok(())
    })?;
    Ok(tree)
}

/// Set a column's width in percent, or clear it with `None`
pub fn try_set_column_width(
    blocks: &[Block],
    container_id: &str,
    column_id: &str,
    width: Option<f64>,
) -> Result<Vec<Block>> {
    if let Some(w) = width {
        if !(w > 0.0 && w <= 100.0) {
            return Err(TreeOperationError::invalid_patch(
                container_id,
                format!("column width must be in (0, 100], got {}", w),
            ));
        }
    }
    let (tree, ()) = with_container_mut(blocks, container_id, |data| match data {
        BlockData::Columns(d) => {
            let column = d
                .columns
                .iter_mut()
                .find(|c| c.id == column_id)
                .ok_or_else(|| {
                    TreeOperationError::slot_not_found(
                        container_id,
                        Slot::Column(column_id.to_string()),
                    )
                })?;
            column.width = width;
            Ok(())
        }
        _ => Err(TreeOperationError::unsupported_slot_operation(
            container_id,
            "only columns have a width",
        )),
    })?;
    Ok(tree)
}

/// Move the slot at `from` to `to` within its container
pub fn try_reorder_slots(
    blocks: &[Block],
    container_id: &str,
    from: usize,
    to: usize,
) -> Result<Vec<Block>> {
    let (tree, ()) = with_container_mut(blocks, container_id, |data| match data {
        BlockData::Tabs(d) => move_item(&mut d.tabs, from, to),
        BlockData::Columns(d) => move_item(&mut d.columns, from, to),
        BlockData::Accordion(d) => move_item(&mut d.items, from, to),
        other => Err(fixed_slots(container_id, other)),
    })?;
    Ok(tree)
}

/// Reshape a grid container; see [`crate::models::GridData::relayout`]
pub fn try_set_grid_layout(
    blocks: &[Block],
    container_id: &str,
    layout: GridLayout,
    ids: &dyn IdGenerator,
) -> Result<Vec<Block>> {
    let (tree, ()) = with_container_mut(blocks, container_id, |data| match data {
        BlockData::Grid(d) => {
            d.relayout(layout, ids);
            Ok(())
        }
        _ => Err(TreeOperationError::unsupported_slot_operation(
            container_id,
            "only grids have a layout",
        )),
    })?;
    Ok(tree)
}
