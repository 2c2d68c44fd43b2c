//! Tree Operations
//!
//! The block tree mutation engine:
//!
//! - [`tree`] - update, insert, delete, duplicate and reorder at any depth
//! - [`slots`] - add, remove, rename and reorder container slots
//! - [`path`] - path-addressed dispatch (`locate`, `block_at`, `apply_at`)
//! - [`error`] - `TreeOperationError`
//!
//! All functions take a block collection by reference and return a new one.

pub mod error;
pub mod path;
pub mod slots;
pub mod tree;

pub use error::TreeOperationError;
pub use path::{
    apply_at, block_at, locate, Applied, BlockAddress, BlockOp, BlockPath, Collection, PathStep,
};
pub use slots::{
    can_remove_slot, remove_slot, try_add_slot, try_remove_slot, try_rename_slot,
    try_reorder_slots, try_set_column_width, try_set_grid_layout, MIN_SLOTS,
};
pub use tree::{
    collect_ids, contains_block, delete_node, duplicate_block, duplicate_ids, duplicate_node,
    find_and_update, find_block, insert_after, insert_child, regenerate_ids, reorder,
    reorder_within, try_delete_node, try_duplicate_node, try_find_and_update, try_insert_after,
    try_insert_at, try_insert_child, try_insert_child_at, try_reorder, try_reorder_within,
    try_replace_block, try_set_title, ChildTarget, DuplicatePolicy,
};

#[cfg(test)]
mod tree_test;
