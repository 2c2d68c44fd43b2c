//! Selection and insertion state
//!
//! UI-facing state that lives next to the document but is never saved:
//!
//! - the active (inline-editing) block, one per scope
//! - the pending insertion target of the block picker
//! - per-container view state (open tab/accordion item, expanded toggles)
//!
//! Activating a block replaces whatever was active in the same scope.

use crate::models::{Block, Resource, Scope, Slot};
use crate::operations::collect_ids;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Where the block picker's choice will be inserted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertionTarget {
    pub scope: Scope,
    /// Nested container to insert into; `None` appends to the scope itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    /// Slot of that container; `None` means its first slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<Slot>,
}

impl InsertionTarget {
    pub fn scope(scope: Scope) -> Self {
        Self {
            scope,
            container_id: None,
            slot: None,
        }
    }

    pub fn container(scope: Scope, container_id: impl Into<String>, slot: Option<Slot>) -> Self {
        Self {
            scope,
            container_id: Some(container_id.into()),
            slot,
        }
    }
}

/// Open/closed state local to each container block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerUiState {
    open_slots: BTreeMap<String, Slot>,
    expanded: BTreeSet<String>,
}

impl ContainerUiState {
    /// Open one tab item / accordion item of a container
    pub fn open_slot(&mut self, container_id: impl Into<String>, slot: Slot) {
        self.open_slots.insert(container_id.into(), slot);
    }

    pub fn close_slot(&mut self, container_id: &str) -> Option<Slot> {
        self.open_slots.remove(container_id)
    }

    pub fn open_slot_of(&self, container_id: &str) -> Option<&Slot> {
        self.open_slots.get(container_id)
    }

    /// Flip a toggle block; returns the new expanded state
    pub fn toggle_expanded(&mut self, container_id: &str) -> bool {
        if self.expanded.remove(container_id) {
            false
        } else {
            self.expanded.insert(container_id.to_string());
            true
        }
    }

    pub fn is_expanded(&self, container_id: &str) -> bool {
        self.expanded.contains(container_id)
    }

    fn retain(&mut self, live: &LiveBlocks) {
        self.open_slots.retain(|id, slot| live.has_slot(id, slot));
        self.expanded.retain(|id| live.ids.contains(id));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    active: BTreeMap<Scope, String>,
    pending: Option<InsertionTarget>,
    pub containers: ContainerUiState,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `block_id` the active block of `scope`
    ///
    /// Returns the previously active block of that scope, if it differs.
    pub fn activate(&mut self, scope: Scope, block_id: impl Into<String>) -> Option<String> {
        let block_id = block_id.into();
        match self.active.insert(scope, block_id.clone()) {
            Some(previous) if previous != block_id => Some(previous),
            _ => None,
        }
    }

    pub fn deactivate(&mut self, scope: &Scope) -> Option<String> {
        self.active.remove(scope)
    }

    pub fn active_in(&self, scope: &Scope) -> Option<&str> {
        self.active.get(scope).map(String::as_str)
    }

    pub fn is_active(&self, scope: &Scope, block_id: &str) -> bool {
        self.active_in(scope) == Some(block_id)
    }

    pub fn begin_insertion(&mut self, target: InsertionTarget) {
        self.pending = Some(target);
    }

    pub fn pending_insertion(&self) -> Option<&InsertionTarget> {
        self.pending.as_ref()
    }

    /// Consume the pending target
    pub fn take_insertion(&mut self) -> Option<InsertionTarget> {
        self.pending.take()
    }

    /// Discard the pending target; returns whether one was pending
    pub fn cancel_insertion(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Drop state that refers to blocks, slots or scopes no longer in
    /// `resource`
    pub fn retain_blocks(&mut self, resource: &Resource) {
        let mut live_scopes = HashSet::new();
        let mut live = LiveBlocks::default();
        for (scope, blocks) in resource.collections() {
            live.collect(blocks);
            live_scopes.insert(scope);
        }

        self.active.retain(|scope, id| {
            resource
                .blocks_in(scope)
                .is_some_and(|blocks| collect_ids(blocks).contains(id))
        });

        let pending_is_stale = self.pending.as_ref().is_some_and(|target| {
            if !live_scopes.contains(&target.scope) {
                return true;
            }
            match (&target.container_id, &target.slot) {
                (Some(id), Some(slot)) => !live.has_slot(id, slot),
                (Some(id), None) => !live.ids.contains(id),
                (None, _) => false,
            }
        });
        if pending_is_stale {
            self.pending = None;
        }

        self.containers.retain(&live);
    }
}

/// Ids of every block in a document, and the slots of each container
#[derive(Debug, Default)]
struct LiveBlocks {
    ids: HashSet<String>,
    slots: HashMap<String, Vec<Slot>>,
}

impl LiveBlocks {
    fn collect(&mut self, blocks: &[Block]) {
        for block in blocks {
            self.ids.insert(block.id.clone());
            let slots = block.data.slots();
            if slots.is_empty() {
                continue;
            }
            self.slots.insert(
                block.id.clone(),
                slots.iter().map(|(slot, _)| slot.clone()).collect(),
            );
            for (_, children) in slots {
                self.collect(children);
            }
        }
    }

    fn has_slot(&self, container_id: &str, slot: &Slot) -> bool {
        self.slots
            .get(container_id)
            .is_some_and(|slots| slots.contains(slot))
    }
}
