//! Resource Editor
//!
//! `ResourceEditor` owns the document and is the only thing that replaces
//! it. Every operation follows the same shape:
//!
//! 1. resolve the scope (tab, or tab + section) to its block collection
//! 2. run a pure tree operation from [`crate::operations`] on that collection
//! 3. swap the rewritten collection in
//! 4. prune stale selection state, call the save handler, broadcast one event
//!
//! If any step before 3 fails, the method returns the error and the document,
//! the save handler and subscribers see nothing.

use crate::config::EditorConfig;
use crate::ids::IdGenerator;
use crate::models::{
    Block, BlockType, GridLayout, ModelError, Resource, ResourceMetadata, Scope, Section, Slot,
    Tab, TabMode, TextBlock, TextBlockError, TextMode,
};
use crate::operations::tree::move_item;
use crate::operations::{self, BlockAddress, BlockOp, ChildTarget, TreeOperationError};
use crate::registry::BlockRegistry;
use crate::services::error::EditorError;
use crate::services::events::EditorEvent;
use crate::services::persistence::SaveHandler;
use crate::services::selection::SelectionState;
use crate::services::upload::{UploadRequest, UploadService, UploadedFile};
use crate::utils::TextConverter;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::broadcast;

/// A resource always keeps at least this many tabs
pub const MIN_TABS: usize = 1;

/// Partial update of a section's own fields
///
/// `None` leaves a field alone. For `description`, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub collapsed: Option<bool>,
    pub collapsible: Option<bool>,
}

impl SectionUpdate {
    fn apply(self, section: &mut Section) {
        if let Some(title) = self.title {
            section.title = title;
        }
        if let Some(description) = self.description {
            section.description = description;
        }
        if let Some(collapsible) = self.collapsible {
            section.collapsible = collapsible;
        }
        if let Some(collapsed) = self.collapsed {
            section.collapsed = collapsed;
        }
        // a section that cannot collapse is always open
        if !section.collapsible {
            section.collapsed = false;
        }
    }
}

/// Host state container for one resource document
pub struct ResourceEditor {
    resource: Resource,
    config: EditorConfig,
    ids: Arc<dyn IdGenerator>,
    registry: BlockRegistry,
    selection: SelectionState,
    save_handler: Option<Arc<dyn SaveHandler>>,

    /// Broadcast channel for editor events
    event_tx: broadcast::Sender<EditorEvent>,
}

impl ResourceEditor {
    /// Open a resource with the default config
    pub fn new(resource: Resource) -> Self {
        Self::build(resource, EditorConfig::default())
    }

    pub fn with_config(resource: Resource, config: EditorConfig) -> Result<Self, EditorError> {
        config.validate().map_err(EditorError::InvalidConfig)?;
        Ok(Self::build(resource, config))
    }

    /// Decode a stored resource and open it
    pub fn from_json(json: &str, config: EditorConfig) -> Result<Self, EditorError> {
        let resource: Resource = serde_json::from_str(json)?;
        Self::with_config(resource, config)
    }

    fn build(mut resource: Resource, config: EditorConfig) -> Self {
        let ids = config.id_strategy.build();
        resource.normalize(ids.as_ref());
        let (event_tx, _) = broadcast::channel(config.event_channel_capacity);

        Self {
            resource,
            registry: config.registry(),
            config,
            ids,
            selection: SelectionState::new(),
            save_handler: None,
            event_tx,
        }
    }

    /// Replace the id generator the config selected
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Register the persistence collaborator, called after every change
    pub fn with_save_handler(mut self, handler: Arc<dyn SaveHandler>) -> Self {
        self.save_handler = Some(handler);
        self
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn into_resource(self) -> Resource {
        self.resource
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string(&self.resource)?)
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionState {
        &mut self.selection
    }

    /// Subscribe to editor events
    ///
    /// Receivers only see events sent after they subscribed.
    pub fn subscribe_to_events(&self) -> broadcast::Receiver<EditorEvent> {
        self.event_tx.subscribe()
    }

    /// Ignores send errors: having no subscribers is normal
    fn emit_event(&self, event: EditorEvent) {
        let _ = self.event_tx.send(event);
    }

    fn commit(&mut self, event: EditorEvent) {
        self.selection.retain_blocks(&self.resource);
        if let Some(handler) = &self.save_handler {
            handler.on_save(&self.resource);
        }
        tracing::debug!(
            "Resource {} applied {}",
            self.resource.id,
            event.event_type()
        );
        self.emit_event(event);
    }

    // -----------------------------------------------------------------------
    // Scopes and lookups

    /// Block collection of a scope
    ///
    /// Direct tabs are addressed without a section, sectioned tabs only with
    /// one.
    pub fn blocks_in(&self, scope: &Scope) -> Result<&Vec<Block>, EditorError> {
        let tab = self
            .resource
            .tab(&scope.tab_id)
            .ok_or_else(|| EditorError::tab_not_found(&scope.tab_id))?;
        match (tab.mode(), scope.section_id.as_deref()) {
            (TabMode::Direct, None) | (TabMode::Sectioned, Some(_)) => {}
            (mode, _) => return Err(EditorError::scope_mode_mismatch(&tab.id, mode)),
        }
        tab.blocks_in(scope.section_id.as_deref()).ok_or_else(|| {
            EditorError::section_not_found(
                &scope.tab_id,
                scope.section_id.clone().unwrap_or_default(),
            )
        })
    }

    /// Run a pure operation on one scope and swap its result in
    fn edit_scope<R>(
        &mut self,
        scope: &Scope,
        edit: impl FnOnce(&[Block], &dyn IdGenerator) -> Result<(Vec<Block>, R), EditorError>,
    ) -> Result<R, EditorError> {
        let ids = Arc::clone(&self.ids);
        let (blocks, out) = edit(self.blocks_in(scope)?, ids.as_ref())?;
        if let Some(collection) = self.resource.blocks_in_mut(scope) {
            *collection = blocks;
        }
        Ok(out)
    }

    /// Find a block anywhere in the document, with the scope holding it
    pub fn find_block(&self, block_id: &str) -> Option<(Scope, &Block)> {
        self.resource
            .collections()
            .into_iter()
            .find_map(|(scope, blocks)| {
                operations::find_block(blocks, block_id).map(|block| (scope, block))
            })
    }

    /// Full address of a block anywhere in the document
    pub fn locate_block(&self, block_id: &str) -> Option<BlockAddress> {
        self.resource
            .collections()
            .into_iter()
            .find_map(|(scope, blocks)| {
                operations::locate(blocks, block_id).map(|path| BlockAddress { scope, path })
            })
    }

    fn parent_of(blocks: &[Block], block_id: &str) -> Option<String> {
        let parent = operations::locate(blocks, block_id)?.parent()?;
        operations::block_at(blocks, &parent).map(|b| b.id.clone())
    }

    // -----------------------------------------------------------------------
    // Selection

    /// Make a block the active block of its scope
    ///
    /// Returns the block that was active before, if any.
    pub fn activate_block(
        &mut self,
        scope: &Scope,
        block_id: &str,
    ) -> Result<Option<String>, EditorError> {
        if !operations::contains_block(self.blocks_in(scope)?, block_id) {
            return Err(TreeOperationError::target_not_found(block_id).into());
        }
        Ok(self.selection.activate(scope.clone(), block_id))
    }

    /// Insert a new block of `block_type` at the pending insertion target
    ///
    /// The new block becomes active in its scope.
    pub fn insert_pending(&mut self, block_type: BlockType) -> Result<String, EditorError> {
        let target = self
            .selection
            .pending_insertion()
            .cloned()
            .ok_or(EditorError::NoPendingInsertion)?;

        let block_id = match &target.container_id {
            Some(container_id) => {
                let child_target = target.slot.clone().map(ChildTarget::Slot).unwrap_or_default();
                self.add_child_block(&target.scope, container_id, block_type, &child_target)?
            }
            None => self.add_block(&target.scope, block_type)?,
        };

        self.selection.take_insertion();
        self.selection.activate(target.scope, block_id.clone());
        Ok(block_id)
    }

    // -----------------------------------------------------------------------
    // Blocks

    /// Append an empty block of `block_type` to a scope
    pub fn add_block(&mut self, scope: &Scope, block_type: BlockType) -> Result<String, EditorError> {
        let block = self
            .registry
            .create_empty_block(block_type, self.ids.as_ref());
        self.insert_block(scope, block, None)
    }

    /// Insert `block` into a scope at `index`, or append with `None`
    pub fn insert_block(
        &mut self,
        scope: &Scope,
        block: Block,
        index: Option<usize>,
    ) -> Result<String, EditorError> {
        let block_id = block.id.clone();
        self.edit_scope(scope, |blocks, _| {
            let index = index.unwrap_or(blocks.len());
            Ok((operations::try_insert_at(blocks, index, block)?, ()))
        })?;

        self.commit(EditorEvent::BlockAdded {
            scope: scope.clone(),
            block_id: block_id.clone(),
            parent_id: None,
        });
        Ok(block_id)
    }

    /// Add an empty block right below `anchor_id`, in the anchor's collection
    pub fn add_block_after(
        &mut self,
        scope: &Scope,
        anchor_id: &str,
        block_type: BlockType,
    ) -> Result<String, EditorError> {
        let block = self
            .registry
            .create_empty_block(block_type, self.ids.as_ref());
        let block_id = block.id.clone();
        let parent_id = self.edit_scope(scope, |blocks, _| {
            let parent_id = Self::parent_of(blocks, anchor_id);
            Ok((operations::try_insert_after(blocks, anchor_id, block)?, parent_id))
        })?;

        self.commit(EditorEvent::BlockAdded {
            scope: scope.clone(),
            block_id: block_id.clone(),
            parent_id,
        });
        Ok(block_id)
    }

    /// Append an empty block inside a container, at any depth
    pub fn add_child_block(
        &mut self,
        scope: &Scope,
        container_id: &str,
        block_type: BlockType,
        target: &ChildTarget,
    ) -> Result<String, EditorError> {
        let block = self
            .registry
            .create_empty_block(block_type, self.ids.as_ref());
        let block_id = block.id.clone();
        self.edit_scope(scope, |blocks, _| {
            Ok((
                operations::try_insert_child(blocks, container_id, block, target)?,
                (),
            ))
        })?;

        self.commit(EditorEvent::BlockAdded {
            scope: scope.clone(),
            block_id: block_id.clone(),
            parent_id: Some(container_id.to_string()),
        });
        Ok(block_id)
    }

    /// Shallow-merge `patch` into a block's data
    pub fn update_block(
        &mut self,
        scope: &Scope,
        block_id: &str,
        patch: &Value,
    ) -> Result<(), EditorError> {
        self.edit_scope(scope, |blocks, _| {
            Ok((operations::try_find_and_update(blocks, block_id, patch)?, ()))
        })?;
        self.commit(EditorEvent::BlockUpdated {
            scope: scope.clone(),
            block_id: block_id.to_string(),
        });
        Ok(())
    }

    pub fn set_block_title(
        &mut self,
        scope: &Scope,
        block_id: &str,
        title: Option<String>,
    ) -> Result<(), EditorError> {
        self.edit_scope(scope, |blocks, _| {
            Ok((operations::try_set_title(blocks, block_id, title)?, ()))
        })?;
        self.commit(EditorEvent::BlockUpdated {
            scope: scope.clone(),
            block_id: block_id.to_string(),
        });
        Ok(())
    }

    /// Swap a whole block, e.g. to change its type
    pub fn replace_block(
        &mut self,
        scope: &Scope,
        block_id: &str,
        replacement: Block,
    ) -> Result<(), EditorError> {
        let new_id = replacement.id.clone();
        self.edit_scope(scope, |blocks, _| {
            Ok((operations::try_replace_block(blocks, block_id, replacement)?, ()))
        })?;
        self.commit(EditorEvent::BlockUpdated {
            scope: scope.clone(),
            block_id: new_id,
        });
        Ok(())
    }

    pub fn delete_block(&mut self, scope: &Scope, block_id: &str) -> Result<(), EditorError> {
        self.edit_scope(scope, |blocks, _| {
            Ok((operations::try_delete_node(blocks, block_id)?, ()))
        })?;
        self.commit(EditorEvent::BlockDeleted {
            scope: scope.clone(),
            block_id: block_id.to_string(),
        });
        Ok(())
    }

    /// Duplicate a block right after itself; returns the copy's id
    ///
    /// Descendant ids follow the configured [`operations::DuplicatePolicy`].
    pub fn duplicate_block(&mut self, scope: &Scope, block_id: &str) -> Result<String, EditorError> {
        let policy = self.config.duplicate_policy;
        let new_id = self.edit_scope(scope, |blocks, ids| {
            Ok(operations::try_duplicate_node(blocks, block_id, ids, policy)?)
        })?;
        self.commit(EditorEvent::BlockDuplicated {
            scope: scope.clone(),
            source_id: block_id.to_string(),
            block_id: new_id.clone(),
        });
        Ok(new_id)
    }

    /// Reorder the scope's own top-level list
    pub fn reorder_blocks(&mut self, scope: &Scope, from: usize, to: usize) -> Result<(), EditorError> {
        self.edit_scope(scope, |blocks, _| {
            Ok((operations::try_reorder(blocks, from, to)?, ()))
        })?;
        self.commit(EditorEvent::BlocksReordered {
            scope: scope.clone(),
            container_id: None,
        });
        Ok(())
    }

    /// Reorder inside one slot of a nested container
    pub fn reorder_children(
        &mut self,
        scope: &Scope,
        container_id: &str,
        slot: &Slot,
        from: usize,
        to: usize,
    ) -> Result<(), EditorError> {
        self.edit_scope(scope, |blocks, _| {
            Ok((
                operations::try_reorder_within(blocks, container_id, slot, from, to)?,
                (),
            ))
        })?;
        self.commit(EditorEvent::BlocksReordered {
            scope: scope.clone(),
            container_id: Some(container_id.to_string()),
        });
        Ok(())
    }

    /// Apply an operation to the block at a path
    ///
    /// Returns the id of the block the operation created, if any.
    pub fn apply_at(
        &mut self,
        address: &BlockAddress,
        op: BlockOp,
    ) -> Result<Option<String>, EditorError> {
        let scope = &address.scope;
        let (target_id, parent_id) = {
            let blocks = self.blocks_in(scope)?;
            let target = operations::block_at(blocks, &address.path).ok_or_else(|| {
                TreeOperationError::invalid_path(format!("no block at {}", address.path))
            })?;
            let parent_id = address
                .path
                .parent()
                .and_then(|parent| operations::block_at(blocks, &parent))
                .map(|b| b.id.clone());
            (target.id.clone(), parent_id)
        };
        let replaced_id = match &op {
            BlockOp::Replace(block) => Some(block.id.clone()),
            _ => None,
        };
        let op_name = op.name();

        let created = self.edit_scope(scope, |blocks, ids| {
            let applied = operations::apply_at(blocks, &address.path, op, ids)?;
            Ok((applied.blocks, applied.created))
        })?;

        let scope = scope.clone();
        let event = match op_name {
            "delete" => EditorEvent::BlockDeleted {
                scope,
                block_id: target_id,
            },
            "duplicate" => EditorEvent::BlockDuplicated {
                scope,
                source_id: target_id,
                block_id: created.clone().unwrap_or_default(),
            },
            "move" => EditorEvent::BlocksReordered {
                scope,
                container_id: parent_id,
            },
            "insert_child" => EditorEvent::BlockAdded {
                scope,
                block_id: created.clone().unwrap_or_default(),
                parent_id: Some(target_id),
            },
            "insert_after" => EditorEvent::BlockAdded {
                scope,
                block_id: created.clone().unwrap_or_default(),
                parent_id,
            },
            _ => EditorEvent::BlockUpdated {
                scope,
                block_id: replaced_id.unwrap_or(target_id),
            },
        };
        self.commit(event);
        Ok(created)
    }

    // -----------------------------------------------------------------------
    // Container slots

    /// Add a tab item, column or accordion item to a container
    pub fn add_slot(
        &mut self,
        scope: &Scope,
        container_id: &str,
        label: Option<&str>,
    ) -> Result<Slot, EditorError> {
        let slot = self.edit_scope(scope, |blocks, ids| {
            Ok(operations::try_add_slot(blocks, container_id, label, ids)?)
        })?;
        self.commit_slots(scope, container_id);
        Ok(slot)
    }

    /// Remove a slot and its blocks; the last slot cannot be removed
    pub fn remove_slot(
        &mut self,
        scope: &Scope,
        container_id: &str,
        slot: &Slot,
    ) -> Result<(), EditorError> {
        self.edit_scope(scope, |blocks, _| {
            Ok((operations::try_remove_slot(blocks, container_id, slot)?, ()))
        })?;
        self.commit_slots(scope, container_id);
        Ok(())
    }

    /// Whether the remove action for a slot should be enabled
    pub fn can_remove_slot(&self, scope: &Scope, container_id: &str, slot: &Slot) -> bool {
        self.blocks_in(scope)
            .map(|blocks| operations::can_remove_slot(blocks, container_id, slot))
            .unwrap_or(false)
    }

    pub fn rename_slot(
        &mut self,
        scope: &Scope,
        container_id: &str,
        slot: &Slot,
        label: &str,
    ) -> Result<(), EditorError> {
        self.edit_scope(scope, |blocks, _| {
            Ok((
                operations::try_rename_slot(blocks, container_id, slot, label)?,
                (),
            ))
        })?;
        self.commit_slots(scope, container_id);
        Ok(())
    }

    pub fn set_column_width(
        &mut self,
        scope: &Scope,
        container_id: &str,
        column_id: &str,
        width: Option<f64>,
    ) -> Result<(), EditorError> {
        self.edit_scope(scope, |blocks, _| {
            Ok((
                operations::try_set_column_width(blocks, container_id, column_id, width)?,
                (),
            ))
        })?;
        self.commit_slots(scope, container_id);
        Ok(())
    }

    pub fn reorder_slots(
        &mut self,
        scope: &Scope,
        container_id: &str,
        from: usize,
        to: usize,
    ) -> Result<(), EditorError> {
        self.edit_scope(scope, |blocks, _| {
            Ok((
                operations::try_reorder_slots(blocks, container_id, from, to)?,
                (),
            ))
        })?;
        self.commit_slots(scope, container_id);
        Ok(())
    }

    pub fn set_grid_layout(
        &mut self,
        scope: &Scope,
        container_id: &str,
        layout: GridLayout,
    ) -> Result<(), EditorError> {
        self.edit_scope(scope, |blocks, ids| {
            Ok((
                operations::try_set_grid_layout(blocks, container_id, layout, ids)?,
                (),
            ))
        })?;
        self.commit_slots(scope, container_id);
        Ok(())
    }

    fn commit_slots(&mut self, scope: &Scope, container_id: &str) {
        self.commit(EditorEvent::SlotsChanged {
            scope: scope.clone(),
            container_id: container_id.to_string(),
        });
    }

    // -----------------------------------------------------------------------
    // Text and media

    /// Switch a text block's authoring mode, converting its content
    ///
    /// Returns `false` when the block already was in `mode`.
    pub fn set_text_mode(
        &mut self,
        scope: &Scope,
        block_id: &str,
        mode: TextMode,
        converter: &dyn TextConverter,
    ) -> Result<bool, EditorError> {
        let patch = {
            let blocks = self.blocks_in(scope)?;
            let block = operations::find_block(blocks, block_id)
                .ok_or_else(|| TreeOperationError::target_not_found(block_id))?;
            let text = TextBlock::from_block(block).map_err(|err| match err {
                TextBlockError::WrongBlockType { actual } => {
                    EditorError::wrong_block_type(block_id, "text", actual)
                }
                TextBlockError::UnknownMode(_) => {
                    EditorError::from(ModelError::invalid_block_data(BlockType::Text, err.to_string()))
                }
            })?;
            if text.mode() == mode {
                return Ok(false);
            }

            let converted = converter.convert(text.content(), text.mode(), mode);
            let mut patch = Map::new();
            patch.insert("mode".to_string(), Value::from(mode.as_str()));
            patch.insert(mode.content_field().to_string(), Value::String(converted));
            Value::Object(patch)
        };

        self.update_block(scope, block_id, &patch)?;
        tracing::info!("Converted text block {} to {}", block_id, mode);
        Ok(true)
    }

    /// Upload a file and point an image, video or file block at it
    pub async fn upload_into_block(
        &mut self,
        scope: &Scope,
        block_id: &str,
        uploader: &dyn UploadService,
        request: UploadRequest,
    ) -> Result<UploadedFile, EditorError> {
        let block_type = operations::find_block(self.blocks_in(scope)?, block_id)
            .ok_or_else(|| TreeOperationError::target_not_found(block_id))?
            .block_type();
        if !matches!(
            block_type,
            BlockType::Image | BlockType::Video | BlockType::File
        ) {
            return Err(EditorError::wrong_block_type(
                block_id,
                "image, video or file",
                block_type,
            ));
        }

        let uploaded = match uploader.upload(request).await {
            Ok(uploaded) => uploaded,
            Err(err) => {
                tracing::warn!("Upload for block {} failed: {}", block_id, err);
                return Err(err.into());
            }
        };

        let patch = uploaded.to_patch(block_type).ok_or_else(|| {
            EditorError::wrong_block_type(block_id, "image, video or file", block_type)
        })?;
        self.update_block(scope, block_id, &patch)?;
        Ok(uploaded)
    }

    // -----------------------------------------------------------------------
    // Tabs

    fn tab_mut(&mut self, tab_id: &str) -> Result<&mut Tab, EditorError> {
        self.resource
            .tab_mut(tab_id)
            .ok_or_else(|| EditorError::tab_not_found(tab_id))
    }

    /// Append a tab; sectioned tabs start with one empty section
    ///
    /// `title` defaults to "Tab N".
    pub fn add_tab(&mut self, title: Option<&str>, mode: TabMode) -> String {
        let tab_id = self.ids.next_id();
        let title = title
            .map(str::to_string)
            .unwrap_or_else(|| format!("Tab {}", self.resource.tabs.len() + 1));
        let tab = match mode {
            TabMode::Sectioned => Tab::sectioned(&tab_id, title)
                .with_section(Section::new(self.ids.next_id(), "Section 1", 0)),
            TabMode::Direct => Tab::direct(&tab_id, title),
        };
        self.resource.tabs.push(tab);

        tracing::info!("Added {} tab {} to resource {}", mode, tab_id, self.resource.id);
        self.commit(EditorEvent::TabAdded {
            tab_id: tab_id.clone(),
        });
        tab_id
    }

    pub fn rename_tab(&mut self, tab_id: &str, title: &str) -> Result<(), EditorError> {
        self.tab_mut(tab_id)?.title = title.to_string();
        self.commit(EditorEvent::TabUpdated {
            tab_id: tab_id.to_string(),
        });
        Ok(())
    }

    pub fn set_tab_icon(&mut self, tab_id: &str, icon: Option<String>) -> Result<(), EditorError> {
        self.tab_mut(tab_id)?.icon = icon;
        self.commit(EditorEvent::TabUpdated {
            tab_id: tab_id.to_string(),
        });
        Ok(())
    }

    /// Whether the delete action for a tab should be enabled
    pub fn can_delete_tab(&self, tab_id: &str) -> bool {
        self.resource.tab(tab_id).is_some() && self.resource.tabs.len() > MIN_TABS
    }

    /// Delete a tab with all its content; the last tab cannot be deleted
    pub fn delete_tab(&mut self, tab_id: &str) -> Result<(), EditorError> {
        let index = self
            .resource
            .tab_index(tab_id)
            .ok_or_else(|| EditorError::tab_not_found(tab_id))?;
        if self.resource.tabs.len() <= MIN_TABS {
            return Err(
                TreeOperationError::structural_floor(&self.resource.id, "tab", MIN_TABS).into(),
            );
        }
        self.resource.tabs.remove(index);

        tracing::info!("Deleted tab {} from resource {}", tab_id, self.resource.id);
        self.commit(EditorEvent::TabDeleted {
            tab_id: tab_id.to_string(),
        });
        Ok(())
    }

    pub fn reorder_tabs(&mut self, from: usize, to: usize) -> Result<(), EditorError> {
        move_item(&mut self.resource.tabs, from, to)?;
        self.commit(EditorEvent::TabsReordered);
        Ok(())
    }

    /// Convert a tab between sectioned and direct mode
    ///
    /// No blocks are lost: sections are flattened in order, or direct blocks
    /// are wrapped into one section. Returns `false` when the tab already was
    /// in `mode`.
    pub fn set_tab_mode(&mut self, tab_id: &str, mode: TabMode) -> Result<bool, EditorError> {
        let index = self
            .resource
            .tab_index(tab_id)
            .ok_or_else(|| EditorError::tab_not_found(tab_id))?;
        let tab = &self.resource.tabs[index];
        if tab.mode() == mode {
            return Ok(false);
        }

        let converted = match mode {
            TabMode::Direct => tab.clone().into_direct(),
            TabMode::Sectioned => tab.clone().into_sectioned(self.ids.as_ref()),
        };
        self.resource.tabs[index] = converted;

        tracing::info!("Converted tab {} to {} mode", tab_id, mode);
        self.commit(EditorEvent::TabModeChanged {
            tab_id: tab_id.to_string(),
            mode,
        });
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Sections

    fn sections_mut(&mut self, tab_id: &str) -> Result<&mut Vec<Section>, EditorError> {
        let tab = self.tab_mut(tab_id)?;
        let mode = tab.mode();
        tab.sections_mut()
            .ok_or_else(|| EditorError::scope_mode_mismatch(tab_id, mode))
    }

    fn section_mut(&mut self, tab_id: &str, section_id: &str) -> Result<&mut Section, EditorError> {
        self.sections_mut(tab_id)?
            .iter_mut()
            .find(|s| s.id == section_id)
            .ok_or_else(|| EditorError::section_not_found(tab_id, section_id))
    }

    /// Append a section to a sectioned tab
    ///
    /// `title` defaults to "Section N".
    pub fn add_section(&mut self, tab_id: &str, title: Option<&str>) -> Result<String, EditorError> {
        let ids = Arc::clone(&self.ids);
        let sections = self.sections_mut(tab_id)?;
        let title = title
            .map(str::to_string)
            .unwrap_or_else(|| format!("Section {}", sections.len() + 1));
        let section = Section::new(ids.next_id(), title, sections.len() as i32);
        let section_id = section.id.clone();
        sections.push(section);

        tracing::info!("Added section {} to tab {}", section_id, tab_id);
        self.commit(EditorEvent::SectionAdded {
            tab_id: tab_id.to_string(),
            section_id: section_id.clone(),
        });
        Ok(section_id)
    }

    pub fn update_section(
        &mut self,
        tab_id: &str,
        section_id: &str,
        update: SectionUpdate,
    ) -> Result<(), EditorError> {
        update.apply(self.section_mut(tab_id, section_id)?);
        self.commit(EditorEvent::SectionUpdated {
            tab_id: tab_id.to_string(),
            section_id: section_id.to_string(),
        });
        Ok(())
    }

    /// Collapse or expand a section; returns the new collapsed state
    ///
    /// Sections that are not collapsible stay open.
    pub fn toggle_section_collapsed(
        &mut self,
        tab_id: &str,
        section_id: &str,
    ) -> Result<bool, EditorError> {
        let section = self.section_mut(tab_id, section_id)?;
        if !section.collapsible {
            return Ok(section.collapsed);
        }
        section.collapsed = !section.collapsed;
        let collapsed = section.collapsed;

        self.commit(EditorEvent::SectionUpdated {
            tab_id: tab_id.to_string(),
            section_id: section_id.to_string(),
        });
        Ok(collapsed)
    }

    /// Delete a section with its blocks
    ///
    /// A tab may end up with no sections.
    pub fn delete_section(&mut self, tab_id: &str, section_id: &str) -> Result<(), EditorError> {
        let sections = self.sections_mut(tab_id)?;
        let index = sections
            .iter()
            .position(|s| s.id == section_id)
            .ok_or_else(|| EditorError::section_not_found(tab_id, section_id))?;
        sections.remove(index);
        crate::models::renumber_sections(sections);

        tracing::info!("Deleted section {} from tab {}", section_id, tab_id);
        self.commit(EditorEvent::SectionDeleted {
            tab_id: tab_id.to_string(),
            section_id: section_id.to_string(),
        });
        Ok(())
    }

    /// Move a section; `order` fields stay dense 0..n
    pub fn reorder_sections(&mut self, tab_id: &str, from: usize, to: usize) -> Result<(), EditorError> {
        let sections = self.sections_mut(tab_id)?;
        move_item(sections, from, to)?;
        crate::models::renumber_sections(sections);

        self.commit(EditorEvent::SectionsReordered {
            tab_id: tab_id.to_string(),
        });
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Resource

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.resource.title = title.into();
        self.commit(EditorEvent::ResourceUpdated);
    }

    /// Add a tag; returns `false` when it is blank or already present
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || !self.resource.tags.insert(tag.to_string()) {
            return false;
        }
        self.commit(EditorEvent::ResourceUpdated);
        true
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        if !self.resource.tags.remove(tag.trim()) {
            return false;
        }
        self.commit(EditorEvent::ResourceUpdated);
        true
    }

    pub fn set_metadata(&mut self, metadata: ResourceMetadata) {
        self.resource.metadata = metadata;
        self.commit(EditorEvent::ResourceUpdated);
    }
}

impl std::fmt::Debug for ResourceEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceEditor")
            .field("resource", &self.resource.id)
            .field("config", &self.config)
            .field("selection", &self.selection)
            .field("has_save_handler", &self.save_handler.is_some())
            .finish()
    }
}
