//! Rendering Dispatch
//!
//! [`render_block`] maps a block to its renderer. Container renderers never
//! render their children themselves: they receive a `render_child` callback
//! and call it once per child, naming the slot and index the child sits at.
//! The dispatcher turns that into the child's [`RenderContext`] and recurses,
//! so any container can hold any other container at any depth.
//!
//! Each context carries the block's [`BlockAddress`]. Edit-mode renderers
//! attach it to the operations they emit and hand those to
//! [`crate::services::ResourceEditor::apply_at`].

mod outline;

pub use outline::{table_of_contents, OutlineRenderer, TocEntry};

use crate::models::{Block, Scope, Slot};
use crate::operations::{BlockAddress, BlockPath};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Edit,
    View,
}

/// Where the block being rendered sits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub mode: RenderMode,
    pub scope: Scope,
    pub path: BlockPath,
}

impl RenderContext {
    pub fn root(mode: RenderMode, scope: Scope, index: usize) -> Self {
        Self {
            mode,
            scope,
            path: BlockPath::root(index),
        }
    }

    /// Context of a child at `index` in `slot` of this block
    pub fn child(&self, slot: Slot, index: usize) -> Self {
        Self {
            mode: self.mode,
            scope: self.scope.clone(),
            path: self.path.child(slot, index),
        }
    }

    /// Nesting depth; top-level blocks are at 0
    pub fn depth(&self) -> usize {
        self.path.depth()
    }

    pub fn address(&self) -> BlockAddress {
        BlockAddress {
            scope: self.scope.clone(),
            path: self.path.clone(),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.mode == RenderMode::Edit
    }
}

/// Callback a container renderer calls for each child: `(child, slot, index)`
pub type RenderChild<'a, O> = dyn FnMut(&Block, &Slot, usize) -> O + 'a;

pub trait BlockRenderer {
    type Output;

    fn render_leaf(&self, block: &Block, ctx: &RenderContext) -> Self::Output;

    /// Render a container; every child must go through `render_child`
    fn render_container(
        &self,
        block: &Block,
        ctx: &RenderContext,
        render_child: &mut RenderChild<'_, Self::Output>,
    ) -> Self::Output;
}

/// Render one block and, through the renderer's callbacks, all its descendants
pub fn render_block<R: BlockRenderer>(renderer: &R, block: &Block, ctx: &RenderContext) -> R::Output {
    if !block.is_container() {
        return renderer.render_leaf(block, ctx);
    }
    let mut render_child =
        |child: &Block, slot: &Slot, index: usize| render_block(renderer, child, &ctx.child(slot.clone(), index));
    renderer.render_container(block, ctx, &mut render_child)
}

/// Render every block of a scope's collection, in order
pub fn render_collection<R: BlockRenderer>(
    renderer: &R,
    blocks: &[Block],
    scope: &Scope,
    mode: RenderMode,
) -> Vec<R::Output> {
    blocks
        .iter()
        .enumerate()
        .map(|(index, block)| {
            render_block(renderer, block, &RenderContext::root(mode, scope.clone(), index))
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::{block_at, locate};
    use serde_json::json;

    /// Records `(id, depth, path)` for every rendered block
    struct Recorder;

    impl BlockRenderer for Recorder {
        type Output = Vec<(String, usize, BlockPath)>;

        fn render_leaf(&self, block: &Block, ctx: &RenderContext) -> Self::Output {
            vec![(block.id.clone(), ctx.depth(), ctx.path.clone())]
        }

        fn render_container(
            &self,
            block: &Block,
            ctx: &RenderContext,
            render_child: &mut RenderChild<'_, Self::Output>,
        ) -> Self::Output {
            let mut out = vec![(block.id.clone(), ctx.depth(), ctx.path.clone())];
            for (slot, children) in block.data.slots() {
                for (index, child) in children.iter().enumerate() {
                    out.extend(render_child(child, &slot, index));
                }
            }
            out
        }
    }

    fn tree() -> Vec<Block> {
        serde_json::from_value(json!([
            { "id": "a", "type": "text", "data": {} },
            { "id": "tabs", "type": "tabs", "data": { "tabs": [
                { "id": "x", "label": "X", "blocks": [
                    { "id": "grid", "type": "grid", "data": { "layout": "2x2", "cells": [
                        { "id": "g1", "row": 0, "col": 0, "blocks": [] },
                        { "id": "g2", "row": 0, "col": 1, "blocks": [
                            { "id": "tog", "type": "toggle", "data": { "blocks": [
                                { "id": "deep", "type": "divider", "data": {} }
                            ] } }
                        ] }
                    ] } }
                ] }
            ] } }
        ]))
        .unwrap()
    }

    #[test]
    fn test_dispatch_reaches_every_depth() {
        let blocks = tree();
        let scope = Scope::tab("t");
        let rendered: Vec<_> = render_collection(&Recorder, &blocks, &scope, RenderMode::View)
            .into_iter()
            .flatten()
            .collect();

        let depths: Vec<_> = rendered.iter().map(|(id, d, _)| (id.as_str(), *d)).collect();
        assert_eq!(
            depths,
            [("a", 0), ("tabs", 0), ("grid", 1), ("tog", 2), ("deep", 3)]
        );
    }

    #[test]
    fn test_context_paths_address_the_rendered_block() {
        let blocks = tree();
        let scope = Scope::tab("t");
        for (id, _, path) in render_collection(&Recorder, &blocks, &scope, RenderMode::Edit)
            .into_iter()
            .flatten()
        {
            assert_eq!(locate(&blocks, &id), Some(path.clone()));
            assert_eq!(block_at(&blocks, &path).map(|b| b.id.clone()), Some(id));
        }
    }

    #[test]
    fn test_context_child() {
        let ctx = RenderContext::root(RenderMode::Edit, Scope::section("t", "s"), 2);
        let child = ctx.child(Slot::Body, 0);

        assert!(child.is_editing());
        assert_eq!(child.depth(), 1);
        assert_eq!(child.address().scope, Scope::section("t", "s"));
        assert_eq!(child.path.parent(), Some(ctx.path.clone()));
    }
}
