//! Tests for the tree mutation engine

#[cfg(test)]
mod tests {
    use crate::ids::SequentialIdGenerator;
    use crate::models::{Block, BlockType, Slot};
    use crate::operations::tree::*;
    use crate::operations::TreeOperationError;
    use crate::registry::create_empty_block;
    use serde_json::{json, Value};

    fn text(id: &str) -> Block {
        Block::leaf(id, BlockType::Text, json!({"mode": "markdown", "markdown": ""})).unwrap()
    }

    fn blocks(value: Value) -> Vec<Block> {
        serde_json::from_value(value).unwrap()
    }

    /// `[A(text), B(columns: col1[], col2[C(text)])]`
    fn scenario() -> Vec<Block> {
        blocks(json!([
            { "id": "A", "type": "text", "data": { "mode": "markdown", "markdown": "first" } },
            { "id": "B", "type": "columns", "data": { "columns": [
                { "id": "col1", "blocks": [] },
                { "id": "col2", "blocks": [
                    { "id": "C", "type": "text", "data": { "mode": "markdown", "markdown": "" } }
                ] }
            ] } }
        ]))
    }

    /// A leaf nested at depth 3: tabs → accordion → toggle → leaf
    fn deep_tree() -> Vec<Block> {
        blocks(json!([
            { "id": "top", "type": "text", "data": {} },
            { "id": "tabs", "type": "tabs", "data": { "tabs": [
                { "id": "tab1", "label": "One", "blocks": [
                    { "id": "d1", "type": "text", "data": {} },
                    { "id": "acc", "type": "accordion", "data": { "items": [
                        { "id": "item1", "title": "First", "blocks": [
                            { "id": "tog", "type": "toggle", "data": { "label": "More", "blocks": [
                                { "id": "d3", "type": "quote", "data": { "text": "deep" } }
                            ] } }
                        ] }
                    ] } }
                ] }
            ] } },
            { "id": "grid", "type": "grid", "data": { "layout": "2x2", "cells": [
                { "id": "g1", "row": 0, "col": 0, "blocks": [] },
                { "id": "g2", "row": 0, "col": 1, "blocks": [
                    { "id": "callout", "type": "callout", "data": { "variant": "info", "blocks": [
                        { "id": "in-callout", "type": "divider", "data": {} }
                    ] } }
                ] }
            ] } }
        ]))
    }

    fn field<'a>(tree: &'a [Block], id: &str, key: &str) -> Option<&'a Value> {
        find_block(tree, id).and_then(|b| b.data.field(key))
    }

    #[test]
    fn test_update_nested_block_in_scenario() {
        let tree = scenario();
        let updated = find_and_update(&tree, "C", &json!({"markdown": "hi"}));

        let encoded = serde_json::to_value(&updated).unwrap();
        assert_eq!(encoded[1]["data"]["columns"][1]["blocks"][0]["data"]["markdown"], "hi");
        assert_eq!(updated[0], tree[0]);
        assert_eq!(field(&tree, "C", "markdown"), Some(&json!("")));
    }

    #[test]
    fn test_update_missing_target_is_noop() {
        let tree = deep_tree();
        for patch in [json!({"markdown": "x"}), json!({}), json!("not an object")] {
            assert_eq!(find_and_update(&tree, "nope", &patch), tree);
        }
    }

    #[test]
    fn test_try_update_reports_reason() {
        let tree = scenario();
        let err = try_find_and_update(&tree, "nope", &json!({})).unwrap_err();
        assert!(err.is_not_found());

        let err = try_find_and_update(&tree, "A", &json!([1, 2])).unwrap_err();
        assert!(matches!(err, TreeOperationError::InvalidPatch { .. }));
    }

    #[test]
    fn test_update_is_depth_invariant() {
        let tree = deep_tree();
        for (id, depth) in [("top", 0), ("d1", 1), ("d3", 3), ("in-callout", 2)] {
            let updated = find_and_update(&tree, id, &json!({"marker": depth}));
            assert_eq!(field(&updated, id, "marker"), Some(&json!(depth)), "block {}", id);
            assert_eq!(updated.len(), tree.len());
        }
    }

    #[test]
    fn test_update_container_settings_keeps_children() {
        let tree = deep_tree();
        let updated = find_and_update(&tree, "tog", &json!({"label": "Less"}));

        assert_eq!(field(&updated, "tog", "label"), Some(&json!("Less")));
        assert!(contains_block(&updated, "d3"));
    }

    #[test]
    fn test_update_rejects_patch_breaking_container() {
        let tree = scenario();
        let result = try_find_and_update(&tree, "B", &json!({"columns": 7}));
        assert!(matches!(result, Err(TreeOperationError::InvalidPatch { .. })));
        assert_eq!(find_and_update(&tree, "B", &json!({"columns": 7})), tree);
    }

    #[test]
    fn test_update_cannot_replace_child_collections() {
        let tree = scenario();
        let updated = find_and_update(&tree, "B", &json!({"columns": []}));
        assert_eq!(updated, tree);
        assert!(contains_block(&updated, "C"));

        let err = try_find_and_update(&tree, "B", &json!({"columns": [], "gap": 4})).unwrap_err();
        assert!(matches!(err, TreeOperationError::InvalidPatch { .. }));

        let deep = deep_tree();
        for (id, key) in [("tabs", "tabs"), ("acc", "items"), ("acc", "sections"), ("tog", "blocks")] {
            let result = try_find_and_update(&deep, id, &json!({ key: [] }));
            assert!(
                matches!(result, Err(TreeOperationError::InvalidPatch { .. })),
                "{} accepted {}",
                id,
                key
            );
        }
    }

    #[test]
    fn test_update_cannot_change_grid_shape() {
        let tree = blocks(json!([
            { "id": "g", "type": "grid", "data": { "layout": "2x2", "cells": [
                { "id": "c1", "row": 0, "col": 0, "blocks": [] },
                { "id": "c2", "row": 0, "col": 1, "blocks": [] },
                { "id": "c3", "row": 1, "col": 0, "blocks": [] },
                { "id": "c4", "row": 1, "col": 1, "blocks": [] }
            ] } }
        ]));

        assert_eq!(find_and_update(&tree, "g", &json!({"layout": "3x3"})), tree);
        assert!(try_find_and_update(&tree, "g", &json!({"layout": "3x3"})).is_err());

        let updated = find_and_update(&tree, "g", &json!({"gap": 8}));
        assert_eq!(field(&updated, "g", "gap"), Some(&json!(8)));
        assert_eq!(updated[0].data.slots().len(), 4);
    }

    #[test]
    fn test_delete_container_in_scenario() {
        let tree = scenario();
        let remaining = delete_node(&tree, "B");

        assert_eq!(remaining, vec![tree[0].clone()]);
        assert!(!contains_block(&remaining, "C"));
    }

    #[test]
    fn test_delete_is_complete_at_any_depth() {
        let tree = deep_tree();
        for id in ["d3", "tog", "acc", "in-callout", "grid"] {
            let remaining = delete_node(&tree, id);
            assert!(!collect_ids(&remaining).contains(&id.to_string()), "block {}", id);
            let serialized = serde_json::to_string(&remaining).unwrap();
            assert!(!serialized.contains(&format!("\"id\":\"{}\"", id)));
        }
    }

    #[test]
    fn test_delete_missing_and_empty_are_noops() {
        assert_eq!(delete_node(&scenario(), "zzz"), scenario());
        assert!(delete_node(&[], "A").is_empty());
    }

    #[test]
    fn test_insert_child_first_slot_goes_to_first_column() {
        let tree = scenario();
        let inserted = insert_child(&tree, "B", text("N"), &ChildTarget::FirstSlot);

        let columns = &find_block(&inserted, "B").unwrap().data;
        let col1 = columns.slot(&Slot::Column("col1".into())).unwrap();
        let col2 = columns.slot(&Slot::Column("col2".into())).unwrap();
        assert_eq!(col1.len(), 1);
        assert_eq!(col1[0].id, "N");
        assert_eq!(col2.len(), 1);
        assert_eq!(col2[0].id, "C");
    }

    #[test]
    fn test_insert_child_explicit_slot() {
        let tree = scenario();
        let target = ChildTarget::Slot(Slot::Column("col2".into()));
        let inserted = insert_child(&tree, "B", text("N"), &target);

        let col2 = find_block(&inserted, "B")
            .unwrap()
            .data
            .slot(&Slot::Column("col2".into()))
            .unwrap()
            .clone();
        let ids: Vec<&str> = col2.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["C", "N"]);
    }

    #[test]
    fn test_insert_child_into_nested_container() {
        let tree = deep_tree();
        let inserted = insert_child(&tree, "tog", text("N"), &ChildTarget::FirstSlot);
        let toggle = find_block(&inserted, "tog").unwrap();
        assert_eq!(toggle.data.slot(&Slot::Body).unwrap()[1].id, "N");
    }

    #[test]
    fn test_insert_child_failures() {
        let tree = scenario();

        let err = try_insert_child(&tree, "A", text("N"), &ChildTarget::FirstSlot).unwrap_err();
        assert!(matches!(err, TreeOperationError::NotAContainer { .. }));

        let bad_slot = ChildTarget::Slot(Slot::Tab("col1".into()));
        let err = try_insert_child(&tree, "B", text("N"), &bad_slot).unwrap_err();
        assert!(matches!(err, TreeOperationError::SlotNotFound { .. }));

        assert_eq!(insert_child(&tree, "missing", text("N"), &ChildTarget::FirstSlot), tree);
    }

    #[test]
    fn test_insert_child_at_position() {
        let tree = deep_tree();
        let target = ChildTarget::Slot(Slot::Tab("tab1".into()));
        let inserted = try_insert_child_at(&tree, "tabs", text("N"), &target, 1).unwrap();
        let tab = find_block(&inserted, "tabs").unwrap().data.slot(&Slot::Tab("tab1".into())).unwrap().clone();
        assert_eq!(tab[1].id, "N");

        let err = try_insert_child_at(&tree, "tabs", text("N"), &target, 9).unwrap_err();
        assert_eq!(err, TreeOperationError::index_out_of_bounds(9, 2));
    }

    #[test]
    fn test_insert_after_anchor_at_depth() {
        let tree = deep_tree();
        let inserted = insert_after(&tree, "d1", text("N"));
        let tab = find_block(&inserted, "tabs").unwrap().data.slot(&Slot::Tab("tab1".into())).unwrap().clone();
        let ids: Vec<&str> = tab.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "N", "acc"]);
    }

    #[test]
    fn test_insert_at_root() {
        let tree = scenario();
        let inserted = try_insert_at(&tree, 0, text("N")).unwrap();
        assert_eq!(inserted[0].id, "N");
        assert!(try_insert_at(&tree, 3, text("N")).is_err());
    }

    #[test]
    fn test_duplicate_inserts_copy_after_original() {
        let ids = SequentialIdGenerator::new("dup");
        let tree = scenario();
        let (duplicated, new_id) =
            duplicate_node(&tree, "A", &ids, DuplicatePolicy::RegenerateDescendantIds);
        let new_id = new_id.unwrap();

        assert_ne!(new_id, "A");
        assert_eq!(duplicated[1].id, new_id);
        assert_eq!(duplicated[1].data, tree[0].data);
        assert_eq!(duplicated[2].id, "B");
    }

    #[test]
    fn test_duplicate_nested_block_stays_in_its_collection() {
        let ids = SequentialIdGenerator::new("dup");
        let tree = scenario();
        let (duplicated, new_id) =
            try_duplicate_node(&tree, "C", &ids, DuplicatePolicy::default()).unwrap();

        let col2 = find_block(&duplicated, "B")
            .unwrap()
            .data
            .slot(&Slot::Column("col2".into()))
            .unwrap()
            .clone();
        assert_eq!(col2.len(), 2);
        assert_eq!(col2[1].id, new_id);
        assert_eq!(duplicated.len(), 2);
    }

    #[test]
    fn test_duplicating_container_keeps_ids_globally_unique() {
        let ids = SequentialIdGenerator::new("dup");
        let tree = deep_tree();
        assert!(duplicate_ids(&tree).is_empty());

        let (duplicated, _) =
            duplicate_node(&tree, "tabs", &ids, DuplicatePolicy::RegenerateDescendantIds);

        assert!(duplicate_ids(&duplicated).is_empty());
        assert_eq!(collect_ids(&duplicated).len(), collect_ids(&tree).len() + 5);

        // slot ids are fresh too
        let original = find_block(&duplicated, "tabs").unwrap();
        let copy = &duplicated[2];
        assert_ne!(original.data.first_slot(), copy.data.first_slot());

        // and the copy can be edited without touching the original
        let copy_leaf = collect_ids(std::slice::from_ref(copy))
            .into_iter()
            .last()
            .unwrap();
        let edited = find_and_update(&duplicated, &copy_leaf, &json!({"text": "changed"}));
        assert_eq!(field(&edited, "d3", "text"), Some(&json!("deep")));
    }

    #[test]
    fn test_share_policy_reproduces_shared_descendant_ids() {
        let ids = SequentialIdGenerator::new("dup");
        let (duplicated, _) =
            duplicate_node(&deep_tree(), "tog", &ids, DuplicatePolicy::ShareDescendantIds);
        assert_eq!(duplicate_ids(&duplicated), vec!["d3".to_string()]);
    }

    #[test]
    fn test_duplicate_missing_target() {
        let ids = SequentialIdGenerator::new("dup");
        let (tree, new_id) = duplicate_node(&scenario(), "zzz", &ids, DuplicatePolicy::default());
        assert_eq!(tree, scenario());
        assert!(new_id.is_none());
    }

    #[test]
    fn test_reorder_round_trip() {
        let ids = SequentialIdGenerator::new("r");
        let list: Vec<Block> = (0..5).map(|_| create_empty_block(BlockType::Divider, &ids)).collect();

        for i in 0..list.len() {
            for j in 0..list.len() {
                let there = reorder(&list, i, j);
                assert_eq!(reorder(&there, j, i), list, "reorder {} <-> {}", i, j);
            }
        }
    }

    #[test]
    fn test_reorder_keeps_identity_and_content() {
        let tree = scenario();
        let swapped = reorder(&tree, 0, 1);
        assert_eq!(swapped[0], tree[1]);
        assert_eq!(swapped[1], tree[0]);
    }

    #[test]
    fn test_reorder_out_of_range_is_noop() {
        let tree = scenario();
        assert_eq!(reorder(&tree, 0, 2), tree);
        assert_eq!(reorder(&tree, 5, 0), tree);
        assert_eq!(
            try_reorder(&tree, 5, 0).unwrap_err(),
            TreeOperationError::index_out_of_bounds(5, 2)
        );
    }

    #[test]
    fn test_reorder_within_nested_slot() {
        let tree = deep_tree();
        let slot = Slot::Tab("tab1".into());
        let reordered = reorder_within(&tree, "tabs", &slot, 1, 0);

        let tab = find_block(&reordered, "tabs").unwrap().data.slot(&slot).unwrap().clone();
        assert_eq!(tab[0].id, "acc");
        assert_eq!(tab[1].id, "d1");

        let err = try_reorder_within(&tree, "top", &slot, 0, 1).unwrap_err();
        assert!(matches!(err, TreeOperationError::NotAContainer { .. }));
    }

    #[test]
    fn test_set_title_and_replace() {
        let tree = deep_tree();
        let titled = try_set_title(&tree, "d3", Some("Quote".into())).unwrap();
        assert_eq!(find_block(&titled, "d3").unwrap().title.as_deref(), Some("Quote"));

        let replaced = try_replace_block(&tree, "d3", text("fresh")).unwrap();
        assert!(contains_block(&replaced, "fresh"));
        assert!(!contains_block(&replaced, "d3"));
    }

    #[test]
    fn test_regenerate_ids_touches_every_descendant() {
        let ids = SequentialIdGenerator::new("new");
        let tree = deep_tree();
        let mut tabs = tree[1].clone();

        regenerate_ids(&mut tabs, &ids);

        let before = collect_ids(std::slice::from_ref(&tree[1]));
        let after = collect_ids(std::slice::from_ref(&tabs));
        assert_eq!(before.len(), after.len());
        assert!(after.iter().all(|id| id.starts_with("new-")));
    }

    #[test]
    fn test_find_block_reaches_every_container_shape() {
        let tree = deep_tree();
        for id in ["top", "tabs", "d1", "acc", "tog", "d3", "grid", "callout", "in-callout"] {
            assert!(find_block(&tree, id).is_some(), "block {}", id);
        }
        assert!(find_block(&tree, "tab1").is_none());
    }
}
