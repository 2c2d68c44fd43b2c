//! Tests for the block factory and catalog

#[cfg(test)]
mod tests {
    use crate::ids::SequentialIdGenerator;
    use crate::operations::collect_ids;
    use crate::registry::{catalog, create_empty_block, BlockCategory, BlockRegistry};
    use crate::models::{BlockData, BlockType, GridLayout, ModelError, Slot, TextBlock, TextMode};
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn test_create_empty_columns_has_two_distinct_empty_columns() {
        let ids = SequentialIdGenerator::new("b");
        let first = create_empty_block(BlockType::Columns, &ids);
        let second = create_empty_block(BlockType::Columns, &ids);

        let BlockData::Columns(columns) = &first.data else {
            panic!("expected columns payload");
        };
        assert_eq!(columns.columns.len(), 2);
        assert!(columns.columns.iter().all(|c| c.blocks.is_empty()));
        assert_ne!(columns.columns[0].id, columns.columns[1].id);

        let mut all = collect_ids(std::slice::from_ref(&first));
        all.extend(collect_ids(std::slice::from_ref(&second)));
        for (_, slot_blocks) in first.data.slots().into_iter().chain(second.data.slots()) {
            assert!(slot_blocks.is_empty());
        }
        let slot_ids: Vec<String> = first
            .data
            .slots()
            .into_iter()
            .chain(second.data.slots())
            .filter_map(|(slot, _)| slot.id().map(str::to_string))
            .collect();
        all.extend(slot_ids);
        let unique: HashSet<&String> = all.iter().collect();
        assert_eq!(unique.len(), all.len());
    }

    #[test]
    fn test_every_type_gets_its_default_payload() {
        let ids = SequentialIdGenerator::new("b");
        for block_type in BlockType::ALL {
            let block = create_empty_block(block_type, &ids);
            assert_eq!(block.block_type(), block_type);
            assert_eq!(block.is_container(), block_type.is_container());
        }
    }

    #[test]
    fn test_text_default_follows_registry_mode() {
        let ids = SequentialIdGenerator::new("b");

        let markdown = create_empty_block(BlockType::Text, &ids);
        assert_eq!(
            serde_json::to_value(&markdown.data).unwrap(),
            json!({"mode": "markdown", "markdown": ""})
        );

        let registry = BlockRegistry::new(TextMode::RichText, GridLayout::default());
        let rich = registry.create_empty_block(BlockType::Text, &ids);
        assert_eq!(TextBlock::from_block(&rich).unwrap().mode(), TextMode::RichText);
        assert_eq!(rich.data.field("html"), Some(&json!("")));
    }

    #[test]
    fn test_grid_follows_registry_layout() {
        let ids = SequentialIdGenerator::new("b");
        let registry = BlockRegistry::new(TextMode::Markdown, GridLayout::TwoByThree);
        let grid = registry.create_empty_block(BlockType::Grid, &ids);

        assert_eq!(grid.data.slots().len(), 6);
        assert!(matches!(grid.data.first_slot(), Some(Slot::Cell(_))));
    }

    #[test]
    fn test_container_defaults() {
        let ids = SequentialIdGenerator::new("b");

        let tabs = create_empty_block(BlockType::Tabs, &ids);
        assert_eq!(tabs.data.slots().len(), 2);

        let accordion = create_empty_block(BlockType::Accordion, &ids);
        assert_eq!(accordion.data.slots().len(), 1);

        let toggle = create_empty_block(BlockType::Toggle, &ids);
        assert_eq!(toggle.data.field("label"), Some(&json!("Toggle")));
        assert_eq!(toggle.data.first_slot(), Some(Slot::Body));
    }

    #[test]
    fn test_named_factory_rejects_unknown_tag() {
        let ids = SequentialIdGenerator::new("b");
        let registry = BlockRegistry::default();

        let block = registry.create_empty_block_named("quote", &ids).unwrap();
        assert_eq!(block.data.field("author"), Some(&json!("")));

        let err = registry.create_empty_block_named("slideshow", &ids).unwrap_err();
        assert_eq!(err, ModelError::InvalidBlockType("slideshow".to_string()));
    }

    #[test]
    fn test_catalog_covers_every_type() {
        let entries = catalog();
        assert_eq!(entries.len(), BlockType::ALL.len());

        let layout: Vec<BlockType> = entries
            .iter()
            .filter(|info| info.category == BlockCategory::Layout)
            .map(|info| info.block_type)
            .collect();
        assert!(layout.iter().all(BlockType::is_container));
        assert_eq!(BlockType::Quiz.info().label, "Quiz");
    }
}
