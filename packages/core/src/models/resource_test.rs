//! Tests for the Resource → Tab → Section hierarchy

#[cfg(test)]
mod tests {
    use crate::ids::SequentialIdGenerator;
    use crate::models::{
        Block, BlockType, Resource, Scope, Section, Tab, TabContent, TabMode, TextBlock, TextMode,
    };
    use serde_json::json;

    fn text(id: &str, markdown: &str) -> Block {
        Block::leaf(id, BlockType::Text, json!({"mode": "markdown", "markdown": markdown})).unwrap()
    }

    fn sectioned_tab() -> Tab {
        Tab::sectioned("t1", "Overview")
            .with_section(Section::new("s1", "Intro", 0).with_blocks(vec![text("a", "one")]))
            .with_section(Section::new("s2", "Details", 0).with_blocks(vec![text("b", "two")]))
    }

    #[test]
    fn test_tab_content_is_tagged_by_mode() {
        let tab = Tab::direct("t", "Direct").with_blocks(vec![text("a", "x")]);
        let encoded = serde_json::to_value(&tab).unwrap();

        assert_eq!(encoded["content"]["mode"], "direct");
        assert_eq!(encoded["content"]["blocks"][0]["id"], "a");
        assert!(encoded["content"].get("sections").is_none());
    }

    #[test]
    fn test_resource_decodes_with_defaults() {
        let resource: Resource = serde_json::from_value(json!({
            "id": "r",
            "tabs": [ { "id": "t1", "content": { "mode": "sectioned",
                "sections": [ { "id": "s1" } ] } } ],
            "metadata": { "allowComments": true }
        }))
        .unwrap();

        let section = &resource.tabs[0].sections()[0];
        assert!(section.collapsible);
        assert!(!section.collapsed);
        assert!(resource.metadata.allow_comments);
        assert!(!resource.metadata.show_table_of_contents);
        assert!(resource.tags.is_empty());
    }

    #[test]
    fn test_with_section_keeps_order_dense() {
        let tab = sectioned_tab();
        let orders: Vec<i32> = tab.sections().iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![0, 1]);
    }

    #[test]
    fn test_scopes_follow_reading_order() {
        let resource = Resource::new("r", "Doc", sectioned_tab());
        let mut resource = resource;
        resource.tabs.push(Tab::direct("t2", "Flat"));

        assert_eq!(
            resource.scopes(),
            vec![
                Scope::section("t1", "s1"),
                Scope::section("t1", "s2"),
                Scope::tab("t2"),
            ]
        );
        assert_eq!(resource.block_count(), 2);
    }

    #[test]
    fn test_blocks_in_respects_mode() {
        let resource = Resource::new("r", "Doc", sectioned_tab());

        assert!(resource.blocks_in(&Scope::tab("t1")).is_none());
        assert_eq!(resource.blocks_in(&Scope::section("t1", "s2")).unwrap()[0].id, "b");
        assert!(resource.blocks_in(&Scope::section("t1", "missing")).is_none());
    }

    #[test]
    fn test_into_direct_concatenates_sections_in_order() {
        let tab = sectioned_tab().into_direct();

        assert_eq!(tab.mode(), TabMode::Direct);
        match &tab.content {
            TabContent::Direct { blocks } => {
                let ids: Vec<&str> = blocks.iter().map(|b| b.id.as_str()).collect();
                assert_eq!(ids, vec!["a", "b"]);
            }
            other => panic!("expected direct content, got {:?}", other),
        }
    }

    #[test]
    fn test_into_sectioned_wraps_blocks_in_one_section() {
        let ids = SequentialIdGenerator::new("sec");
        let tab = Tab::direct("t", "Flat")
            .with_blocks(vec![text("a", "1"), text("b", "2")])
            .into_sectioned(&ids);

        assert_eq!(tab.mode(), TabMode::Sectioned);
        assert_eq!(tab.sections().len(), 1);
        assert_eq!(tab.sections()[0].id, "sec-1");
        assert_eq!(tab.sections()[0].title, "Flat");
        assert_eq!(tab.sections()[0].blocks.len(), 2);
    }

    #[test]
    fn test_mode_conversion_round_trip_keeps_blocks() {
        let ids = SequentialIdGenerator::new("sec");
        let original = sectioned_tab();
        let round_trip = original.clone().into_direct().into_sectioned(&ids).into_direct();

        assert_eq!(round_trip, original.into_direct());
    }

    #[test]
    fn test_normalize_restores_tab_floor() {
        let ids = SequentialIdGenerator::new("n");
        let mut resource: Resource =
            serde_json::from_value(json!({"id": "r", "title": "Empty", "tabs": []})).unwrap();

        resource.normalize(&ids);

        assert_eq!(resource.tabs.len(), 1);
        assert_eq!(resource.tabs[0].mode(), TabMode::Sectioned);
    }

    #[test]
    fn test_text_block_view() {
        let markdown = text("t", "# Title");
        let view = TextBlock::from_block(&markdown).unwrap();
        assert_eq!(view.mode(), TextMode::Markdown);
        assert_eq!(view.content(), "# Title");

        let rich =
            Block::leaf("r", BlockType::Text, json!({"mode": "richtext", "html": "<p>x</p>"})).unwrap();
        let view = TextBlock::from_block(&rich).unwrap();
        assert_eq!(view.mode(), TextMode::RichText);
        assert_eq!(view.html(), Some("<p>x</p>"));

        let divider = Block::leaf("d", BlockType::Divider, json!({})).unwrap();
        let err = TextBlock::from_block(&divider).err().unwrap();
        assert!(err.to_string().contains("expected 'text', got 'divider'"));
    }
}
