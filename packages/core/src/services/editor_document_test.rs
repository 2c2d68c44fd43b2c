//! Tests for document-level editor operations: tabs, sections, resource
//! fields and collaborators

#[cfg(test)]
mod tests {
    use crate::config::{EditorConfig, IdStrategy};
    use crate::models::{
        Block, BlockType, Resource, ResourceMetadata, Scope, Section, Tab, TabMode,
    };
    use crate::operations::{find_block, TreeOperationError};
    use crate::services::{
        EditorError, EditorEvent, ResourceEditor, SectionUpdate, StorageTarget, UploadError,
        UploadRequest, UploadService, UploadedFile,
    };
    use async_trait::async_trait;
    use serde_json::json;

    fn text(id: &str) -> Block {
        Block::leaf(id, BlockType::Text, json!({"markdown": id})).unwrap()
    }

    fn resource() -> Resource {
        let tab = Tab::sectioned("t1", "One")
            .with_section(Section::new("s1", "First", 0).with_blocks(vec![text("a"), text("b")]))
            .with_section(Section::new("s2", "Second", 1).with_blocks(vec![text("c")]));
        Resource::new("res", "Handbook", tab)
    }

    fn editor() -> ResourceEditor {
        let config = EditorConfig {
            id_strategy: IdStrategy::Sequential {
                prefix: "n".to_string(),
            },
            ..EditorConfig::default()
        };
        ResourceEditor::with_config(resource(), config).unwrap()
    }

    #[test]
    fn test_last_tab_cannot_be_deleted() {
        let mut editor = editor();
        assert!(!editor.can_delete_tab("t1"));

        let err = editor.delete_tab("t1").unwrap_err();
        match err {
            EditorError::Operation(TreeOperationError::StructuralFloor {
                slot_kind, minimum, ..
            }) => {
                assert_eq!(slot_kind, "tab");
                assert_eq!(minimum, 1);
            }
            other => panic!("expected structural floor, got {:?}", other),
        }
        assert_eq!(editor.resource().tabs.len(), 1);

        let added = editor.add_tab(None, TabMode::Direct);
        assert!(editor.can_delete_tab("t1"));
        editor.delete_tab("t1").unwrap();
        assert_eq!(editor.resource().tabs[0].id, added);
        assert!(!editor.can_delete_tab(&added));
    }

    #[test]
    fn test_add_tab_defaults() {
        let mut editor = editor();
        let mut rx = editor.subscribe_to_events();

        let sectioned = editor.add_tab(None, TabMode::Sectioned);
        let direct = editor.add_tab(Some("Notes"), TabMode::Direct);

        let tab = editor.resource().tab(&sectioned).unwrap();
        assert_eq!(tab.title, "Tab 2");
        assert_eq!(tab.sections().len(), 1);
        assert_eq!(tab.sections()[0].title, "Section 1");

        let tab = editor.resource().tab(&direct).unwrap();
        assert_eq!(tab.title, "Notes");
        assert_eq!(tab.mode(), TabMode::Direct);

        assert_eq!(
            rx.try_recv().unwrap(),
            EditorEvent::TabAdded { tab_id: sectioned }
        );
    }

    #[test]
    fn test_tab_rename_icon_reorder() {
        let mut editor = editor();
        let second = editor.add_tab(Some("Two"), TabMode::Direct);

        editor.rename_tab("t1", "Overview").unwrap();
        editor
            .set_tab_icon("t1", Some("book".to_string()))
            .unwrap();
        editor.reorder_tabs(1, 0).unwrap();

        let tabs = &editor.resource().tabs;
        assert_eq!(tabs[0].id, second);
        assert_eq!(tabs[1].title, "Overview");
        assert_eq!(tabs[1].icon.as_deref(), Some("book"));

        assert!(editor.rename_tab("nope", "x").unwrap_err().is_not_found());
        assert!(editor.reorder_tabs(0, 5).is_err());
    }

    #[test]
    fn test_tab_mode_round_trip_keeps_blocks() {
        let mut editor = editor();

        assert!(editor.set_tab_mode("t1", TabMode::Direct).unwrap());
        let ids: Vec<_> = editor
            .blocks_in(&Scope::tab("t1"))
            .unwrap()
            .iter()
            .map(|b| b.id.clone())
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert!(!editor.set_tab_mode("t1", TabMode::Direct).unwrap());

        assert!(editor.set_tab_mode("t1", TabMode::Sectioned).unwrap());
        let tab = editor.resource().tab("t1").unwrap();
        assert_eq!(tab.sections().len(), 1);
        assert_eq!(tab.sections()[0].title, "One");
        assert_eq!(tab.sections()[0].blocks.len(), 3);
    }

    #[test]
    fn test_section_lifecycle() {
        let mut editor = editor();
        let mut rx = editor.subscribe_to_events();

        let added = editor.add_section("t1", None).unwrap();
        let tab = editor.resource().tab("t1").unwrap();
        assert_eq!(tab.sections()[2].title, "Section 3");
        assert_eq!(tab.sections()[2].order, 2);

        editor
            .update_section(
                "t1",
                &added,
                SectionUpdate {
                    title: Some("Appendix".to_string()),
                    description: Some(Some("Extra reading".to_string())),
                    ..SectionUpdate::default()
                },
            )
            .unwrap();
        editor.reorder_sections("t1", 2, 0).unwrap();
        editor.delete_section("t1", "s1").unwrap();

        let sections = editor.resource().tab("t1").unwrap().sections();
        let summary: Vec<_> = sections
            .iter()
            .map(|s| (s.id.as_str(), s.order))
            .collect();
        assert_eq!(summary, [(added.as_str(), 0), ("s2", 1)]);
        assert_eq!(sections[0].title, "Appendix");
        assert_eq!(sections[0].description.as_deref(), Some("Extra reading"));

        let types: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|e| e.event_type().to_string())
            .collect();
        assert_eq!(
            types,
            [
                "section:added",
                "section:updated",
                "sections:reordered",
                "section:deleted"
            ]
        );
    }

    #[test]
    fn test_sections_may_all_be_deleted() {
        let mut editor = editor();
        editor.delete_section("t1", "s1").unwrap();
        editor.delete_section("t1", "s2").unwrap();

        assert!(editor.resource().tab("t1").unwrap().sections().is_empty());
        assert!(editor
            .delete_section("t1", "s1")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_section_ops_reject_direct_tabs() {
        let mut editor = editor();
        let direct = editor.add_tab(None, TabMode::Direct);

        assert!(matches!(
            editor.add_section(&direct, None).unwrap_err(),
            EditorError::ScopeModeMismatch {
                mode: TabMode::Direct,
                ..
            }
        ));
    }

    #[test]
    fn test_toggle_collapsed_respects_collapsible() {
        let mut editor = editor();
        assert!(editor.toggle_section_collapsed("t1", "s1").unwrap());
        assert!(!editor.toggle_section_collapsed("t1", "s1").unwrap());

        editor
            .update_section(
                "t1",
                "s2",
                SectionUpdate {
                    collapsed: Some(true),
                    collapsible: Some(false),
                    ..SectionUpdate::default()
                },
            )
            .unwrap();
        let s2 = editor.resource().tab("t1").unwrap().section("s2").unwrap();
        assert!(!s2.collapsed);
        assert!(!editor.toggle_section_collapsed("t1", "s2").unwrap());
    }

    #[test]
    fn test_resource_fields() {
        let mut editor = editor();
        let mut rx = editor.subscribe_to_events();

        editor.set_title("Employee Handbook");
        assert!(editor.add_tag(" hr "));
        assert!(!editor.add_tag("hr"));
        assert!(!editor.add_tag("  "));
        assert!(editor.remove_tag("hr"));
        assert!(!editor.remove_tag("hr"));
        editor.set_metadata(ResourceMetadata {
            show_table_of_contents: true,
            ..ResourceMetadata::default()
        });

        assert_eq!(editor.resource().title, "Employee Handbook");
        assert!(editor.resource().tags.is_empty());
        assert!(editor.resource().metadata.show_table_of_contents);
        assert_eq!(std::iter::from_fn(|| rx.try_recv().ok()).count(), 4);
    }

    #[test]
    fn test_json_round_trip_and_config_validation() {
        let editor = editor();
        let json = editor.to_json().unwrap();

        let reopened = ResourceEditor::from_json(&json, EditorConfig::default()).unwrap();
        assert_eq!(reopened.resource(), editor.resource());

        let bad = EditorConfig {
            event_channel_capacity: 0,
            ..EditorConfig::default()
        };
        assert!(matches!(
            ResourceEditor::from_json(&json, bad).unwrap_err(),
            EditorError::InvalidConfig(_)
        ));
        assert!(matches!(
            ResourceEditor::from_json("{", EditorConfig::default()).unwrap_err(),
            EditorError::Serialization(_)
        ));
    }

    #[test]
    fn test_empty_resource_gets_a_tab() {
        let resource: Resource = serde_json::from_value(json!({"id": "r", "title": "Blank"})).unwrap();
        let editor = ResourceEditor::new(resource);
        assert_eq!(editor.resource().tabs.len(), 1);
        assert_eq!(editor.resource().tabs[0].mode(), TabMode::Sectioned);
    }

    struct FakeUploader {
        fail: bool,
    }

    #[async_trait]
    impl UploadService for FakeUploader {
        async fn upload(&self, request: UploadRequest) -> Result<UploadedFile, UploadError> {
            if self.fail {
                return Err(UploadError::storage("bucket offline"));
            }
            Ok(UploadedFile {
                url: format!("https://cdn.test/{}/{}", request.target.bucket, request.filename),
                size: request.size(),
                filename: request.filename,
                mime_type: request.mime_type,
            })
        }
    }

    fn request() -> UploadRequest {
        UploadRequest::new("cat.png", "image/png", vec![1, 2, 3], StorageTarget::new("media"))
    }

    #[tokio::test]
    async fn test_upload_into_image_block() {
        let mut editor = editor();
        let scope = Scope::section("t1", "s1");
        let image = editor.add_block(&scope, BlockType::Image).unwrap();

        let uploaded = editor
            .upload_into_block(&scope, &image, &FakeUploader { fail: false }, request())
            .await
            .unwrap();
        assert_eq!(uploaded.size, 3);

        let block = find_block(editor.blocks_in(&scope).unwrap(), &image).unwrap();
        assert_eq!(block.data.field("url"), Some(&json!("https://cdn.test/media/cat.png")));
        assert_eq!(block.data.field("alt"), Some(&json!("")));
    }

    #[tokio::test]
    async fn test_upload_failures_leave_document_alone() {
        let mut editor = editor();
        let scope = Scope::section("t1", "s1");
        let image = editor.add_block(&scope, BlockType::Image).unwrap();
        let before = editor.resource().clone();

        let err = editor
            .upload_into_block(&scope, &image, &FakeUploader { fail: true }, request())
            .await
            .unwrap_err();
        assert!(matches!(err, EditorError::Upload(UploadError::Storage(_))));

        let err = editor
            .upload_into_block(&scope, "a", &FakeUploader { fail: false }, request())
            .await
            .unwrap_err();
        assert!(matches!(err, EditorError::WrongBlockType { .. }));

        assert_eq!(editor.resource(), &before);
    }
}
