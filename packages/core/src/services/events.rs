//! Editor Events
//!
//! One event is broadcast per applied editor operation, after the document
//! has been replaced and the save handler has run. Subscribers (a UI layer,
//! a sync bridge) re-read whatever they need from the editor; events carry
//! ids, not document snapshots.
//!
//! Events use tokio's broadcast channel, so a lagging subscriber loses old
//! events instead of blocking the editor.

use crate::models::{Scope, TabMode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EditorEvent {
    /// A block was inserted; `parent_id` is set for nested insertions
    BlockAdded {
        scope: Scope,
        block_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent_id: Option<String>,
    },
    BlockUpdated {
        scope: Scope,
        block_id: String,
    },
    BlockDeleted {
        scope: Scope,
        block_id: String,
    },
    BlockDuplicated {
        scope: Scope,
        source_id: String,
        block_id: String,
    },
    /// Blocks moved within the scope's own list or inside one container
    BlocksReordered {
        scope: Scope,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        container_id: Option<String>,
    },
    /// A container's slots were added, removed, renamed, resized or reshaped
    SlotsChanged {
        scope: Scope,
        container_id: String,
    },
    TabAdded {
        tab_id: String,
    },
    TabUpdated {
        tab_id: String,
    },
    TabDeleted {
        tab_id: String,
    },
    TabsReordered,
    TabModeChanged {
        tab_id: String,
        mode: TabMode,
    },
    SectionAdded {
        tab_id: String,
        section_id: String,
    },
    SectionUpdated {
        tab_id: String,
        section_id: String,
    },
    SectionDeleted {
        tab_id: String,
        section_id: String,
    },
    SectionsReordered {
        tab_id: String,
    },
    /// Title, tags or metadata changed
    ResourceUpdated,
}

impl EditorEvent {
    /// Get a string representation of the event type
    pub fn event_type(&self) -> &str {
        match self {
            EditorEvent::BlockAdded { .. } => "block:added",
            EditorEvent::BlockUpdated { .. } => "block:updated",
            EditorEvent::BlockDeleted { .. } => "block:deleted",
            EditorEvent::BlockDuplicated { .. } => "block:duplicated",
            EditorEvent::BlocksReordered { .. } => "blocks:reordered",
            EditorEvent::SlotsChanged { .. } => "slots:changed",
            EditorEvent::TabAdded { .. } => "tab:added",
            EditorEvent::TabUpdated { .. } => "tab:updated",
            EditorEvent::TabDeleted { .. } => "tab:deleted",
            EditorEvent::TabsReordered => "tabs:reordered",
            EditorEvent::TabModeChanged { .. } => "tab:mode-changed",
            EditorEvent::SectionAdded { .. } => "section:added",
            EditorEvent::SectionUpdated { .. } => "section:updated",
            EditorEvent::SectionDeleted { .. } => "section:deleted",
            EditorEvent::SectionsReordered { .. } => "sections:reordered",
            EditorEvent::ResourceUpdated => "resource:updated",
        }
    }

    /// Scope of a block-level event
    pub fn scope(&self) -> Option<&Scope> {
        match self {
            EditorEvent::BlockAdded { scope, .. }
            | EditorEvent::BlockUpdated { scope, .. }
            | EditorEvent::BlockDeleted { scope, .. }
            | EditorEvent::BlockDuplicated { scope, .. }
            | EditorEvent::BlocksReordered { scope, .. }
            | EditorEvent::SlotsChanged { scope, .. } => Some(scope),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// The JSON shape is flat: the tag sits next to camelCase fields
    #[test]
    fn test_event_serialization_contract() {
        let event = EditorEvent::BlockDuplicated {
            scope: Scope::section("t1", "s1"),
            source_id: "a".to_string(),
            block_id: "b".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "type": "blockDuplicated",
                "scope": { "tabId": "t1", "sectionId": "s1" },
                "sourceId": "a",
                "blockId": "b"
            })
        );

        assert_eq!(
            serde_json::to_value(EditorEvent::TabsReordered).unwrap(),
            json!({ "type": "tabsReordered" })
        );
    }

    #[test]
    fn test_event_deserialization() {
        let event: EditorEvent = serde_json::from_value(json!({
            "type": "tabModeChanged",
            "tabId": "t1",
            "mode": "direct"
        }))
        .unwrap();

        assert_eq!(
            event,
            EditorEvent::TabModeChanged {
                tab_id: "t1".to_string(),
                mode: TabMode::Direct
            }
        );
        assert_eq!(event.event_type(), "tab:mode-changed");
        assert!(event.scope().is_none());
    }

    #[test]
    fn test_block_events_carry_scope() {
        let event = EditorEvent::BlockAdded {
            scope: Scope::tab("t2"),
            block_id: "x".to_string(),
            parent_id: None,
        };
        assert_eq!(event.scope(), Some(&Scope::tab("t2")));
        assert_eq!(event.event_type(), "block:added");
        assert!(serde_json::to_value(&event).unwrap().get("parentId").is_none());
    }
}
