/// Configuration for the resource editor
use crate::ids::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
use crate::models::{GridLayout, TextMode};
use crate::operations::DuplicatePolicy;
use crate::registry::BlockRegistry;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default capacity of the editor event broadcast channel
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 128;

/// How the editor generates ids for new blocks, slots, tabs and sections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdStrategy {
    #[default]
    Uuid,
    /// `prefix-1`, `prefix-2`, ... (previews and tests)
    Sequential { prefix: String },
}

impl IdStrategy {
    pub fn build(&self) -> Arc<dyn IdGenerator> {
        match self {
            IdStrategy::Uuid => Arc::new(UuidIdGenerator),
            IdStrategy::Sequential { prefix } => Arc::new(SequentialIdGenerator::new(prefix.clone())),
        }
    }
}

/// Editor settings
///
/// Every field has a default, so a partial JSON document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub id_strategy: IdStrategy,

    /// Whether duplicating a container regenerates nested ids
    pub duplicate_policy: DuplicatePolicy,

    /// Authoring mode of newly created text blocks
    pub default_text_mode: TextMode,

    /// Shape of newly created grid blocks
    pub default_grid_layout: GridLayout,

    /// Capacity of the editor event channel (lagging subscribers drop events)
    pub event_channel_capacity: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            id_strategy: IdStrategy::Uuid,
            duplicate_policy: DuplicatePolicy::RegenerateDescendantIds,
            default_text_mode: TextMode::Markdown,
            default_grid_layout: GridLayout::TwoByTwo,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: EditorConfig =
            serde_json::from_str(json).map_err(|e| format!("invalid editor config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.event_channel_capacity == 0 {
            return Err("event_channel_capacity must be greater than 0".to_string());
        }

        if let IdStrategy::Sequential { prefix } = &self.id_strategy {
            if prefix.trim().is_empty() {
                return Err("sequential id prefix cannot be empty".to_string());
            }
        }

        Ok(())
    }

    /// Block factory configured with this editor's defaults
    pub fn registry(&self) -> BlockRegistry {
        BlockRegistry::new(self.default_text_mode, self.default_grid_layout)
    }
}
