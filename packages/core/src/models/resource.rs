//! Resource document model
//!
//! A `Resource` owns an ordered, non-empty list of tabs. Each tab is either
//! `sectioned` (blocks live inside sections) or `direct` (a flat block list).
//! The mode is encoded in [`TabContent`], so a tab can never hold both
//! collections at once.
//!
//! ```json
//! {
//!   "id": "res-1",
//!   "title": "Onboarding",
//!   "tabs": [
//!     { "id": "t1", "title": "Overview",
//!       "content": { "mode": "sectioned", "sections": [
//!         { "id": "s1", "title": "Intro", "order": 0, "blocks": [] } ] } }
//!   ],
//!   "tags": ["hr"],
//!   "metadata": { "showTableOfContents": true }
//! }
//! ```

use crate::ids::IdGenerator;
use crate::models::block::Block;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Top-level document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tabs: Vec<Tab>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub metadata: ResourceMetadata,
}

impl Resource {
    pub fn new(id: impl Into<String>, title: impl Into<String>, first_tab: Tab) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            tabs: vec![first_tab],
            tags: BTreeSet::new(),
            metadata: ResourceMetadata::default(),
        }
    }

    /// Restore the document-level invariants after decoding foreign input
    ///
    /// An empty tab list gets one sectioned tab, and section `order` fields
    /// are rewritten to match list position.
    pub fn normalize(&mut self, ids: &dyn IdGenerator) {
        if self.tabs.is_empty() {
            self.tabs.push(Tab::sectioned(ids.next_id(), "Tab 1"));
        }
        for tab in &mut self.tabs {
            if let TabContent::Sectioned { sections } = &mut tab.content {
                renumber_sections(sections);
            }
        }
    }

    pub fn tab(&self, tab_id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    pub fn tab_mut(&mut self, tab_id: &str) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == tab_id)
    }

    pub fn tab_index(&self, tab_id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }

    /// Every top-level block collection of the document, in reading order
    pub fn collections(&self) -> Vec<(Scope, &Vec<Block>)> {
        self.tabs
            .iter()
            .flat_map(|tab| match &tab.content {
                TabContent::Direct { blocks } => vec![(Scope::tab(&tab.id), blocks)],
                TabContent::Sectioned { sections } => sections
                    .iter()
                    .map(|s| (Scope::section(&tab.id, &s.id), &s.blocks))
                    .collect(),
            })
            .collect()
    }

    /// All scopes that own a block collection
    pub fn scopes(&self) -> Vec<Scope> {
        self.collections().into_iter().map(|(scope, _)| scope).collect()
    }

    pub fn blocks_in(&self, scope: &Scope) -> Option<&Vec<Block>> {
        self.tab(&scope.tab_id)?.blocks_in(scope.section_id.as_deref())
    }

    pub fn blocks_in_mut(&mut self, scope: &Scope) -> Option<&mut Vec<Block>> {
        self.tab_mut(&scope.tab_id)?
            .blocks_in_mut(scope.section_id.as_deref())
    }

    pub fn block_count(&self) -> usize {
        self.collections()
            .into_iter()
            .flat_map(|(_, blocks)| blocks.iter())
            .map(|b| 1 + b.descendant_count())
            .sum()
    }
}

/// Viewer display options; opaque to the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceMetadata {
    pub show_table_of_contents: bool,
    pub allow_comments: bool,
    pub track_reading: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabMode {
    Sectioned,
    Direct,
}

impl fmt::Display for TabMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TabMode::Sectioned => f.write_str("sectioned"),
            TabMode::Direct => f.write_str("direct"),
        }
    }
}

/// The authoritative collection of a tab, tagged by mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum TabContent {
    Sectioned {
        #[serde(default)]
        sections: Vec<Section>,
    },
    Direct {
        #[serde(default)]
        blocks: Vec<Block>,
    },
}

impl Default for TabContent {
    fn default() -> Self {
        TabContent::Sectioned {
            sections: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub content: TabContent,
}

impl Tab {
    pub fn sectioned(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            icon: None,
            content: TabContent::Sectioned {
                sections: Vec::new(),
            },
        }
    }

    pub fn direct(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            icon: None,
            content: TabContent::Direct { blocks: Vec::new() },
        }
    }

    pub fn with_section(mut self, section: Section) -> Self {
        if let TabContent::Sectioned { sections } = &mut self.content {
            sections.push(section);
            renumber_sections(sections);
        }
        self
    }

    pub fn with_blocks(mut self, new_blocks: Vec<Block>) -> Self {
        if let TabContent::Direct { blocks } = &mut self.content {
            blocks.extend(new_blocks);
        }
        self
    }

    pub fn mode(&self) -> TabMode {
        match self.content {
            TabContent::Sectioned { .. } => TabMode::Sectioned,
            TabContent::Direct { .. } => TabMode::Direct,
        }
    }

    /// Sections of a sectioned tab; empty for direct tabs
    pub fn sections(&self) -> &[Section] {
        match &self.content {
            TabContent::Sectioned { sections } => sections,
            TabContent::Direct { .. } => &[],
        }
    }

    pub fn sections_mut(&mut self) -> Option<&mut Vec<Section>> {
        match &mut self.content {
            TabContent::Sectioned { sections } => Some(sections),
            TabContent::Direct { .. } => None,
        }
    }

    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections().iter().find(|s| s.id == section_id)
    }

    /// Block collection addressed by an optional section id
    ///
    /// Direct tabs answer only to `None`; sectioned tabs only to a section id.
    pub fn blocks_in(&self, section_id: Option<&str>) -> Option<&Vec<Block>> {
        match (&self.content, section_id) {
            (TabContent::Direct { blocks }, None) => Some(blocks),
            (TabContent::Sectioned { sections }, Some(id)) => {
                sections.iter().find(|s| s.id == id).map(|s| &s.blocks)
            }
            _ => None,
        }
    }

    pub fn blocks_in_mut(&mut self, section_id: Option<&str>) -> Option<&mut Vec<Block>> {
        match (&mut self.content, section_id) {
            (TabContent::Direct { blocks }, None) => Some(blocks),
            (TabContent::Sectioned { sections }, Some(id)) => sections
                .iter_mut()
                .find(|s| s.id == id)
                .map(|s| &mut s.blocks),
            _ => None,
        }
    }

    /// Flatten a sectioned tab into a direct one
    ///
    /// Section blocks are concatenated in section order. Direct tabs are
    /// returned as is.
    pub fn into_direct(self) -> Tab {
        let blocks = match self.content {
            TabContent::Direct { blocks } => blocks,
            TabContent::Sectioned { sections } => {
                sections.into_iter().flat_map(|s| s.blocks).collect()
            }
        };
        Tab {
            content: TabContent::Direct { blocks },
            ..self
        }
    }

    /// Wrap a direct tab's blocks into a single new section
    ///
    /// The section takes the tab's title. Sectioned tabs are returned as is.
    pub fn into_sectioned(self, ids: &dyn IdGenerator) -> Tab {
        let blocks = match self.content {
            TabContent::Sectioned { .. } => return self,
            TabContent::Direct { blocks } => blocks,
        };
        let mut section = Section::new(ids.next_id(), self.title.clone(), 0);
        section.blocks = blocks;
        Tab {
            content: TabContent::Sectioned {
                sections: vec![section],
            },
            ..self
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default = "default_true")]
    pub collapsible: bool,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn new(id: impl Into<String>, title: impl Into<String>, order: i32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            collapsed: false,
            collapsible: true,
            order,
            blocks: Vec::new(),
        }
    }

    pub fn with_blocks(mut self, blocks: Vec<Block>) -> Self {
        self.blocks = blocks;
        self
    }
}

/// Rewrite `order` so it matches list position, 0..n
pub fn renumber_sections(sections: &mut [Section]) {
    for (index, section) in sections.iter_mut().enumerate() {
        section.order = index as i32;
    }
}

/// A top-level block collection: a direct tab, or one section of a sectioned tab
///
/// Selection state is tracked per scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    pub tab_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
}

impl Scope {
    pub fn tab(tab_id: impl Into<String>) -> Self {
        Self {
            tab_id: tab_id.into(),
            section_id: None,
        }
    }

    pub fn section(tab_id: impl Into<String>, section_id: impl Into<String>) -> Self {
        Self {
            tab_id: tab_id.into(),
            section_id: Some(section_id.into()),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.section_id {
            Some(section_id) => write!(f, "{}/{}", self.tab_id, section_id),
            None => f.write_str(&self.tab_id),
        }
    }
}
