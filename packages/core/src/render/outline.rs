//! Plain-text outline renderer
//!
//! Renders a block tree as an indented outline with markdown stripped, for
//! previews, search snippets and the reader's table of contents.

use crate::models::{Block, BlockData, BlockType, Resource, Scope, TabContent, TextBlock};
use crate::render::{render_collection, BlockRenderer, RenderChild, RenderContext, RenderMode};
use crate::utils::{strip_markdown, summarize};
use serde::Serialize;
use serde_json::Value;

const INDENT: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlineRenderer {
    /// Longest text summary per block, in characters
    pub summary_chars: usize,
}

impl Default for OutlineRenderer {
    fn default() -> Self {
        Self { summary_chars: 60 }
    }
}

/// One entry of a resource's table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TocEntry {
    /// 1 for tabs, 2 for sections, 3 for titled blocks
    pub level: u8,
    pub title: String,
    pub scope: Scope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
}

impl OutlineRenderer {
    pub fn new(summary_chars: usize) -> Self {
        Self { summary_chars }
    }

    fn summary(&self, block: &Block) -> String {
        let str_field = |key: &str| {
            block
                .data
                .field(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let count = |key: &str| {
            block
                .data
                .field(key)
                .and_then(Value::as_array)
                .map_or(0, Vec::len)
        };

        let raw = match block.block_type() {
            BlockType::Text => TextBlock::from_block(block)
                .map(|text| text.content().to_string())
                .unwrap_or_default(),
            BlockType::Image | BlockType::Video | BlockType::Embed => str_field("url"),
            BlockType::File => {
                let filename = str_field("filename");
                if filename.is_empty() {
                    str_field("url")
                } else {
                    filename
                }
            }
            BlockType::Quote => str_field("text"),
            BlockType::Code => str_field("language"),
            BlockType::Button => str_field("label"),
            BlockType::Alert => {
                let title = str_field("title");
                if title.is_empty() {
                    str_field("message")
                } else {
                    title
                }
            }
            BlockType::Checklist => format!("{} items", count("items")),
            BlockType::Quiz => format!("{} questions", count("questions")),
            BlockType::Table => format!("{} rows", count("rows")),
            _ => String::new(),
        };
        summarize(&raw, self.summary_chars)
    }

    fn heading(&self, block: &Block) -> String {
        let mut line = format!("- {}", block.block_type().info().label);
        if let Some(title) = block.title.as_deref().filter(|t| !t.is_empty()) {
            line.push_str(&format!(" \"{}\"", title));
        }
        line
    }

    /// Outline of a whole resource, tab by tab
    ///
    /// Starts with the table of contents when the resource's metadata asks
    /// for one.
    pub fn render_resource(&self, resource: &Resource, mode: RenderMode) -> String {
        let mut lines = vec![format!("# {}", resource.title)];

        if resource.metadata.show_table_of_contents {
            lines.push(String::new());
            lines.push("Contents".to_string());
            for entry in table_of_contents(resource) {
                let indent = INDENT.repeat(usize::from(entry.level.saturating_sub(1)));
                lines.push(format!("{}- {}", indent, entry.title));
            }
        }

        for tab in &resource.tabs {
            lines.push(String::new());
            lines.push(format!("## {}", tab.title));
            match &tab.content {
                TabContent::Direct { blocks } => {
                    lines.extend(render_collection(self, blocks, &Scope::tab(&tab.id), mode));
                }
                TabContent::Sectioned { sections } => {
                    for section in sections {
                        lines.push(format!("### {}", section.title));
                        if let Some(description) = &section.description {
                            lines.push(strip_markdown(description));
                        }
                        let scope = Scope::section(&tab.id, &section.id);
                        lines.extend(render_collection(self, &section.blocks, &scope, mode));
                    }
                }
            }
        }
        lines.join("\n")
    }
}

fn indent_lines(out: &mut Vec<String>, text: &str, depth: usize) {
    let prefix = INDENT.repeat(depth);
    out.extend(text.lines().map(|line| format!("{}{}", prefix, line)));
}

impl BlockRenderer for OutlineRenderer {
    type Output = String;

    fn render_leaf(&self, block: &Block, ctx: &RenderContext) -> String {
        let summary = self.summary(block);
        let heading = self.heading(block);
        match (summary.is_empty(), ctx.mode) {
            (false, _) => format!("{}: {}", heading, summary),
            (true, RenderMode::Edit) if block.block_type() != BlockType::Divider => {
                format!("{}: (empty)", heading)
            }
            (true, _) => heading,
        }
    }

    fn render_container(
        &self,
        block: &Block,
        ctx: &RenderContext,
        render_child: &mut RenderChild<'_, String>,
    ) -> String {
        let mut heading = self.heading(block);
        let slot_names: Vec<String> = match &block.data {
            BlockData::Tabs(d) => d.tabs.iter().map(|t| t.label.clone()).collect(),
            BlockData::Columns(d) => d
                .effective_widths()
                .iter()
                .enumerate()
                .map(|(i, width)| format!("Column {} ({:.0}%)", i + 1, width))
                .collect(),
            BlockData::Grid(d) => {
                heading.push_str(&format!(" {}", d.layout));
                d.cells
                    .iter()
                    .map(|c| format!("Cell {},{}", c.row + 1, c.col + 1))
                    .collect()
            }
            BlockData::Accordion(d) => d.items.iter().map(|i| i.title.clone()).collect(),
            BlockData::Callout(_) | BlockData::Toggle(_) | BlockData::Leaf { .. } => Vec::new(),
        };
        if let Some(label) = block
            .data
            .field("label")
            .or_else(|| block.data.field("variant"))
            .and_then(Value::as_str)
        {
            heading.push_str(&format!(": {}", label));
        }

        let mut out = vec![heading];
        for (position, (slot, children)) in block.data.slots().into_iter().enumerate() {
            // body containers list their children directly
            let depth = match slot_names.get(position) {
                Some(name) => {
                    if children.is_empty() && ctx.mode == RenderMode::View {
                        continue;
                    }
                    out.push(format!("{}[{}]", INDENT, name));
                    2
                }
                None => 1,
            };
            if children.is_empty() && ctx.is_editing() {
                indent_lines(&mut out, "(empty)", depth);
            }
            for (index, child) in children.iter().enumerate() {
                let rendered = render_child(child, &slot, index);
                indent_lines(&mut out, &rendered, depth);
            }
        }
        out.join("\n")
    }
}

/// Tabs, sections and titled blocks of a resource, in reading order
pub fn table_of_contents(resource: &Resource) -> Vec<TocEntry> {
    fn titled_blocks(blocks: &[Block], scope: &Scope, out: &mut Vec<TocEntry>) {
        for block in blocks {
            if let Some(title) = block.title.as_deref().filter(|t| !t.trim().is_empty()) {
                out.push(TocEntry {
                    level: 3,
                    title: title.to_string(),
                    scope: scope.clone(),
                    block_id: Some(block.id.clone()),
                });
            }
            for (_, children) in block.data.slots() {
                titled_blocks(children, scope, out);
            }
        }
    }

    let mut entries = Vec::new();
    for tab in &resource.tabs {
        entries.push(TocEntry {
            level: 1,
            title: tab.title.clone(),
            scope: Scope::tab(&tab.id),
            block_id: None,
        });
        match &tab.content {
            TabContent::Direct { blocks } => titled_blocks(blocks, &Scope::tab(&tab.id), &mut entries),
            TabContent::Sectioned { sections } => {
                for section in sections {
                    let scope = Scope::section(&tab.id, &section.id);
                    entries.push(TocEntry {
                        level: 2,
                        title: section.title.clone(),
                        scope: scope.clone(),
                        block_id: None,
                    });
                    titled_blocks(&section.blocks, &scope, &mut entries);
                }
            }
        }
    }
    entries
}
