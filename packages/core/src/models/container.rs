//! Container block payloads
//!
//! Each container type owns one or more named child collections. The shapes
//! match the JSON stored under a container block's `data` field:
//!
//! | Type        | Collection field | Item shape                     |
//! |-------------|------------------|--------------------------------|
//! | `tabs`      | `tabs`           | `{id, label, blocks}`          |
//! | `columns`   | `columns`        | `{id, width?, blocks}`         |
//! | `grid`      | `cells`          | `{id, row, col, blocks}`       |
//! | `accordion` | `items`          | `{id, title, blocks}`          |
//! | `callout`   | `blocks`         | blocks directly on `data`      |
//! | `toggle`    | `blocks`         | blocks directly on `data`      |
//!
//! A missing or `null` collection decodes as an empty one.

use crate::ids::IdGenerator;
use crate::models::block::Block;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Treat an explicit `null` collection the same as a missing one
fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Names one child collection of a container block
///
/// Slot ids are the ids of the tab item, column, cell or accordion item that
/// owns the collection. Callouts and toggles have a single `Body`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum Slot {
    Tab(String),
    Column(String),
    Cell(String),
    Item(String),
    Body,
}

impl Slot {
    /// Short name of the slot kind, used in errors and logs
    pub fn kind_name(&self) -> &'static str {
        match self {
            Slot::Tab(_) => "tab",
            Slot::Column(_) => "column",
            Slot::Cell(_) => "cell",
            Slot::Item(_) => "item",
            Slot::Body => "body",
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Slot::Tab(id) | Slot::Column(id) | Slot::Cell(id) | Slot::Item(id) => Some(id),
            Slot::Body => None,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id() {
            Some(id) => write!(f, "{}:{}", self.kind_name(), id),
            None => f.write_str(self.kind_name()),
        }
    }
}

/// `tabs` container: a row of labelled tab items
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TabsData {
    #[serde(default, deserialize_with = "nullable_vec")]
    pub tabs: Vec<TabItem>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabItem {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub blocks: Vec<Block>,
}

impl TabItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            blocks: Vec::new(),
        }
    }
}

/// `columns` container
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColumnsData {
    #[serde(default, deserialize_with = "nullable_vec")]
    pub columns: Vec<Column>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ColumnsData {
    /// Column widths in percent; columns without an explicit width share
    /// whatever the explicit ones leave over
    pub fn effective_widths(&self) -> Vec<f64> {
        let explicit: f64 = self.columns.iter().filter_map(|c| c.width).sum();
        let implicit = self.columns.iter().filter(|c| c.width.is_none()).count();
        let share = if implicit == 0 {
            0.0
        } else {
            (100.0 - explicit).max(0.0) / implicit as f64
        };
        self.columns.iter().map(|c| c.width.unwrap_or(share)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    /// Width in percent; `None` means an equal share
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub blocks: Vec<Block>,
}

impl Column {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            width: None,
            blocks: Vec::new(),
        }
    }
}

/// Grid shape, written as `rows x cols`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GridLayout {
    #[default]
    #[serde(rename = "2x2")]
    TwoByTwo,
    #[serde(rename = "3x3")]
    ThreeByThree,
    #[serde(rename = "2x3")]
    TwoByThree,
    #[serde(rename = "3x2")]
    ThreeByTwo,
    #[serde(rename = "2x4")]
    TwoByFour,
    #[serde(rename = "4x2")]
    FourByTwo,
}

impl GridLayout {
    pub const ALL: [GridLayout; 6] = [
        GridLayout::TwoByTwo,
        GridLayout::ThreeByThree,
        GridLayout::TwoByThree,
        GridLayout::ThreeByTwo,
        GridLayout::TwoByFour,
        GridLayout::FourByTwo,
    ];

    pub fn rows(&self) -> u32 {
        match self {
            GridLayout::TwoByTwo | GridLayout::TwoByThree | GridLayout::TwoByFour => 2,
            GridLayout::ThreeByThree | GridLayout::ThreeByTwo => 3,
            GridLayout::FourByTwo => 4,
        }
    }

    pub fn cols(&self) -> u32 {
        match self {
            GridLayout::TwoByTwo | GridLayout::ThreeByTwo | GridLayout::FourByTwo => 2,
            GridLayout::ThreeByThree | GridLayout::TwoByThree => 3,
            GridLayout::TwoByFour => 4,
        }
    }

    pub fn cell_count(&self) -> usize {
        (self.rows() * self.cols()) as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GridLayout::TwoByTwo => "2x2",
            GridLayout::ThreeByThree => "3x3",
            GridLayout::TwoByThree => "2x3",
            GridLayout::ThreeByTwo => "3x2",
            GridLayout::TwoByFour => "2x4",
            GridLayout::FourByTwo => "4x2",
        }
    }
}

impl fmt::Display for GridLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `grid` container: cells addressed by row and column
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GridData {
    #[serde(default)]
    pub layout: GridLayout,

    #[serde(default, deserialize_with = "nullable_vec")]
    pub cells: Vec<GridCell>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GridData {
    /// Empty grid with one cell per position of `layout`, row-major
    pub fn new(layout: GridLayout, ids: &dyn IdGenerator) -> Self {
        let cells = (0..layout.rows())
            .flat_map(|row| (0..layout.cols()).map(move |col| (row, col)))
            .map(|(row, col)| GridCell::new(ids.next_id(), row, col))
            .collect();
        Self {
            layout,
            cells,
            extra: Map::new(),
        }
    }

    /// Reshape the grid to `layout`
    ///
    /// Cells whose position survives keep their id and blocks. Blocks from
    /// cells that fall outside the new shape are appended to the first cell,
    /// so no content is dropped.
    pub fn relayout(&mut self, layout: GridLayout, ids: &dyn IdGenerator) {
        let mut old = std::mem::take(&mut self.cells);
        let mut cells = Vec::with_capacity(layout.cell_count());

        for row in 0..layout.rows() {
            for col in 0..layout.cols() {
                match old.iter().position(|c| c.row == row && c.col == col) {
                    Some(index) => cells.push(old.remove(index)),
                    None => cells.push(GridCell::new(ids.next_id(), row, col)),
                }
            }
        }

        let orphaned: Vec<Block> = old.into_iter().flat_map(|cell| cell.blocks).collect();
        if let Some(first) = cells.first_mut() {
            first.blocks.extend(orphaned);
        }

        self.layout = layout;
        self.cells = cells;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub id: String,
    #[serde(default)]
    pub row: u32,
    #[serde(default)]
    pub col: u32,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub blocks: Vec<Block>,
}

impl GridCell {
    pub fn new(id: impl Into<String>, row: u32, col: u32) -> Self {
        Self {
            id: id.into(),
            row,
            col,
            blocks: Vec::new(),
        }
    }
}

/// `accordion` container
///
/// Older documents store the list under `sections`; both names decode.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AccordionData {
    #[serde(default, alias = "sections", deserialize_with = "nullable_vec")]
    pub items: Vec<AccordionItem>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccordionItem {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub blocks: Vec<Block>,
}

impl AccordionItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            blocks: Vec::new(),
        }
    }
}

/// Single-collection payload shared by `callout` and `toggle`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BodyData {
    #[serde(default, deserialize_with = "nullable_vec")]
    pub blocks: Vec<Block>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
