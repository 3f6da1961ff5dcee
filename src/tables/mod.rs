//! Presentation tables handed to the report template.
//!
//! A table is an ordered list of columns plus rows of cells. Rows serialize
//! as mappings from column key to cell, in column order, which is the shape
//! templating engines iterate over. Vertical merges are carried as metadata
//! next to the rows.

pub mod grouped;
pub mod pivot;
pub mod stats;
pub mod stratified;

pub use grouped::{build_grouped_table, GroupedTableSpec};
pub use pivot::flagged_pivot;
pub use stats::{mean, overall_mean, share_of_points_with};
pub use stratified::{stratified_mean, stratified_summary_table, StratifiedMean};

use crate::core::{format_number, RawValue};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub key: String,
    pub title: String,
}

impl Column {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
        }
    }

    /// Column whose key doubles as its title.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            key: name.clone(),
            title: name,
        }
    }
}

/// One table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    /// A value the template highlights (e.g. a limit exceedance)
    Flagged(String),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn from_raw(value: &RawValue) -> Self {
        match value {
            RawValue::Number(v) => Cell::Number(*v),
            RawValue::Text(s) => Cell::Text(s.clone()),
            RawValue::Missing => Cell::Empty,
        }
    }

    pub fn from_option(value: Option<f64>) -> Self {
        value.map(Cell::Number).unwrap_or(Cell::Empty)
    }

    pub fn display(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) | Cell::Flagged(s) => s.clone(),
            Cell::Number(v) => format_number(*v),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_flagged(&self) -> bool {
        matches!(self, Cell::Flagged(_))
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Empty => serializer.serialize_str(""),
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Number(v) => serializer.serialize_f64(*v),
            Cell::Flagged(s) => {
                let mut state = serializer.serialize_struct("Flagged", 2)?;
                state.serialize_field("text", s)?;
                state.serialize_field("flagged", &true)?;
                state.end()
            }
        }
    }
}

/// A span of rows rendered as one cell in `column`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MergeSpan {
    pub column: usize,
    pub first_row: usize,
    pub row_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresentationTable {
    columns: Vec<Column>,
    rows: Vec<Vec<Cell>>,
    merges: Vec<MergeSpan>,
}

impl PresentationTable {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            merges: Vec::new(),
        }
    }

    /// Append a row. Short rows are padded with empty cells, extra cells
    /// are dropped.
    pub fn push_row(&mut self, mut cells: Vec<Cell>) {
        cells.resize(self.columns.len(), Cell::Empty);
        self.rows.push(cells);
    }

    pub fn push_merge(&mut self, span: MergeSpan) {
        self.merges.push(span);
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn merges(&self) -> &[MergeSpan] {
        &self.merges
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    pub fn cell(&self, row: usize, key: &str) -> Option<&Cell> {
        let column = self.column_index(key)?;
        self.rows.get(row).and_then(|cells| cells.get(column))
    }

    /// All cells of one column, top to bottom.
    pub fn column_cells(&self, key: &str) -> Vec<&Cell> {
        match self.column_index(key) {
            Some(column) => self.rows.iter().map(|cells| &cells[column]).collect(),
            None => Vec::new(),
        }
    }
}

struct RowRef<'a> {
    columns: &'a [Column],
    cells: &'a [Cell],
}

impl Serialize for RowRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, cell) in self.columns.iter().zip(self.cells) {
            map.serialize_entry(&column.key, cell)?;
        }
        map.end()
    }
}

impl Serialize for PresentationTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let rows: Vec<RowRef<'_>> = self
            .rows
            .iter()
            .map(|cells| RowRef {
                columns: &self.columns,
                cells,
            })
            .collect();

        let mut state = serializer.serialize_struct("PresentationTable", 3)?;
        state.serialize_field("columns", &self.columns)?;
        state.serialize_field("rows", &rows)?;
        state.serialize_field("merges", &self.merges)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rows_are_padded_to_column_count() {
        let mut table = PresentationTable::new(vec![Column::named("a"), Column::named("b")]);
        table.push_row(vec![Cell::text("x")]);
        assert_eq!(table.cell(0, "b"), Some(&Cell::Empty));
        assert_eq!(table.cell(0, "c"), None);
    }

    #[test]
    fn rows_serialize_as_keyed_mappings() {
        let mut table = PresentationTable::new(vec![
            Column::new("Ponto", "Ponto"),
            Column::new("Cromo", "Cromo (mg/L)"),
            Column::new("Zinco", "Zinco (mg/L)"),
        ]);
        table.push_row(vec![
            Cell::text("P1"),
            Cell::Number(0.04),
            Cell::Flagged("9".to_string()),
        ]);

        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(
            value["rows"],
            json!([{"Ponto": "P1", "Cromo": 0.04, "Zinco": {"text": "9", "flagged": true}}])
        );
        assert_eq!(value["columns"][1]["title"], "Cromo (mg/L)");
        assert_eq!(value["merges"], json!([]));
    }
}
