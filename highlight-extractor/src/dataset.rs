//! Results dataset merging.
//!
//! The participant dataset is a sheet of rows keyed by an `id` column. Merging
//! writes each document's highlight proportion into a `highlight_proportion`
//! column, adding the column if it does not exist yet.

mod xlsx;

use std::path::Path;

use tracing::info;

use crate::error::MergeError;
use crate::extraction::ProportionRecord;

pub use xlsx::XlsxStore;

pub const ID_COLUMN: &str = "id";
pub const PROPORTION_COLUMN: &str = "highlight_proportion";

/// A single spreadsheet cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Cell {
    /// Interpret the cell as a document id. Only integral, non-negative numbers
    /// qualify; text that looks like a number does not.
    fn as_document_id(&self) -> Option<u32> {
        match self {
            Cell::Number(n) if n.fract() == 0.0 && *n >= 0.0 && *n <= u32::MAX as f64 => {
                Some(*n as u32)
            }
            _ => None,
        }
    }
}

/// A sheet with a header row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell of `row` under column `name`; missing trailing cells read as empty.
    #[cfg(test)]
    pub fn cell(&self, row: usize, name: &str) -> Option<&Cell> {
        let index = self.column_index(name)?;
        let row = self.rows.get(row)?;
        Some(row.get(index).unwrap_or(&Cell::Empty))
    }
}

/// Storage for named sheets of tabular data.
pub trait TabularStore {
    fn load(&self, path: &Path, sheet: &str) -> Result<Table, MergeError>;

    /// Replace `sheet` at `path` with `table`.
    fn save(&self, table: &Table, path: &Path, sheet: &str) -> Result<(), MergeError>;
}

/// Set the proportion column of every row from its id.
///
/// Rows whose id has no proportion get an empty cell, so merging the same
/// record twice yields the same table. Returns the number of rows that
/// received a value.
pub fn apply_proportions(
    table: &mut Table,
    record: &ProportionRecord,
) -> Result<usize, MergeError> {
    let id_index = table
        .column_index(ID_COLUMN)
        .ok_or_else(|| MergeError::MissingColumn {
            column: ID_COLUMN.to_string(),
        })?;

    let target = match table.column_index(PROPORTION_COLUMN) {
        Some(index) => index,
        None => {
            table.columns.push(PROPORTION_COLUMN.to_string());
            table.columns.len() - 1
        }
    };
    let width = table.columns.len();

    let mut matched = 0;
    for row in &mut table.rows {
        if row.len() < width {
            row.resize(width, Cell::Empty);
        }
        let value = row[id_index]
            .as_document_id()
            .and_then(|id| record.get(id));
        row[target] = match value {
            Some(proportion) => {
                matched += 1;
                Cell::Number(proportion)
            }
            None => Cell::Empty,
        };
    }

    Ok(matched)
}

/// Load a sheet, fill in the proportion column and write it back.
pub fn merge_proportions(
    store: &dyn TabularStore,
    path: &Path,
    sheet: &str,
    record: &ProportionRecord,
) -> Result<usize, MergeError> {
    let mut table = store.load(path, sheet)?;
    let matched = apply_proportions(&mut table, record)?;
    store.save(&table, path, sheet)?;

    info!(
        path = %path.display(),
        sheet,
        rows = table.rows.len(),
        matched,
        "Merged highlight proportions into dataset"
    );

    Ok(matched)
}
