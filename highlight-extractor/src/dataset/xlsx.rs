//! Spreadsheet-backed tabular store.
//!
//! Reads xlsx/xls/ods through calamine (format chosen by extension) and writes
//! xlsx through rust_xlsxwriter. The first row of a sheet is its header.

use std::io::Write;
use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use tempfile::NamedTempFile;
use tracing::debug;

use super::{Cell, Table, TabularStore};
use crate::error::MergeError;

/// Tabular store over spreadsheet workbooks.
///
/// Saving rewrites the whole workbook. Sheets other than the one being saved
/// keep their values; formatting and formulas are not preserved.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxStore;

impl XlsxStore {
    pub fn new() -> Self {
        Self
    }

    /// Read every sheet of a workbook, in workbook order.
    fn read_sheets(path: &Path) -> Result<Vec<(String, Table)>, MergeError> {
        let mut workbook = open_workbook_auto(path).map_err(|e| read_error(path, e))?;

        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            let range = workbook
                .worksheet_range(&name)
                .map_err(|e| read_error(path, e))?;
            sheets.push((name, range_to_table(&range)));
        }
        Ok(sheets)
    }
}

impl TabularStore for XlsxStore {
    fn load(&self, path: &Path, sheet: &str) -> Result<Table, MergeError> {
        let mut workbook = open_workbook_auto(path).map_err(|e| read_error(path, e))?;

        if !workbook.sheet_names().iter().any(|name| name == sheet) {
            return Err(MergeError::SheetNotFound {
                sheet: sheet.to_string(),
            });
        }

        let range = workbook
            .worksheet_range(sheet)
            .map_err(|e| read_error(path, e))?;
        let table = range_to_table(&range);

        debug!(
            path = %path.display(),
            sheet,
            columns = table.columns.len(),
            rows = table.rows.len(),
            "Loaded dataset sheet"
        );

        Ok(table)
    }

    fn save(&self, table: &Table, path: &Path, sheet: &str) -> Result<(), MergeError> {
        let mut sheets = if path.exists() {
            Self::read_sheets(path)?
        } else {
            Vec::new()
        };

        match sheets.iter_mut().find(|(name, _)| name.as_str() == sheet) {
            Some((_, existing)) => *existing = table.clone(),
            None => sheets.push((sheet.to_string(), table.clone())),
        }

        let mut workbook = Workbook::new();
        for (name, table) in &sheets {
            let worksheet = workbook.add_worksheet();
            worksheet
                .set_name(name)
                .map_err(|e| write_error(path, e))?;
            write_table(worksheet, table).map_err(|e| write_error(path, e))?;
        }
        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| write_error(path, e))?;

        // Write beside the target and rename over it, so a failed write leaves
        // the previous file intact
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(dir).map_err(|e| write_error(path, e))?;
        temp.write_all(&buffer)
            .map_err(|e| write_error(path, e))?;
        temp.persist(path)
            .map_err(|e| write_error(path, e.error))?;

        debug!(
            path = %path.display(),
            sheet,
            sheets = sheets.len(),
            "Saved dataset"
        );

        Ok(())
    }
}

fn read_error(path: &Path, error: impl std::fmt::Display) -> MergeError {
    MergeError::Read {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}

fn write_error(path: &Path, error: impl std::fmt::Display) -> MergeError {
    MergeError::Write {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}

fn range_to_table(range: &Range<Data>) -> Table {
    let mut rows = range.rows();
    let columns = rows
        .next()
        .map(|header| header.iter().map(header_name).collect())
        .unwrap_or_default();
    let rows = rows
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();

    Table { columns, rows }
}

fn header_name(data: &Data) -> String {
    match data {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::String(s) => Cell::Text(s.clone()),
        // Serial date numbers; the date formatting is lost on rewrite
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(e.to_string()),
    }
}

fn write_table(worksheet: &mut Worksheet, table: &Table) -> Result<(), XlsxError> {
    for (col, name) in table.columns.iter().enumerate() {
        worksheet.write_string(0, column_number(col)?, name)?;
    }

    for (index, row) in table.rows.iter().enumerate() {
        let row_number = u32::try_from(index + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        for (col, cell) in row.iter().enumerate() {
            let col = column_number(col)?;
            match cell {
                Cell::Empty => {}
                Cell::Number(n) => {
                    worksheet.write_number(row_number, col, *n)?;
                }
                Cell::Text(s) => {
                    worksheet.write_string(row_number, col, s)?;
                }
                Cell::Bool(b) => {
                    worksheet.write_boolean(row_number, col, *b)?;
                }
            }
        }
    }

    Ok(())
}

fn column_number(index: usize) -> Result<u16, XlsxError> {
    u16::try_from(index).map_err(|_| XlsxError::RowColumnLimitError)
}
