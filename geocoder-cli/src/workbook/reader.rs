//! Read the first worksheet of an uploaded workbook into a [`Table`]
//!
//! Both `.xlsx` and legacy `.xls` files are accepted. The first row is the
//! header; every following row is data.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};

use super::{CellValue, Table};

/// Read a workbook from disk
pub fn read_table<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

    first_sheet_table(&mut workbook)
}

/// Read a workbook held in memory (e.g. an upload or a freshly written export)
pub fn read_table_from_bytes(bytes: Vec<u8>) -> Result<Table> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).context("Failed to open Excel data")?;

    first_sheet_table(&mut workbook)
}

fn first_sheet_table<RS: Read + Seek>(workbook: &mut Sheets<RS>) -> Result<Table> {
    let sheet_name = workbook
        .sheet_names()
        .first()
        .context("Excel file has no sheets")?
        .clone();

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

    let rows: Vec<&[Data]> = range.rows().collect();
    let Some((header, data)) = rows.split_first() else {
        log::debug!("Sheet '{}' is empty", sheet_name);
        return Ok(Table::default());
    };

    let headers = parse_header(header);
    let rows = data
        .iter()
        .map(|row| row.iter().map(CellValue::from).collect())
        .collect();

    let table = Table::new(headers, rows);
    log::info!(
        "Read {} rows with {} columns from sheet '{}'",
        table.len(),
        table.headers.len(),
        sheet_name
    );

    Ok(table)
}

fn parse_header(header: &[Data]) -> Vec<String> {
    header
        .iter()
        .enumerate()
        .map(|(col, cell)| match CellValue::from(cell) {
            CellValue::Empty => format!("Unnamed: {}", col),
            CellValue::String(s) => s,
            other => other.to_string(),
        })
        .collect()
}
