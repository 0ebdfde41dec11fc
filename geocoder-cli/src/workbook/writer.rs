//! Write a BatchResult to the output workbook

use anyhow::{Context, Result};
use calamine::ExcelDateTime as SourceDateTime;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet};

use super::CellValue;
use crate::geocode::{BatchResult, Coordinate};

/// Name of the single output sheet
pub const SHEET_NAME: &str = "Geocoded_Addresses";

/// Appended coordinate columns
pub mod cols {
    pub const LATITUDE: &str = "Latitude";
    pub const LONGITUDE: &str = "Longitude";
}

/// Number formats for date cells carried over from the input
struct DateFormats {
    date: Format,
    datetime: Format,
    duration: Format,
}

impl DateFormats {
    fn new() -> Self {
        Self {
            date: Format::new().set_num_format("yyyy-mm-dd"),
            datetime: Format::new().set_num_format("yyyy-mm-dd hh:mm:ss"),
            duration: Format::new().set_num_format("[h]:mm:ss"),
        }
    }
}

/// Serialize a BatchResult into xlsx bytes.
///
/// Original columns keep their order and values; `Latitude` and `Longitude`
/// are appended. A found coordinate is a number cell, a missing one is an
/// empty string, which the xlsx format stores as a blank cell.
pub fn write_batch_result(result: &BatchResult) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let formats = DateFormats::new();

    worksheet.set_name(SHEET_NAME)?;

    let latitude_col = result.headers.len() as u16;
    let longitude_col = latitude_col + 1;

    // Header
    for (col, name) in result.headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, name)?;
    }
    worksheet.write_string(0, latitude_col, cols::LATITUDE)?;
    worksheet.write_string(0, longitude_col, cols::LONGITUDE)?;

    for (row_idx, row) in result.rows.iter().enumerate() {
        let xl_row = (row_idx + 1) as u32;

        for (col, cell) in row.cells.iter().enumerate() {
            write_cell(worksheet, xl_row, col as u16, cell, &formats)?;
        }

        write_coordinate(worksheet, xl_row, latitude_col, row.outcome.latitude())?;
        write_coordinate(worksheet, xl_row, longitude_col, row.outcome.longitude())?;
    }

    let bytes = workbook
        .save_to_buffer()
        .context("Failed to serialize geocoded workbook")?;

    log::info!(
        "Serialized {} geocoded rows ({} bytes)",
        result.rows.len(),
        bytes.len()
    );

    Ok(bytes)
}

fn write_cell(
    ws: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    formats: &DateFormats,
) -> Result<()> {
    match value {
        CellValue::Empty => { /* Leave cell empty */ }
        CellValue::String(s) => { ws.write_string(row, col, s)?; }
        CellValue::Int(i) => { ws.write_number(row, col, *i as f64)?; }
        CellValue::Float(f) => { ws.write_number(row, col, *f)?; }
        CellValue::Bool(b) => { ws.write_boolean(row, col, *b)?; }
        CellValue::DateTime(dt) => write_datetime(ws, row, col, dt, formats)?,
    }
    Ok(())
}

fn write_datetime(
    ws: &mut Worksheet,
    row: u32,
    col: u16,
    value: &SourceDateTime,
    formats: &DateFormats,
) -> Result<()> {
    if value.is_duration() {
        ws.write_number_with_format(row, col, value.as_f64(), &formats.duration)?;
        return Ok(());
    }

    // Rebuild from calendar parts so 1904-based input lands on the same date
    let (year, month, day, hour, min, sec, milli) = value.to_ymd_hms_milli();
    let format = if (hour, min, sec, milli) == (0, 0, 0, 0) {
        &formats.date
    } else {
        &formats.datetime
    };

    match ExcelDateTime::from_ymd(year, month, day)
        .and_then(|date| date.and_hms_milli(u16::from(hour), min, sec, milli))
    {
        Ok(datetime) => {
            ws.write_datetime_with_format(row, col, &datetime, format)?;
        }
        Err(e) => {
            // Serials outside the calendar range (e.g. 1900-02-29) keep their raw value
            log::debug!("Writing date serial {} unconverted: {}", value.as_f64(), e);
            ws.write_number_with_format(row, col, value.as_f64(), format)?;
        }
    }
    Ok(())
}

fn write_coordinate(ws: &mut Worksheet, row: u32, col: u16, value: Coordinate) -> Result<()> {
    match value {
        Coordinate::Value(v) => { ws.write_number(row, col, v)?; }
        Coordinate::Blank => { ws.write_string(row, col, "")?; }
    }
    Ok(())
}
