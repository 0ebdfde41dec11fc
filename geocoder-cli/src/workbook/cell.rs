//! Spreadsheet cell representation

use calamine::{Data, ExcelDateTime};

/// A single cell read from (or written to) a worksheet
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Empty cell (also used for empty strings)
    Empty,
    /// Text
    String(String),
    /// Whole number
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Date, time or duration, kept as the workbook's serial value
    DateTime(ExcelDateTime),
}

impl CellValue {
    /// Check if this cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Try to get as a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(f) => Some(*f),
            CellValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Text used when the cell is interpolated into an address string.
    ///
    /// Empty cells render as the literal `None`; whole floats drop their
    /// fractional part so `94043.0` reads back as `94043`.
    pub fn to_address_text(&self) -> String {
        match self {
            CellValue::Empty => "None".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::String(s) if s.is_empty() => CellValue::Empty,
            Data::String(s) => CellValue::String(s.clone()),
            Data::Int(i) => CellValue::Int(*i),
            Data::Float(f) => CellValue::Float(*f),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => CellValue::DateTime(*dt),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
            // Error cells (#N/A, #DIV/0!, ...) pass through as their text
            Data::Error(e) => CellValue::String(e.to_string()),
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::String(s) => write!(f, "{}", s),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(fl) => {
                if fl.fract() == 0.0 && fl.abs() < i64::MAX as f64 {
                    write!(f, "{}", *fl as i64)
                } else {
                    write!(f, "{}", fl)
                }
            }
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::DateTime(dt) => fmt_datetime(f, dt),
        }
    }
}

fn fmt_datetime(f: &mut std::fmt::Formatter<'_>, dt: &ExcelDateTime) -> std::fmt::Result {
    if dt.is_duration() {
        let total_secs = (dt.as_f64() * 86_400.0).round() as i64;
        return write!(
            f,
            "{}:{:02}:{:02}",
            total_secs / 3600,
            (total_secs % 3600) / 60,
            total_secs % 60
        );
    }

    let (year, month, day, hour, min, sec, _) = dt.to_ymd_hms_milli();
    if (hour, min, sec) == (0, 0, 0) {
        write!(f, "{:04}-{:02}-{:02}", year, month, day)
    } else {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            year, month, day, hour, min, sec
        )
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}
