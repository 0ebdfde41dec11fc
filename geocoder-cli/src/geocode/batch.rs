//! Sequential batch geocoding of an address sheet
//!
//! Rows are looked up one at a time, in upload order. A failing row never
//! aborts the batch: it is recorded as [`RowOutcome::Failed`] and the loop
//! moves on.
//!
//! Counting: `processed_count` is every row whose lookup completed (found or
//! not found), `error_count` is every row whose lookup failed. The two always
//! add up to the number of rows.

use crate::api::{Coordinates, Geocoder, LookupOutcome};
use crate::workbook::CellValue;

use super::address::AddressSheet;

/// One output coordinate cell: a number, or the empty-string sentinel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coordinate {
    Value(f64),
    Blank,
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Coordinate::Value(v) => write!(f, "{}", v),
            Coordinate::Blank => Ok(()),
        }
    }
}

/// What happened to a single row
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// Provider returned a location
    Located(Coordinates),
    /// Provider answered without a location
    NotFound { reason: String },
    /// Lookup could not be completed
    Failed { reason: String },
}

impl RowOutcome {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            RowOutcome::Located(c) => Some(*c),
            _ => None,
        }
    }

    pub fn latitude(&self) -> Coordinate {
        self.coordinates()
            .map_or(Coordinate::Blank, |c| Coordinate::Value(c.latitude))
    }

    pub fn longitude(&self) -> Coordinate {
        self.coordinates()
            .map_or(Coordinate::Blank, |c| Coordinate::Value(c.longitude))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RowOutcome::Failed { .. })
    }
}

/// An input row extended with its geocoding outcome
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedRow {
    /// 1-based position in the upload
    pub position: usize,
    /// Original cells, unchanged
    pub cells: Vec<CellValue>,
    pub outcome: RowOutcome,
}

/// Every row of a batch plus its counters
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    pub headers: Vec<String>,
    pub rows: Vec<GeocodedRow>,
    pub processed_count: usize,
    pub error_count: usize,
}

impl BatchResult {
    pub fn from_rows(headers: Vec<String>, rows: Vec<GeocodedRow>) -> Self {
        let error_count = rows.iter().filter(|r| r.outcome.is_failed()).count();
        let processed_count = rows.len() - error_count;

        Self {
            headers,
            rows,
            processed_count,
            error_count,
        }
    }

    pub fn total(&self) -> usize {
        self.rows.len()
    }

    /// Processed rows that got coordinates
    pub fn located_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| matches!(r.outcome, RowOutcome::Located(_)))
            .count()
    }

    /// Processed rows that came back without coordinates
    pub fn not_found_count(&self) -> usize {
        self.processed_count - self.located_count()
    }

    /// Rows whose lookup failed
    pub fn failures(&self) -> impl Iterator<Item = &GeocodedRow> {
        self.rows.iter().filter(|r| r.outcome.is_failed())
    }
}

/// Geocode every row of `sheet` in order.
///
/// `on_progress(completed, total)` is called after each row, whatever its
/// outcome.
pub async fn process<G, F>(geocoder: &G, sheet: &AddressSheet, mut on_progress: F) -> BatchResult
where
    G: Geocoder + ?Sized,
    F: FnMut(usize, usize),
{
    let total = sheet.len();
    let mut rows = Vec::with_capacity(total);

    log::info!("Geocoding {} addresses", total);

    for (address, cells) in sheet.rows() {
        let outcome = match geocoder.lookup(&address.formatted()).await {
            Ok(LookupOutcome::Found(coordinates)) => RowOutcome::Located(coordinates),
            Ok(LookupOutcome::NoMatch { reason }) => {
                log::info!("Row {}: no location ({})", address.position, reason);
                RowOutcome::NotFound { reason }
            }
            Err(e) => {
                // Surfaced to the user by the summary; a warn here would draw over the progress bar
                log::info!("Error processing row {}: {}", address.position, e);
                RowOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        rows.push(GeocodedRow {
            position: address.position,
            cells: cells.to_vec(),
            outcome,
        });

        on_progress(rows.len(), total);
    }

    let result = BatchResult::from_rows(sheet.table().headers.clone(), rows);

    log::info!(
        "Geocoding finished: {} processed ({} located), {} errors",
        result.processed_count,
        result.located_count(),
        result.error_count
    );

    result
}
