//! Address extraction and the sequential batch geocoding loop

mod address;
mod batch;

pub use address::{AddressRow, AddressSheet, MissingColumns, REQUIRED_COLUMNS};
pub use batch::{BatchResult, Coordinate, GeocodedRow, RowOutcome, process};
