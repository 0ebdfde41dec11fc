//! Excel import of address tables and export of geocoded results

mod cell;
mod reader;
mod table;
mod writer;

pub use cell::CellValue;
pub use reader::{read_table, read_table_from_bytes};
pub use table::Table;
pub use writer::{SHEET_NAME, cols, write_batch_result};
