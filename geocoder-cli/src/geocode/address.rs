//! Address rows extracted from an uploaded table

use crate::workbook::{CellValue, Table};

/// Columns an upload must have, in the order they are reported when missing
pub const REQUIRED_COLUMNS: [&str; 4] = ["address1", "city", "sta", "zip"];

/// Upload rejected because required columns are absent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingColumns(pub Vec<String>);

impl std::fmt::Display for MissingColumns {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Missing required columns: {}", self.0.join(", "))
    }
}

impl std::error::Error for MissingColumns {}

/// One physical address, as text pulled from its row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRow {
    /// 1-based position in the upload
    pub position: usize,
    pub address1: String,
    pub city: String,
    pub state_abbreviation: String,
    pub zip: String,
}

impl AddressRow {
    /// `address1, city, state, zip` with no escaping or normalization
    pub fn formatted(&self) -> String {
        format!(
            "{}, {}, {}, {}",
            self.address1, self.city, self.state_abbreviation, self.zip
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct AddressColumns {
    address1: usize,
    city: usize,
    state: usize,
    zip: usize,
}

/// A table known to contain every required column
#[derive(Debug, Clone)]
pub struct AddressSheet {
    table: Table,
    columns: AddressColumns,
}

impl AddressSheet {
    /// Validate a table. Nothing is kept when columns are missing.
    pub fn try_from_table(table: Table) -> Result<Self, MissingColumns> {
        let missing = table.missing_columns(&REQUIRED_COLUMNS);
        if !missing.is_empty() {
            return Err(MissingColumns(missing));
        }

        let index = |name: &str| table.column_index(name).unwrap_or_default();
        let columns = AddressColumns {
            address1: index(REQUIRED_COLUMNS[0]),
            city: index(REQUIRED_COLUMNS[1]),
            state: index(REQUIRED_COLUMNS[2]),
            zip: index(REQUIRED_COLUMNS[3]),
        };

        Ok(Self { table, columns })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Address rows in upload order, each paired with its full row of cells
    pub fn rows(&self) -> impl Iterator<Item = (AddressRow, &[CellValue])> + '_ {
        self.table.rows.iter().enumerate().map(|(index, cells)| {
            let text = |col: usize| {
                cells
                    .get(col)
                    .map(CellValue::to_address_text)
                    .unwrap_or_else(|| CellValue::Empty.to_address_text())
            };

            let address = AddressRow {
                position: index + 1,
                address1: text(self.columns.address1),
                city: text(self.columns.city),
                state_abbreviation: text(self.columns.state),
                zip: text(self.columns.zip),
            };

            (address, cells.as_slice())
        })
    }
}
