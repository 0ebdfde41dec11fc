//! In-memory table read from the first worksheet of a workbook

use super::CellValue;

/// Header names plus rows of cells, in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();

        Self { headers, rows }
    }

    /// Number of data rows (header excluded)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by exact header name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Names from `required` that have no matching header, in `required` order
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|name| self.column_index(name).is_none())
            .map(|name| name.to_string())
            .collect()
    }

    /// First `limit` rows
    pub fn head(&self, limit: usize) -> &[Vec<CellValue>] {
        &self.rows[..self.rows.len().min(limit)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::String(s.to_string())
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = Table::new(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec![vec![text("1")]],
        );

        assert_eq!(table.rows[0].len(), 3);
        assert!(table.rows[0][2].is_empty());
    }

    #[test]
    fn test_missing_columns_keeps_required_order() {
        let table = Table::new(vec!["zip".to_string(), "address1".to_string()], vec![]);

        let missing = table.missing_columns(&["address1", "city", "sta", "zip"]);
        assert_eq!(missing, vec!["city".to_string(), "sta".to_string()]);
    }

    #[test]
    fn test_column_match_is_exact() {
        let table = Table::new(vec!["City".to_string()], vec![]);
        assert!(table.column_index("city").is_none());
    }

    #[test]
    fn test_head_is_bounded() {
        let rows = (0..25).map(|i| vec![CellValue::Int(i)]).collect();
        let table = Table::new(vec!["n".to_string()], rows);

        assert_eq!(table.head(10).len(), 10);
        assert_eq!(table.head(100).len(), 25);
    }
}
