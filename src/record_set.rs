//! In-memory representation of one input table.
//!
//! A `RecordSet` keeps every cell as the string found in the file so the
//! report can reproduce the input sheets untouched, while the pipeline pulls
//! typed views out of it through `loader`.
use crate::error::{ReportError, Result};
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RecordSet {
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        RecordSet {
            name: name.into(),
            headers,
            rows,
        }
    }

    pub fn from_path(name: &str, path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| ReportError::io(path, e))?;
        Self::from_reader(name, file)
    }

    /// Read a header line followed by data rows. Cells are kept verbatim;
    /// rows whose field count differs from the header are rejected.
    pub fn from_reader<R: Read>(name: &str, reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new().from_reader(reader);
        let headers = rdr.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for result in rdr.records() {
            let record: StringRecord = result?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(RecordSet::new(name, headers, rows))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    /// Resolve the positions of the given columns, failing on the first one
    /// absent from the header.
    pub fn require_columns<const N: usize>(&self, names: [&str; N]) -> Result<[usize; N]> {
        let mut idx = [0usize; N];
        for (slot, name) in idx.iter_mut().zip(names) {
            *slot = self.column(name).ok_or_else(|| ReportError::MissingColumn {
                table: self.name.clone(),
                column: name.to_string(),
            })?;
        }
        Ok(idx)
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(&self.headers)?;
        for r in &self.rows {
            wtr.write_record(r)?;
        }
        wtr.flush().map_err(|e| ReportError::io(path, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCTS: &str = "product_id,name, criticality_weight\nP1,Billing,2\nP2, Search ,1\n";

    #[test]
    fn reads_headers_and_verbatim_cells() {
        let set = RecordSet::from_reader("Products", PRODUCTS.as_bytes()).unwrap();
        assert_eq!(set.headers, vec!["product_id", "name", " criticality_weight"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.cell(1, 1), " Search ");
        assert_eq!(set.cell(9, 9), "");
    }

    #[test]
    fn require_columns_reports_first_missing() {
        let set = RecordSet::from_reader("Products", PRODUCTS.as_bytes()).unwrap();
        let [id, weight] = set.require_columns(["product_id", "criticality_weight"]).unwrap();
        assert_eq!((id, weight), (0, 2));

        let err = set.require_columns(["product_id", "owner"]).unwrap_err();
        match err {
            ReportError::MissingColumn { table, column } => {
                assert_eq!(table, "Products");
                assert_eq!(column, "owner");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = RecordSet::from_reader("Scores", "a,b\n1,2,3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ReportError::Csv(_)));
    }
}
