use anyhow::Result;
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use std::sync::Arc;
use tracing::warn;

/// A table as it appears in the page markup: header names plus row-aligned
/// string cells, before any typing is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Convert into a batch of nullable Utf8 columns. Rows wider than the
    /// header row are truncated (with a warning); shorter rows pad out with
    /// nulls.
    pub fn into_record_batch(self) -> Result<RecordBatch> {
        if self.rows.iter().any(|r| r.len() > self.headers.len()) {
            warn!(
                "some rows have more cells than the {} headers; extra cells dropped",
                self.headers.len()
            );
        }

        let fields: Vec<Field> = self
            .headers
            .iter()
            .map(|h| Field::new(h.trim(), DataType::Utf8, true))
            .collect();

        let columns: Vec<ArrayRef> = (0..self.headers.len())
            .map(|idx| {
                let col: StringArray = self
                    .rows
                    .iter()
                    .map(|row| row.get(idx).map(String::as_str))
                    .collect();
                Arc::new(col) as ArrayRef
            })
            .collect();

        let options = RecordBatchOptions::new().with_row_count(Some(self.rows.len()));
        RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), columns, &options)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;

    fn table() -> RawTable {
        RawTable {
            headers: vec!["Year".into(), "Population".into()],
            rows: vec![
                vec!["1950".into(), "2499322".into()],
                vec!["1951".into()],
                vec!["1952".into(), "2582869".into(), "surplus".into()],
            ],
        }
    }

    #[test]
    fn ragged_rows_truncate_and_pad() {
        let batch = table().into_record_batch().unwrap();
        assert_eq!(batch.num_rows(), 3);
        assert_eq!(batch.num_columns(), 2);

        let pop = batch
            .column(1)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(pop.value(0), "2499322");
        assert!(pop.is_null(1));
        assert_eq!(pop.value(2), "2582869");
    }

    #[test]
    fn empty_table_converts() {
        let batch = RawTable {
            headers: vec![],
            rows: vec![],
        }
        .into_record_batch()
        .unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.num_columns(), 0);
    }
}
