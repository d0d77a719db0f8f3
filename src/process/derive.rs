use anyhow::{anyhow, Result};
use arrow::array::{Array, ArrayRef, Float64Array};
use arrow::compute;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use std::sync::Arc;
use tracing::debug;

const THOUSANDS_MARKER: &str = "(in thousands)";
const MILLIONS_MARKER: &str = "(in millions)";

/// Append a population-in-millions column derived from the in-thousands
/// column (value / 1000). A batch that already carries a derived column is
/// returned untouched, so the derivation happens at most once per dataset.
pub fn derive_millions(batch: &RecordBatch) -> Result<RecordBatch> {
    let schema = batch.schema();
    if schema.fields().iter().any(|f| f.name().contains(MILLIONS_MARKER)) {
        debug!("derived column already present; leaving batch as is");
        return Ok(batch.clone());
    }

    let (idx, field) = schema
        .fields()
        .iter()
        .enumerate()
        .find(|(_, f)| f.name().contains(THOUSANDS_MARKER))
        .ok_or_else(|| anyhow!("no \"{}\" column to derive from", THOUSANDS_MARKER))?;

    let thousands = compute::cast(batch.column(idx).as_ref(), &DataType::Float64)?;
    let thousands = thousands
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| anyhow!("expected a Float64 array after cast"))?;
    let millions: Float64Array = thousands.iter().map(|o| o.map(|v| v / 1000.0)).collect();

    let name = field.name().replace(THOUSANDS_MARKER, MILLIONS_MARKER);
    let mut fields: Vec<Arc<Field>> = schema.fields().iter().cloned().collect();
    fields.push(Arc::new(Field::new(name, DataType::Float64, true)));
    let mut columns: Vec<ArrayRef> = batch.columns().to_vec();
    columns.push(Arc::new(millions));

    let options = RecordBatchOptions::new().with_row_count(Some(batch.num_rows()));
    RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), columns, &options)
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::raw_table::RawTable;
    use arrow::array::Array;

    fn population() -> RecordBatch {
        RawTable {
            headers: vec!["Year".into(), "World Population (in thousands)".into()],
            rows: vec![
                vec!["1950".into(), "1000".into()],
                vec!["1951".into(), "2000".into()],
            ],
        }
        .into_record_batch()
        .unwrap()
    }

    #[test]
    fn thousands_divide_into_millions() {
        let derived = derive_millions(&population()).unwrap();
        assert_eq!(derived.num_columns(), 3);

        let idx = derived
            .schema()
            .index_of("World Population (in millions)")
            .unwrap();
        let millions = derived.column(idx).clone();
        let millions = millions.as_any().downcast_ref::<Float64Array>().unwrap();
        assert_eq!(millions.value(0), 1.0);
        assert_eq!(millions.value(1), 2.0);
    }

    #[test]
    fn derivation_happens_at_most_once() {
        let once = derive_millions(&population()).unwrap();
        let twice = derive_millions(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn missing_source_column_is_an_error() {
        let batch = RawTable {
            headers: vec!["Year".into()],
            rows: vec![vec!["1950".into()]],
        }
        .into_record_batch()
        .unwrap();
        assert!(derive_millions(&batch).is_err());
    }
}
