use arrow::array::{Array, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};

use super::utils;

/// Broad kind of a column's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Text,
    Opaque,
}

/// A column name paired with its classified kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnType {
    pub column: String,
    pub kind: ColumnKind,
}

/// Classify every column of `batch`.
///
/// Columns already carrying a numeric Arrow type are Numeric outright. Utf8
/// columns are classified from their non-empty cleaned cells:
///  - every cell numeric → Numeric
///  - no cell numeric → Text
///  - a mix, or no non-empty cells at all → Opaque
///
/// Coercion consumes this result verbatim, so the two passes share one
/// notion of a column's kind.
pub fn infer_column_kinds(batch: &RecordBatch) -> Vec<ColumnType> {
    batch
        .schema()
        .fields()
        .iter()
        .zip(batch.columns())
        .map(|(field, array)| {
            let kind = match field.data_type() {
                dt if dt.is_numeric() => ColumnKind::Numeric,
                DataType::Utf8 => match array.as_any().downcast_ref::<StringArray>() {
                    Some(strings) => classify_strings(strings),
                    None => ColumnKind::Opaque,
                },
                _ => ColumnKind::Opaque,
            };
            ColumnType {
                column: field.name().clone(),
                kind,
            }
        })
        .collect()
}

fn classify_strings(array: &StringArray) -> ColumnKind {
    let mut saw_numeric = false;
    let mut saw_text = false;

    for cell in array.iter().flatten() {
        let cleaned = utils::clean_cell(cell);
        if cleaned.is_empty() {
            continue;
        }
        if utils::parse_number(&cleaned).is_some() {
            saw_numeric = true;
        } else {
            saw_text = true;
        }
    }

    match (saw_numeric, saw_text) {
        (true, false) => ColumnKind::Numeric,
        (false, true) => ColumnKind::Text,
        // mixed samples, or nothing to sample
        _ => ColumnKind::Opaque,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, Float64Array};
    use arrow::datatypes::{Field, Schema};
    use std::sync::Arc;

    fn string_col(name: &str, values: &[Option<&str>]) -> (Field, ArrayRef) {
        let arr: StringArray = values.iter().copied().collect();
        (
            Field::new(name, DataType::Utf8, true),
            Arc::new(arr) as ArrayRef,
        )
    }

    fn batch_of(cols: Vec<(Field, ArrayRef)>) -> RecordBatch {
        let (fields, arrays): (Vec<_>, Vec<_>) = cols.into_iter().unzip();
        RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).unwrap()
    }

    #[test]
    fn classifies_integer_text_and_mixed_columns() {
        let batch = batch_of(vec![
            string_col("ints", &[Some("1950"), Some("2,499,322"), None]),
            string_col("words", &[Some("world"), Some("population"), None]),
            string_col("mixed", &[Some("1950"), Some("unknown"), None]),
            string_col("blank", &[None, Some("  "), None]),
        ]);

        let kinds = infer_column_kinds(&batch);
        assert_eq!(kinds[0].kind, ColumnKind::Numeric);
        assert_eq!(kinds[1].kind, ColumnKind::Text);
        assert_eq!(kinds[2].kind, ColumnKind::Opaque);
        assert_eq!(kinds[3].kind, ColumnKind::Opaque);
    }

    #[test]
    fn typed_numeric_columns_are_numeric() {
        let arr = Float64Array::from_iter_values([0.1, 0.7]);
        let batch = batch_of(vec![(
            Field::new("Column1", DataType::Float64, false),
            Arc::new(arr) as ArrayRef,
        )]);

        let kinds = infer_column_kinds(&batch);
        assert_eq!(
            kinds,
            vec![ColumnType {
                column: "Column1".into(),
                kind: ColumnKind::Numeric,
            }]
        );
    }
}
