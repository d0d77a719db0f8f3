use anyhow::{anyhow, Result};
use arrow::array::{Array, ArrayRef, Float32Array, Float64Array, Int64Array, StringArray};
use arrow::compute;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use std::sync::Arc;
use tracing::error;

use super::infer::{ColumnKind, ColumnType};
use super::utils::{self, Number};

/// Rebuild `batch` with every column narrowed to its classified kind.
///
/// A column that fails to coerce is logged and carried over unchanged; the
/// remaining columns are still processed.
pub fn apply_column_kinds(batch: &RecordBatch, kinds: &[ColumnType]) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(batch.num_columns());
    let mut columns = Vec::with_capacity(batch.num_columns());

    for (field, array) in batch.schema().fields().iter().zip(batch.columns()) {
        let kind = kinds
            .iter()
            .find(|k| k.column == *field.name())
            .map(|k| k.kind)
            .unwrap_or(ColumnKind::Opaque);

        match coerce_column(array, kind) {
            Ok(coerced) => {
                fields.push(Field::new(field.name(), coerced.data_type().clone(), true));
                columns.push(coerced);
            }
            Err(err) => {
                error!("could not coerce column {}: {}", field.name(), err);
                fields.push(field.as_ref().clone());
                columns.push(array.clone());
            }
        }
    }

    let options = RecordBatchOptions::new().with_row_count(Some(batch.num_rows()));
    RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), columns, &options)
        .map_err(Into::into)
}

/// Narrow a single column to `kind`.
pub fn coerce_column(array: &ArrayRef, kind: ColumnKind) -> Result<ArrayRef> {
    match kind {
        ColumnKind::Opaque => Ok(array.clone()),
        ColumnKind::Text => coerce_text(array),
        ColumnKind::Numeric => coerce_numeric(array),
    }
}

/// Force a uniform cleaned string representation.
fn coerce_text(array: &ArrayRef) -> Result<ArrayRef> {
    let strings = match array.data_type() {
        DataType::Utf8 => array.clone(),
        _ => compute::cast(array.as_ref(), &DataType::Utf8)?,
    };
    let strings = strings
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| anyhow!("expected a Utf8 array after cast"))?;
    let cleaned: StringArray = strings.iter().map(|opt| opt.map(utils::clean_cell)).collect();
    Ok(Arc::new(cleaned))
}

fn coerce_numeric(array: &ArrayRef) -> Result<ArrayRef> {
    match array.data_type() {
        DataType::Utf8 => {
            let strings = array
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| anyhow!("expected a Utf8 array"))?;
            parse_string_numbers(strings)
        }
        dt if dt.is_integer() => {
            let wide = compute::cast(array.as_ref(), &DataType::Int64)?;
            let ints = wide
                .as_any()
                .downcast_ref::<Int64Array>()
                .ok_or_else(|| anyhow!("expected an Int64 array after cast"))?;
            narrow_ints(ints)
        }
        DataType::Float64 => {
            let floats = array
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| anyhow!("expected a Float64 array"))?;
            Ok(narrow_floats(floats))
        }
        DataType::Float16 | DataType::Float32 => Ok(array.clone()),
        dt => Err(anyhow!("cannot coerce {} to a numeric column", dt)),
    }
}

/// Parse every non-empty cell, then build the narrowest array that holds
/// them: an integer array when no cell carries a fraction, a float array
/// otherwise. Empty cells become nulls; a non-numeric cell is an error.
fn parse_string_numbers(strings: &StringArray) -> Result<ArrayRef> {
    let mut values: Vec<Option<Number>> = Vec::with_capacity(strings.len());
    let mut all_int = true;

    for opt in strings.iter() {
        let cleaned = opt.map(utils::clean_cell).unwrap_or_default();
        if cleaned.is_empty() {
            values.push(None);
            continue;
        }
        let number = utils::parse_number(&cleaned)
            .ok_or_else(|| anyhow!("cell {:?} is not numeric", cleaned))?;
        if matches!(number, Number::Float(_)) {
            all_int = false;
        }
        values.push(Some(number));
    }

    if all_int {
        let ints = Int64Array::from(
            values
                .iter()
                .map(|v| match v {
                    Some(Number::Int(i)) => Some(*i),
                    _ => None,
                })
                .collect::<Vec<_>>(),
        );
        narrow_ints(&ints)
    } else {
        let floats = Float64Array::from(
            values
                .iter()
                .map(|v| match v {
                    Some(Number::Int(i)) => Some(*i as f64),
                    Some(Number::Float(f)) => Some(*f),
                    None => None,
                })
                .collect::<Vec<_>>(),
        );
        Ok(narrow_floats(&floats))
    }
}

fn narrow_ints(ints: &Int64Array) -> Result<ArrayRef> {
    let mut bounds: Option<(i64, i64)> = None;
    for v in ints.iter().flatten() {
        bounds = Some(match bounds {
            None => (v, v),
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
        });
    }
    let (min, max) = bounds.unwrap_or((0, 0));

    let target = narrowest_int_type(min, max);
    if target == DataType::Int64 {
        Ok(Arc::new(ints.clone()))
    } else {
        compute::cast(ints, &target).map_err(Into::into)
    }
}

fn narrowest_int_type(min: i64, max: i64) -> DataType {
    if min >= i8::MIN as i64 && max <= i8::MAX as i64 {
        DataType::Int8
    } else if min >= i16::MIN as i64 && max <= i16::MAX as i64 {
        DataType::Int16
    } else if min >= i32::MIN as i64 && max <= i32::MAX as i64 {
        DataType::Int32
    } else {
        DataType::Int64
    }
}

/// Downcast to Float32 only when every value round-trips exactly.
fn narrow_floats(floats: &Float64Array) -> ArrayRef {
    let lossless = floats.iter().flatten().all(|v| f64::from(v as f32) == v);
    if lossless {
        let narrowed: Float32Array = floats.iter().map(|o| o.map(|v| v as f32)).collect();
        Arc::new(narrowed)
    } else {
        Arc::new(floats.clone())
    }
}
