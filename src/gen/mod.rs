use anyhow::Result;
use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use rand::Rng;
use std::sync::Arc;

/// Build a `rows` x `cols` table of uniform draws in `[0, 1)`, with columns
/// named `Column1..ColumnN`, from the thread generator.
pub fn random_table(rows: usize, cols: usize) -> Result<RecordBatch> {
    random_table_with(&mut rand::rng(), rows, cols)
}

/// Same as [`random_table`] but drawing from the supplied generator.
pub fn random_table_with<R: Rng>(rng: &mut R, rows: usize, cols: usize) -> Result<RecordBatch> {
    let fields: Vec<Field> = (1..=cols)
        .map(|i| Field::new(format!("Column{}", i), DataType::Float64, false))
        .collect();

    let columns: Vec<ArrayRef> = (0..cols)
        .map(|_| {
            let values = Float64Array::from_iter_values((0..rows).map(|_| rng.random::<f64>()));
            Arc::new(values) as ArrayRef
        })
        .collect();

    let options = RecordBatchOptions::new().with_row_count(Some(rows));
    RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), columns, &options)
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn shape_matches_the_request() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for (rows, cols) in [(0, 0), (0, 3), (5, 0), (5, 5), (3, 1)] {
            let batch = random_table_with(&mut rng, rows, cols).unwrap();
            assert_eq!(batch.num_rows(), rows);
            assert_eq!(batch.num_columns(), cols);
        }
    }

    #[test]
    fn values_are_uniform_in_the_unit_interval() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let batch = random_table_with(&mut rng, 50, 4).unwrap();
        for col in batch.columns() {
            let values = col.as_any().downcast_ref::<Float64Array>().unwrap();
            assert!(values.iter().flatten().all(|v| (0.0..1.0).contains(&v)));
        }
    }

    #[test]
    fn column_names_are_sequential() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let batch = random_table_with(&mut rng, 1, 3).unwrap();
        let names: Vec<&str> = batch
            .schema_ref()
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect();
        assert_eq!(names, vec!["Column1", "Column2", "Column3"]);
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = random_table_with(&mut ChaCha8Rng::seed_from_u64(9), 4, 4).unwrap();
        let b = random_table_with(&mut ChaCha8Rng::seed_from_u64(9), 4, 4).unwrap();
        assert_eq!(a, b);
    }
}
