pub mod coerce;
pub mod derive;
pub mod infer;
pub mod raw_table;
pub mod utils;

pub use coerce::apply_column_kinds;
pub use derive::derive_millions;
pub use infer::{infer_column_kinds, ColumnKind, ColumnType};
pub use raw_table::RawTable;
pub use utils::format_batch;
