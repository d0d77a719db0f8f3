pub mod page;

pub use page::{extract_first_table, scrape_demographics};
