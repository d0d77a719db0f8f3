//! Scrape demographic tables from the web, type them, chart them, log them.

pub mod cli;
pub mod fetch;
pub mod gen;
pub mod plot;
pub mod process;
