// src/fetch/page.rs

use anyhow::Result;
use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, error, warn};
use url::Url;

use crate::process::{utils, RawTable};

/// Class marker of the table to extract.
static TABLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("table.wikitable").expect("CSS selector for data tables should be valid")
});
static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("CSS selector for rows should be valid"));
static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("th, td").expect("CSS selector for cells should be valid"));

/// Fetch `url` and extract the first marked table on the page.
///
/// Transport failures, non-success statuses, and pages without the expected
/// table are logged and reported as `None`; nothing is raised to the caller.
/// One attempt only.
pub fn scrape_demographics(client: &Client, url: &str) -> Option<RawTable> {
    let html = match fetch_page(client, url) {
        Ok(html) => html,
        Err(err) => {
            error!("scrape of {} failed: {}", url, err);
            return None;
        }
    };

    let table = extract_first_table(&html);
    if table.is_none() {
        warn!("no wikitable element found at {}", url);
    }
    table
}

fn fetch_page(client: &Client, url: &str) -> Result<String> {
    let url = Url::parse(url)?;
    let body = client.get(url).send()?.error_for_status()?.text()?;
    Ok(body)
}

/// Parse the first `table.wikitable` in `html` into headers plus string
/// rows. The first non-empty row supplies the headers. Returns `None` when
/// no such table exists or it has no header row.
pub fn extract_first_table(html: &str) -> Option<RawTable> {
    let doc = Html::parse_document(html);
    let table = doc.select(&TABLE_SELECTOR).next()?;

    let mut headers: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();

    for tr in table.select(&ROW_SELECTOR) {
        let cells: Vec<String> = tr.select(&CELL_SELECTOR).map(cell_text).collect();
        if cells.is_empty() {
            continue;
        }
        if headers.is_empty() {
            headers = cells;
        } else {
            rows.push(cells);
        }
    }

    if headers.is_empty() {
        return None;
    }
    debug!(
        "extracted table: {} columns, {} rows",
        headers.len(),
        rows.len()
    );
    Some(RawTable { headers, rows })
}

fn cell_text(cell: ElementRef) -> String {
    utils::clean_cell(&cell.text().collect::<String>())
}
