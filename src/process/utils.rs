use anyhow::Result;
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use once_cell::sync::Lazy;
use regex::Regex;

/// Bracketed footnote markers as found in wiki markup: `[1]`, `[note a]`.
static FOOTNOTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]]*\]").expect("footnote regex should be valid"));

/// 1) Drop footnote markers, then collapse all runs of whitespace.
pub fn clean_cell(raw: &str) -> String {
    let stripped = FOOTNOTE_RE.replace_all(raw, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A numeric cell value, kept integral when the text carries no fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

/// 2) Parse a cleaned cell as a number, tolerating thousands separators.
pub fn parse_number(cell: &str) -> Option<Number> {
    let v = cell.trim().replace(',', "");
    if v.is_empty() {
        return None;
    }
    if let Ok(i) = v.parse::<i64>() {
        return Some(Number::Int(i));
    }
    v.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Number::Float)
}

/// Render a batch as one aligned text table for logging.
pub fn format_batch(batch: &RecordBatch) -> Result<String> {
    Ok(pretty_format_batches(std::slice::from_ref(batch))?.to_string())
}
