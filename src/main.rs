use anyhow::Result;
use chrono::Local;
use clap::{Arg, Command};
use std::{env, path::PathBuf};
use tracing::{debug, info};
use wikiscraper::{cli, fetch, plot, process};

/// Page carrying the historical vital statistics table.
const DEMOGRAPHICS_URL: &str = "https://en.wikipedia.org/wiki/Demographics_of_the_world";

fn main() -> Result<()> {
    // ─── 1) arguments + logging ──────────────────────────────────────
    let matches = cli::attach_common_args(Some(
        Command::new("wikiscraper")
            .about("Scrape the world demographics table, chart it, log it"),
    ))
    .arg(
        Arg::new("out")
            .long("out")
            .value_name("PATH")
            .default_value("world_population.png")
            .help("Where to write the rendered chart"),
    )
    .get_matches();

    cli::init_logging(matches.get_flag("debug"));
    info!(started = %Local::now().format("%Y-%m-%d %H:%M:%S"), "startup");
    info!("PATH=\"{}\"", env::var("PATH").unwrap_or_default());

    // ─── 2) scrape ───────────────────────────────────────────────────
    let client = reqwest::blocking::Client::new();
    let Some(raw) = fetch::scrape_demographics(&client, DEMOGRAPHICS_URL) else {
        info!("no demographics table available; nothing to do");
        return Ok(());
    };

    // ─── 3) type + derive ────────────────────────────────────────────
    let batch = raw.into_record_batch()?;
    let kinds = process::infer_column_kinds(&batch);
    debug!("inferred column kinds: {}", serde_json::to_string(&kinds)?);
    let batch = process::apply_column_kinds(&batch, &kinds)?;
    let batch = process::derive_millions(&batch)?;

    // ─── 4) chart + log ──────────────────────────────────────────────
    let out = PathBuf::from(
        matches
            .get_one::<String>("out")
            .map(String::as_str)
            .unwrap_or("world_population.png"),
    );
    plot::render_population_chart(&batch, &out)?;
    info!("demographics table:\n{}", process::format_batch(&batch)?);

    Ok(())
}
