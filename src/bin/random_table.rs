use anyhow::Result;
use chrono::Local;
use clap::{value_parser, Arg, Command};
use std::env;
use tracing::info;
use wikiscraper::{cli, gen, process};

fn main() -> Result<()> {
    let matches = cli::attach_common_args(Some(
        Command::new("random_table").about("Generate a random table and log it"),
    ))
    .arg(
        Arg::new("rows")
            .long("rows")
            .value_name("N")
            .value_parser(value_parser!(usize))
            .default_value("5")
            .help("Number of rows to generate"),
    )
    .arg(
        Arg::new("cols")
            .long("cols")
            .value_name("N")
            .value_parser(value_parser!(usize))
            .default_value("5")
            .help("Number of columns to generate"),
    )
    .get_matches();

    cli::init_logging(matches.get_flag("debug"));
    info!(started = %Local::now().format("%Y-%m-%d %H:%M:%S"), "startup");
    info!("PATH=\"{}\"", env::var("PATH").unwrap_or_default());

    let rows = matches.get_one::<usize>("rows").copied().unwrap_or(5);
    let cols = matches.get_one::<usize>("cols").copied().unwrap_or(5);

    let batch = gen::random_table(rows, cols)?;
    info!("table contents:\n{}", process::format_batch(&batch)?);

    Ok(())
}
