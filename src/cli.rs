// src/cli.rs

use clap::{Arg, ArgAction, Command};
use tracing_subscriber::{fmt, EnvFilter};

/// Attach the flags shared by every binary in this crate to `cmd`,
/// creating a fresh command when none is supplied.
pub fn attach_common_args(cmd: Option<Command>) -> Command {
    cmd.unwrap_or_else(|| Command::new(env!("CARGO_PKG_NAME"))).arg(
        Arg::new("debug")
            .long("debug")
            .action(ArgAction::SetTrue)
            .help("Enable debug logging"),
    )
}

/// Install the global tracing subscriber.
///
/// `debug` widens the default filter from `info` to `debug`; a `RUST_LOG`
/// value overrides both.
pub fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attaches_debug_to_a_fresh_command() {
        let cmd = attach_common_args(None);
        let matches = cmd.try_get_matches_from(["wikiscraper", "--debug"]).unwrap();
        assert!(matches.get_flag("debug"));
    }

    #[test]
    fn extends_an_existing_command() {
        let base = Command::new("custom").arg(
            Arg::new("out")
                .long("out")
                .action(ArgAction::Set)
                .default_value("chart.png"),
        );
        let cmd = attach_common_args(Some(base));
        let matches = cmd.try_get_matches_from(["custom"]).unwrap();
        assert!(!matches.get_flag("debug"));
        assert_eq!(
            matches.get_one::<String>("out").map(String::as_str),
            Some("chart.png")
        );
    }
}
