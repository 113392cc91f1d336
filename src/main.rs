//! rhyme-sort command line entry point
//!
//! Loads one text file and writes a lexicographically sorted copy and a
//! rhyme-sorted copy of its lines.

use std::process;
use clap::{Arg, ArgAction, Command};
use tracing_subscriber::EnvFilter;

use rhyme_sort::{
    config::{
        SortConfig, SortConfigBuilder, SortMode, DEFAULT_INPUT, DEFAULT_LEX_OUTPUT,
        DEFAULT_RHYME_OUTPUT,
    },
    error::{SortError, SortResult},
    sort,
};

fn main() {
    let result = run();
    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("rhyme-sort: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn run() -> SortResult<i32> {
    let matches = build_cli().get_matches();
    let config = parse_config_from_matches(&matches)?;
    setup_logging(config.verbose)?;
    sort(&config)
}

fn build_cli() -> Command {
    Command::new("rhyme-sort")
        .version(env!("CARGO_PKG_VERSION"))
        .override_usage("rhyme-sort [OPTION]... [INPUT]")
        .about("Sort the lines of a file lexicographically and by rhyme")
        .long_about("Sort the lines of a file twice: once by byte order from the start of each line, and once by rhyme, comparing letters from the end of each line and ignoring punctuation and whitespace.\n\nBoth copies are written from a single in-memory load of INPUT. Use '-' as an output to write to standard output.")

        .arg(Arg::new("input")
            .help("File to sort")
            .value_name("INPUT")
            .default_value(DEFAULT_INPUT))

        .arg(Arg::new("lex-output")
            .short('o')
            .long("lex-output")
            .help("Write the lexicographic ordering to FILE")
            .value_name("FILE")
            .default_value(DEFAULT_LEX_OUTPUT))
        .arg(Arg::new("rhyme-output")
            .short('r')
            .long("rhyme-output")
            .help("Write the rhyme ordering to FILE")
            .value_name("FILE")
            .default_value(DEFAULT_RHYME_OUTPUT))

        .arg(Arg::new("keep-going")
            .short('k')
            .long("keep-going")
            .help("Still produce the remaining output when one cannot be written")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("mmap-threshold")
            .long("mmap-threshold")
            .help("Memory-map inputs of at least SIZE bytes (K, M, G suffixes; 0 disables)")
            .value_name("SIZE"))
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .help("Log load, sort and write progress to stderr")
            .action(ArgAction::SetTrue))
}

/// Parse configuration from command line matches
fn parse_config_from_matches(matches: &clap::ArgMatches) -> SortResult<SortConfig> {
    let mut builder = SortConfigBuilder::new();

    if let Some(input) = matches.get_one::<String>("input") {
        builder = builder.input(input);
    }
    if let Some(lex) = matches.get_one::<String>("lex-output") {
        builder = builder.output(SortMode::Lexicographic, lex);
    }
    if let Some(rhyme) = matches.get_one::<String>("rhyme-output") {
        builder = builder.output(SortMode::Rhyme, rhyme);
    }
    if matches.get_flag("keep-going") {
        builder = builder.keep_going();
    }
    if matches.get_flag("verbose") {
        builder = builder.verbose();
    }

    let mut config = builder.build()?;

    if let Some(threshold) = matches.get_one::<String>("mmap-threshold") {
        config.set_mmap_threshold_from_string(threshold)?;
    }

    Ok(config)
}

/// Install the stderr log subscriber; RUST_LOG overrides the default level
fn setup_logging(verbose: bool) -> SortResult<()> {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("rhyme_sort={level}")))
        .map_err(|e| SortError::invalid_config(&format!("log filter: {e}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| SortError::invalid_config(&format!("logging: {e}")))
}
