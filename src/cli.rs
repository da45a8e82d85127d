// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
//   url-scout extract <URL> [--output FILE]
//   url-scout check <FILE> [CONCURRENCY] [TIMEOUT] [--json] [--strict-robots]
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
// =============================================================================

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_SECS};

#[derive(Parser, Debug)]
#[command(
    name = "url-scout",
    version,
    about = "Extract links from a web page and check which ones are alive",
    long_about = "url-scout extracts the outbound links of a web page into a JSON file, \
                  then checks every URL in that file concurrently while respecting robots.txt."
)]
pub struct Cli {
    /// Show debug logs on stderr (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a page and write its links as JSON
    ///
    /// Example: url-scout extract https://example.com --output urldata/example.json
    Extract {
        /// Page to extract links from (http or https)
        url: String,

        /// Write the JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check every URL of an extracted JSON file
    ///
    /// Example: url-scout check example.json 10 5
    Check {
        /// JSON file from `extract` (also looked up under urldata/)
        file: PathBuf,

        /// Number of concurrent workers
        #[arg(default_value_t = DEFAULT_CONCURRENCY, value_parser = parse_concurrency)]
        concurrency: usize,

        /// Per-URL timeout in seconds
        #[arg(default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: u64,

        /// Print the results as a JSON array instead of a report
        #[arg(long)]
        json: bool,

        /// Treat an unreachable robots.txt as "disallow everything"
        #[arg(long)]
        strict_robots: bool,
    },
}

fn parse_concurrency(value: &str) -> Result<usize, String> {
    let workers: usize = value
        .parse()
        .map_err(|_| format!("'{}' is not a whole number", value))?;
    if workers == 0 {
        return Err("concurrency must be at least 1".to_string());
    }
    Ok(workers)
}
