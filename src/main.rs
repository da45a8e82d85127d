// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr)
// 3. Dispatch to the `extract` or `check` handler
// 4. Exit with proper code (0 = success, 1 = usage or fatal error)
//
// Note: offline URLs do NOT change the exit code of `check`. A run that
// managed to check every URL succeeded, whatever the verdicts were.
// =============================================================================

mod checker;
mod cli;
mod config;
mod encoding;
mod extract;
mod input;
mod logging;
mod models;
mod report;
mod robots;

#[cfg(test)]
mod test_support;

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use tracing::{debug, info, warn};
use url::Url;

use checker::LivenessProbe;
use cli::{Cli, Commands};
use config::{build_client, CheckerConfig, RobotsFailMode};
use models::UrlList;
use report::Reporter;
use robots::RobotsCache;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are not failures
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    logging::init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Extract { url, output } => handle_extract(&url, output.as_deref()).await,
        Commands::Check {
            file,
            concurrency,
            timeout,
            json,
            strict_robots,
        } => {
            let config = CheckerConfig {
                concurrency,
                timeout: Duration::from_secs(timeout),
                robots_fail_mode: if strict_robots {
                    RobotsFailMode::Closed
                } else {
                    RobotsFailMode::Open
                },
                ..CheckerConfig::default()
            };
            handle_check(&file, &config, json).await
        }
    }
}

// Handles the 'extract' subcommand
//
// Parameters:
//   target: page to fetch (must be http or https)
//   output: where to write the JSON (stdout when None)
async fn handle_extract(target: &str, output: Option<&Path>) -> Result<i32> {
    let url = Url::parse(target).with_context(|| format!("invalid URL '{}'", target))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("invalid URL '{}': only http and https are supported", target);
    }

    let config = CheckerConfig::default();
    let client = build_client(&config)?;
    let robots = RobotsCache::new(client.clone(), config.robots_fail_mode);

    info!(url = target, "checking robots.txt");
    match robots.is_allowed(target).await {
        Ok(true) => {}
        Ok(false) => bail!("access to {} is disallowed by robots.txt", target),
        Err(e) => warn!(error = %e, "could not check robots.txt, proceeding"),
    }

    info!(url = target, "fetching content");
    let content = extract::fetch_page(&client, target).await?;

    info!("extracting URLs");
    let links = extract::extract_links(&content, target);
    let list = UrlList::new(target, links);

    let json_output = serde_json::to_string_pretty(&list)?;
    match output {
        Some(path) => {
            fs::write(path, format!("{}\n", json_output))
                .with_context(|| format!("error writing {}", path.display()))?;
            info!(path = %path.display(), "wrote URL list");
        }
        None => println!("{}", json_output),
    }

    info!(count = list.count, "total URLs found");
    Ok(0)
}

// Handles the 'check' subcommand
//
// Parameters:
//   file: URL list from `extract` (falls back to urldata/<file>)
//   config: concurrency, timeout and robots.txt handling
//   json: print a JSON array instead of the streaming report
async fn handle_check(file: &Path, config: &CheckerConfig, json: bool) -> Result<i32> {
    let path = input::resolve_input_path(file);
    info!(path = %path.display(), "reading URL list");
    let list = input::load_url_list(&path)?;

    info!(
        urls = list.extracted_urls.len(),
        workers = config.concurrency,
        timeout_secs = config.timeout.as_secs(),
        "checking URLs"
    );

    let probe = build_probe(config)?;
    let start = Instant::now();

    if json {
        let outcomes = checker::collect_all(
            Arc::clone(&probe),
            list.extracted_urls,
            config.concurrency,
            config.timeout,
        )
        .await;
        report::print_json(&outcomes)?;
    } else {
        let mut results_rx = checker::check_all(
            Arc::clone(&probe),
            list.extracted_urls,
            config.concurrency,
            config.timeout,
        );

        let mut reporter = Reporter::new();
        reporter.print_header();
        while let Some(outcome) = results_rx.recv().await {
            reporter.record(&outcome);
        }
        reporter.print_summary(start.elapsed());
    }

    debug!(
        domains = probe.robots().len().await,
        "robots.txt policies cached this run"
    );
    Ok(0)
}

// Builds the per-run client, robots.txt cache and probe
//
// The cache lives exactly as long as the probe: one run, no global state.
fn build_probe(config: &CheckerConfig) -> Result<Arc<LivenessProbe>> {
    let client = build_client(config)?;
    let robots = Arc::new(RobotsCache::new(client.clone(), config.robots_fail_mode));
    Ok(Arc::new(LivenessProbe::new(client, robots)))
}
