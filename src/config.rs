// src/config.rs
// =============================================================================
// Run configuration for the checker and the shared HTTP client factory.
//
// Every value comes from the command line (see cli.rs); the defaults here are
// what you get when an optional argument is left out.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::redirect::{Action, Attempt, Policy};
use reqwest::Client;

/// Identifies this tool to the sites it probes.
pub const USER_AGENT: &str = concat!(
    "url-scout/",
    env!("CARGO_PKG_VERSION"),
    " (link liveness checker)"
);

pub const DEFAULT_CONCURRENCY: usize = 5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const MAX_REDIRECTS: usize = 10;

/// What to do when a domain's robots.txt cannot be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RobotsFailMode {
    /// Treat the domain as fully permitted
    #[default]
    Open,
    /// Treat the domain as fully disallowed
    Closed,
}

#[derive(Debug, Clone)]
pub struct CheckerConfig {
    pub concurrency: usize,
    pub timeout: Duration,
    pub user_agent: String,
    pub max_redirects: usize,
    pub robots_fail_mode: RobotsFailMode,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        CheckerConfig {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: USER_AGENT.to_string(),
            max_redirects: MAX_REDIRECTS,
            robots_fail_mode: RobotsFailMode::Open,
        }
    }
}

// Builds the one HTTP client shared by every probe and robots.txt fetch
//
// reqwest::Client keeps a connection pool internally, so cloning it is cheap
// and all workers reuse the same connections.
//
// The timeout set here is the default for robots.txt fetches; probes set
// their own per-request deadline on top of it.
pub fn build_client(config: &CheckerConfig) -> Result<Client> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.timeout)
        .redirect(redirect_policy(config.max_redirects))
        .build()
        .context("failed to build HTTP client")
}

// Follows up to `max` redirects, then fails the request
//
// The failure surfaces as a reqwest error with is_redirect() == true,
// which the probe classifies as TooManyRedirects.
fn redirect_policy(max: usize) -> Policy {
    Policy::custom(move |attempt: Attempt| -> Action {
        if attempt.previous().len() > max {
            attempt.error(format!("stopped after {} redirects", max))
        } else {
            attempt.follow()
        }
    })
}
