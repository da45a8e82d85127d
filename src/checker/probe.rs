// src/checker/probe.rs
// =============================================================================
// This module checks if a single URL is alive by making an HTTP request.
//
// Key functionality:
// - Asks the robots.txt cache first; a disallowed URL is never requested
// - Makes one GET request (no retries) bounded by a timeout
// - Follows up to 10 redirects (configured on the client, see config.rs)
// - Turns every failure into a value inside the Outcome, never a panic
//
// Rust concepts:
// - async/await: For network I/O
// - Arc: The robots cache is shared by all workers
// - Error source chains: To find out WHY a request failed
// =============================================================================

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Response};
use tracing::debug;
use url::Url;

use crate::models::{Outcome, ProbeError};
use crate::robots::RobotsCache;

// Probes URLs with a shared client and a shared robots.txt cache
//
// One LivenessProbe is built per run and handed to every worker.
pub struct LivenessProbe {
    client: Client,
    robots: Arc<RobotsCache>,
}

impl LivenessProbe {
    pub fn new(client: Client, robots: Arc<RobotsCache>) -> Self {
        LivenessProbe { client, robots }
    }

    pub fn robots(&self) -> &RobotsCache {
        &self.robots
    }

    // Probes one URL
    //
    // Parameters:
    //   url: the URL to check (anything; malformed input becomes InvalidUrl)
    //   timeout: overall deadline for the request, redirects included
    //
    // Returns: an Outcome, always; failures are encoded inside it
    pub async fn probe(&self, url: &str, timeout: Duration) -> Outcome {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                return Outcome::failed(
                    url,
                    ProbeError::InvalidUrl {
                        detail: format!("{}: {}", url, e),
                    },
                )
            }
        };

        match self.robots.is_allowed_url(&parsed).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(url, "blocked by robots.txt");
                return Outcome::failed(url, ProbeError::PolicyDisallowed);
            }
            Err(e) => return Outcome::failed(url, e),
        }

        let response = match self.client.get(parsed).timeout(timeout).send().await {
            Ok(response) => response,
            Err(e) => {
                let error = categorize_error(&e);
                debug!(url, %error, "request failed");
                return Outcome::failed(url, error);
            }
        };

        let status = response.status();
        if let Err(e) = drain(response).await {
            // The status line already arrived, which is all we judge on
            debug!(url, error = %e, "failed to drain response body");
        }

        debug!(url, status = status.as_u16(), "probe finished");
        Outcome::reached(url, status)
    }
}

// Reads the body to the end and throws it away
//
// Finishing the body lets the connection go back to the pool for reuse.
async fn drain(mut response: Response) -> reqwest::Result<()> {
    while response.chunk().await?.is_some() {}
    Ok(())
}

// Categorizes different error types from reqwest
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure
// - SSL certificate issues
// - Too many redirects
// - etc.
fn categorize_error(error: &reqwest::Error) -> ProbeError {
    if error.is_redirect() {
        return ProbeError::TooManyRedirects;
    }

    // reqwest's own message is generic ("error sending request"); the useful
    // part is further down the source chain
    let chain = error_chain(error);
    let lowered = chain.to_lowercase();

    let detail = if error.is_timeout() {
        "request timed out".to_string()
    } else if lowered.contains("dns") || lowered.contains("failed to lookup") {
        format!("could not resolve hostname ({})", chain)
    } else if lowered.contains("certificate") || lowered.contains("tls") {
        format!("TLS error ({})", chain)
    } else if error.is_connect() {
        format!("connection failed ({})", chain)
    } else {
        chain
    };

    ProbeError::Network { detail }
}

// Joins an error and all of its sources into one line
fn error_chain(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why GET and not HEAD?
//    - Plenty of servers answer HEAD with 405 or 404 while GET works fine
//    - GET gives the status a browser would see
//
// 2. Why is a 404 not an error?
//    - The server was reached and answered; that is a verdict, not a failure
//    - `error` is reserved for "could not find out" (network, policy, URL)
//
// 3. Where does the redirect limit live?
//    - On the client's redirect policy (config.rs), so it applies to every
//      request the client sends
// -----------------------------------------------------------------------------
