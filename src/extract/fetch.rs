// src/extract/fetch.rs
// =============================================================================
// Fetches the page whose links we want to extract.
// =============================================================================

use anyhow::{anyhow, Context, Result};
use reqwest::{Client, StatusCode};

// Fetches a web page and returns its content
//
// Only a 200 counts as success; anything else is an error carrying the status.
pub async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("failed to fetch {}", url))?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(anyhow!("HTTP error fetching {}: {}", url, status));
    }

    response
        .text()
        .await
        .with_context(|| format!("failed to read response body from {}", url))
}
