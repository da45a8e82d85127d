// src/models.rs
// =============================================================================
// Data types shared by the extractor and the checker.
//
// - UrlList: the JSON document written by `extract` and read by `check`
// - Outcome: the result of probing one URL
// - ProbeError: why a probe could not produce a usable HTTP status
//
// Rust concepts:
// - serde derives: To read and write JSON without hand-written parsing
// - thiserror: To turn an enum into a proper std::error::Error
// =============================================================================

use std::collections::BTreeSet;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// The exchange document between the two subcommands
//
// Field names match the file format exactly:
//   {"source_url": "...", "extracted_urls": [...], "count": 2}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlList {
    pub source_url: String,
    pub extracted_urls: Vec<String>,
    pub count: usize,
}

impl UrlList {
    /// Builds a list from an extracted set; `count` always matches the set size.
    pub fn new(source_url: impl Into<String>, urls: BTreeSet<String>) -> Self {
        let extracted_urls: Vec<String> = urls.into_iter().collect();
        UrlList {
            source_url: source_url.into(),
            count: extracted_urls.len(),
            extracted_urls,
        }
    }
}

/// Why a single probe failed to reach a verdict.
///
/// A reachable server answering 404 or 500 is NOT an error: that is an
/// Outcome with `online == false` and the real status code.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbeError {
    /// The URL could not be parsed
    #[error("invalid URL: {detail}")]
    InvalidUrl { detail: String },

    /// robots.txt disallows the path; no request was sent
    #[error("disallowed by robots.txt")]
    PolicyDisallowed,

    /// DNS, connect, timeout or other transport failure
    #[error("network error: {detail}")]
    Network { detail: String },

    /// The redirect chain exceeded the hop limit
    #[error("too many redirects")]
    TooManyRedirects,
}

// The result record for one probed URL
//
// Only built through `Outcome::reached` and `Outcome::failed`, which keep
// the online/error invariants in one place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub url: String,
    pub status_code: u16,
    pub status_text: String,
    pub online: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ProbeError>,
}

impl Outcome {
    // The server answered: online iff the status is in [200, 400)
    pub fn reached(url: impl Into<String>, status: StatusCode) -> Self {
        let code = status.as_u16();
        Outcome {
            url: url.into(),
            status_code: code,
            status_text: status.to_string(),
            online: (200..400).contains(&code),
            error: None,
        }
    }

    // The probe could not complete or was blocked; status is meaningless
    pub fn failed(url: impl Into<String>, error: ProbeError) -> Self {
        Outcome {
            url: url.into(),
            status_code: 0,
            status_text: String::new(),
            online: false,
            error: Some(error),
        }
    }
}
