// src/extract/mod.rs
// =============================================================================
// This module turns a web page into a list of URLs to check.
//
// Submodules:
// - fetch: Downloads the page
// - links: Pulls absolute http/https links out of the HTML
// =============================================================================

mod fetch;
mod links;

pub use fetch::fetch_page;
pub use links::extract_links;
