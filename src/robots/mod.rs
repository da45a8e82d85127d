// src/robots/mod.rs
// =============================================================================
// This module decides whether robots.txt lets us request a URL.
//
// Submodules:
// - policy: Parses a robots.txt body into a list of disallowed path prefixes
// - cache: Fetches robots.txt once per domain and shares the parsed policy
//   between all concurrent checks
//
// Only the wildcard `User-agent: *` block is honored, because this tool does
// not announce a crawler token of its own.
// =============================================================================

mod cache;
mod policy;

pub use cache::RobotsCache;
