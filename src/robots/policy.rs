// src/robots/policy.rs
// =============================================================================
// Parsing robots.txt into a per-domain policy.
//
// Format handled (one directive per line):
//   # comment
//   User-agent: *
//   Disallow: /private
//
// Anything we don't understand (Allow, Crawl-delay, Sitemap, ...) is ignored.
// =============================================================================

use crate::config::RobotsFailMode;

// A domain's parsed robots.txt rules
//
// `fetched` is true when robots.txt was actually answered (200 or 404) and
// false when it could not be retrieved at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotsPolicy {
    pub disallowed_prefixes: Vec<String>,
    pub fetched: bool,
}

impl RobotsPolicy {
    // Parses a robots.txt body
    //
    // Only lines inside a `User-agent: *` block contribute. Disallow values
    // are kept verbatim, empty ones included.
    pub fn parse(body: &str) -> Self {
        let mut policy = RobotsPolicy {
            disallowed_prefixes: Vec::new(),
            fetched: true,
        };
        let mut relevant = false;

        for line in body.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "user-agent" => relevant = value == "*",
                "disallow" if relevant => policy.disallowed_prefixes.push(value.to_string()),
                _ => {}
            }
        }

        policy
    }

    /// robots.txt answered 404: explicitly nothing is disallowed.
    pub fn not_found() -> Self {
        RobotsPolicy {
            disallowed_prefixes: Vec::new(),
            fetched: true,
        }
    }

    /// robots.txt could not be retrieved.
    pub fn unavailable(mode: RobotsFailMode) -> Self {
        let disallowed_prefixes = match mode {
            RobotsFailMode::Open => Vec::new(),
            RobotsFailMode::Closed => vec!["/".to_string()],
        };
        RobotsPolicy {
            disallowed_prefixes,
            fetched: false,
        }
    }

    // A path is allowed unless it starts with a non-empty disallowed prefix
    pub fn allows(&self, path: &str) -> bool {
        !self
            .disallowed_prefixes
            .iter()
            .filter(|prefix| !prefix.is_empty())
            .any(|prefix| path.starts_with(prefix.as_str()))
    }
}
