// src/report.rs
// =============================================================================
// Prints check results for humans (one line per URL + summary) or as JSON.
//
// The human report is printed while results stream in, so a long run shows
// progress instead of staying silent until the end.
// =============================================================================

use std::time::Duration;

use anyhow::Result;

use crate::models::Outcome;

const MAX_URL_DISPLAY: usize = 70;

// Running tally for the streaming report
#[derive(Debug, Default)]
pub struct Reporter {
    printed: usize,
    online: usize,
    offline: usize,
}

impl Reporter {
    pub fn new() -> Self {
        Reporter::default()
    }

    pub fn print_header(&self) {
        println!();
        println!("URL STATUS CHECK RESULTS");
        println!("{}", "=".repeat(78));
    }

    // Prints one result and counts it
    pub fn record(&mut self, outcome: &Outcome) {
        self.printed += 1;
        if outcome.online {
            self.online += 1;
        } else {
            self.offline += 1;
        }
        println!("{}", format_line(self.printed, outcome));
    }

    pub fn print_summary(&self, elapsed: Duration) {
        let total = self.printed;

        println!();
        println!("📊 Summary:");
        println!("   📋 Total checked: {}", total);
        println!("   ✅ Online:  {} ({:.1}%)", self.online, percent(self.online, total));
        println!("   ❌ Offline: {} ({:.1}%)", self.offline, percent(self.offline, total));
        println!("⏱  Time elapsed: {:.2} seconds", elapsed.as_secs_f64());
    }
}

// Formats a single result line (plus an error line when there is one)
//
// Examples:
//   [1] ✅ ONLINE  [200] https://example.com/
//   [2] ❌ OFFLINE [404] https://example.com/missing
//   [3] ❌ OFFLINE [ERROR] https://blocked.example/private
//           Error: disallowed by robots.txt
pub fn format_line(index: usize, outcome: &Outcome) -> String {
    let url = truncate_url(&outcome.url);

    if outcome.online {
        return format!("[{}] ✅ ONLINE  [{}] {}", index, outcome.status_code, url);
    }

    match &outcome.error {
        Some(error) => format!(
            "[{}] ❌ OFFLINE [ERROR] {}\n        Error: {}",
            index, url, error
        ),
        None => format!("[{}] ❌ OFFLINE [{}] {}", index, outcome.status_code, url),
    }
}

// Prints all results as a pretty JSON array
pub fn print_json(outcomes: &[Outcome]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(outcomes)?;
    println!("{}", json_output);
    Ok(())
}

// Shortens long URLs for display, on a character boundary
fn truncate_url(url: &str) -> String {
    if url.chars().count() > MAX_URL_DISPLAY {
        let head: String = url.chars().take(MAX_URL_DISPLAY - 3).collect();
        format!("{}...", head)
    } else {
        url.to_string()
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}
