// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - probe: Checks a single URL (robots.txt gate + one HTTP request)
// - scheduler: Runs probes on a fixed pool of workers and streams results
//
// This file (mod.rs) is the module root - it exports the public API that
// other parts of the application use.
// =============================================================================

mod probe;
mod scheduler;

pub use probe::LivenessProbe;
pub use scheduler::{check_all, collect_all};
