// src/input.rs
// =============================================================================
// Reads the URL list produced by `url-scout extract`.
//
// Lookup order for the file argument:
// 1. The path exactly as given
// 2. urldata/<path> (where extracted lists are conventionally kept)
//
// Any problem here (missing file, bad encoding, bad JSON, no URLs) is fatal
// for the whole run.
// =============================================================================

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::encoding::decode_text;
use crate::models::UrlList;

pub const DATA_DIR: &str = "urldata";

// Picks the file to read: the given path if it exists, else urldata/<path>
pub fn resolve_input_path(name: &Path) -> PathBuf {
    if name.exists() {
        return name.to_path_buf();
    }
    let fallback = Path::new(DATA_DIR).join(name);
    debug!(given = %name.display(), fallback = %fallback.display(), "input not found, trying data dir");
    fallback
}

// Loads and validates a URL list file
//
// Errors:
//   - the file cannot be read
//   - the content is neither UTF-8 nor UTF-16
//   - the JSON does not match {source_url, extracted_urls, count}
//   - extracted_urls is empty
pub fn load_url_list(path: &Path) -> Result<UrlList> {
    let data = fs::read(path).with_context(|| format!("error reading file {}", path.display()))?;
    let text = decode_text(&data).with_context(|| format!("error decoding file {}", path.display()))?;

    let list: UrlList = serde_json::from_str(&text)
        .with_context(|| format!("error parsing JSON in {}", path.display()))?;

    if list.extracted_urls.is_empty() {
        bail!("no URLs found in JSON file {}", path.display());
    }

    Ok(list)
}
