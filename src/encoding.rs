// src/encoding.rs
// =============================================================================
// Normalizes input files to UTF-8 text.
//
// URL lists are sometimes saved by tools that add a byte order mark or write
// UTF-16 (PowerShell redirection does both). We accept:
// - UTF-8, with or without a BOM
// - UTF-16 LE or BE with a BOM
// - UTF-16 LE without a BOM, recognized by NUL high bytes in the first
//   characters (JSON starts with ASCII, so this is reliable enough)
// =============================================================================

use anyhow::{anyhow, Context, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const UTF16_LE_BOM: &[u8] = b"\xFF\xFE";
const UTF16_BE_BOM: &[u8] = b"\xFE\xFF";

#[derive(Clone, Copy)]
enum Endian {
    Little,
    Big,
}

// Decodes raw file bytes into a String
pub fn decode_text(data: &[u8]) -> Result<String> {
    if let Some(rest) = data.strip_prefix(UTF8_BOM) {
        return utf8(rest);
    }
    if let Some(rest) = data.strip_prefix(UTF16_LE_BOM) {
        return utf16(rest, Endian::Little);
    }
    if let Some(rest) = data.strip_prefix(UTF16_BE_BOM) {
        return utf16(rest, Endian::Big);
    }
    if looks_like_utf16_le(data) {
        return utf16(data, Endian::Little);
    }
    utf8(data)
}

fn looks_like_utf16_le(data: &[u8]) -> bool {
    data.len() >= 4 && data[0] != 0 && data[1] == 0 && data[3] == 0
}

fn utf8(data: &[u8]) -> Result<String> {
    String::from_utf8(data.to_vec()).context("input is not valid UTF-8")
}

fn utf16(data: &[u8], endian: Endian) -> Result<String> {
    if data.len() % 2 != 0 {
        return Err(anyhow!("UTF-16 input has an odd number of bytes"));
    }

    let units: Vec<u16> = data
        .chunks_exact(2)
        .map(|pair| match endian {
            Endian::Little => u16::from_le_bytes([pair[0], pair[1]]),
            Endian::Big => u16::from_be_bytes([pair[0], pair[1]]),
        })
        .collect();

    String::from_utf16(&units).context("input is not valid UTF-16")
}
