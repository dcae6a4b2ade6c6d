//! Best-effort name extraction from embedded font programs.
//!
//! Font-program name tables store family and subfamily strings as UTF-16BE or
//! UTF-16LE depending on platform; a plain little-endian pair scan over the
//! whole blob recovers most of them without parsing the font format. The
//! output is corroborating evidence only, never ground truth: callers must
//! tolerate an empty result.

use std::collections::HashSet;

/// Minimum consecutive accepted characters for a candidate string.
const MIN_RUN_LEN: usize = 3;

/// Cap on raw candidates collected from one blob.
const MAX_RAW_STRINGS: usize = 20;

/// Maximum length of a plausible name string.
const MAX_NAME_LEN: usize = 40;

/// Cap on filtered name strings returned to the caller.
const MAX_NAME_STRINGS: usize = 10;

/// Scan a binary blob for printable-ASCII runs encoded as UTF-16LE pairs.
///
/// A byte pair is accepted when its high byte is zero and its low byte is a
/// printable ASCII code point (32-126); any other pair terminates the current
/// candidate. Candidates shorter than [`MIN_RUN_LEN`] are discarded, and
/// collection stops after [`MAX_RAW_STRINGS`] candidates to bound cost on
/// large blobs. Duplicates are dropped, first occurrence wins.
pub fn extract_name_strings(data: &[u8]) -> Vec<String> {
    let mut strings: Vec<String> = Vec::new();
    let mut current = String::new();

    for pair in data.chunks_exact(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if hi == 0 && (32..=126).contains(&lo) {
            current.push(lo as char);
        } else {
            if current.len() >= MIN_RUN_LEN {
                strings.push(std::mem::take(&mut current));
                if strings.len() >= MAX_RAW_STRINGS {
                    break;
                }
            }
            current.clear();
        }
    }
    if strings.len() < MAX_RAW_STRINGS && current.len() >= MIN_RUN_LEN {
        strings.push(current);
    }

    let mut seen = HashSet::new();
    strings.retain(|s| seen.insert(s.clone()));
    strings
}

/// Keep only candidates that look like font family/subfamily names.
///
/// Drops strings longer than [`MAX_NAME_LEN`] or without a single alphabetic
/// character, capped to [`MAX_NAME_STRINGS`] results.
pub fn filter_name_strings(strings: Vec<String>) -> Vec<String> {
    strings
        .into_iter()
        .filter(|s| s.len() <= MAX_NAME_LEN && s.chars().any(|c| c.is_ascii_alphabetic()))
        .take(MAX_NAME_STRINGS)
        .collect()
}

/// Extract plausible name strings from a font-program blob.
pub fn sniff_names(data: &[u8]) -> Vec<String> {
    filter_name_strings(extract_name_strings(data))
}

/// Encode a string as UTF-16LE bytes. Test helper for fixtures.
#[cfg(test)]
pub(crate) fn utf16le(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
}
