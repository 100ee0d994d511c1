//! Store header extraction ("015 SAN MARTIN").

use super::patterns::{STORE_LINE, WHITESPACE_RUN};

/// Lines scanned from the top of the receipt for the store header.
pub const DEFAULT_STORE_SCAN_LINES: usize = 5;

/// Maximum length of a store name, in characters.
pub const DEFAULT_STORE_NAME_MAX_LEN: usize = 100;

/// Store code and name taken from one header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLine {
    /// Leading 2-4 digit store code, verbatim.
    pub code: String,
    /// Uppercase name after the code, whitespace collapsed.
    pub name: String,
}

/// Find the first of the top `scan_lines` lines shaped like a store header.
pub fn find_store_line(text: &str, scan_lines: usize) -> Option<StoreLine> {
    text.lines().take(scan_lines).find_map(|line| {
        let caps = STORE_LINE.captures(line.trim())?;
        let name = WHITESPACE_RUN.replace_all(caps[2].trim(), " ").into_owned();

        Some(StoreLine {
            code: caps[1].to_string(),
            name,
        })
    })
}

/// Extract the store code from the receipt header.
pub fn extract_store_code(text: &str) -> Option<String> {
    find_store_line(text, DEFAULT_STORE_SCAN_LINES).map(|line| line.code)
}

/// Extract the store name from the receipt header, capped at 100 characters.
pub fn extract_store_name(text: &str) -> Option<String> {
    find_store_line(text, DEFAULT_STORE_SCAN_LINES)
        .map(|line| truncate_chars(&line.name, DEFAULT_STORE_NAME_MAX_LEN))
}

/// Cut `s` to at most `max` characters.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
