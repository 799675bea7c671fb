//! Chat title cleanup
//!
//! Models like to wrap titles in quotes or pad them with newlines.

pub const MAX_TITLE_CHARS: usize = 200;
pub const FALLBACK_TITLE: &str = "New chat";

const QUOTES: &[char] = &['"', '\'', '`', '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'];

/// Normalize a generated title for storage
pub fn sanitize_title(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches(QUOTES).trim();
    let capped: String = trimmed.chars().take(MAX_TITLE_CHARS).collect();
    let capped = capped.trim_end();

    if capped.is_empty() {
        FALLBACK_TITLE.to_string()
    } else {
        capped.to_string()
    }
}
