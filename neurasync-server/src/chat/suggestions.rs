//! Bullet-list suggestion extraction for free-text replies

use once_cell::sync::Lazy;
use regex::Regex;

static BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[-•*]\s+(.+?)\s*$").expect("bullet regex is valid"));

/// Split a reply into its main text and bullet suggestions
///
/// Bullets are only recognised after the first line. Fewer than two bullets
/// leaves the text untouched with no suggestions.
pub fn extract_suggestions(text: &str) -> (String, Vec<String>) {
    let mut suggestions = Vec::new();
    let mut first_bullet_offset = None;
    let mut offset = 0;

    for (index, line) in text.split_inclusive('\n').enumerate() {
        if index > 0 {
            if let Some(captures) = BULLET.captures(line.trim_end_matches(['\r', '\n'])) {
                first_bullet_offset.get_or_insert(offset);
                suggestions.push(captures[1].to_string());
            }
        }
        offset += line.len();
    }

    if suggestions.len() < 2 {
        return (text.trim().to_string(), Vec::new());
    }

    let main = match first_bullet_offset {
        Some(end) => text[..end].trim(),
        None => text.trim(),
    };
    let main = if main.is_empty() { text.trim() } else { main };

    (main.to_string(), suggestions)
}
