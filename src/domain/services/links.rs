//! Lexical link scanner.
//!
//! Recognizes `http://` and `https://` prefixed tokens in message text.
//! Deliberately not a URI grammar: whitespace splits tokens, trailing
//! punctuation is trimmed.

use url::Url;

/// Characters commonly glued onto a link by surrounding prose.
const TRAILING_PUNCTUATION: &[char] = &[',', '.', ';', ':', '!', '?', ')', ']', '>', '"', '\''];

/// Extract parseable links from message text, first-appearance order,
/// duplicates removed.
pub fn extract_links(text: &str) -> Vec<Url> {
    let mut links: Vec<Url> = Vec::new();

    for token in text.split_whitespace() {
        if !token.starts_with("http://") && !token.starts_with("https://") {
            continue;
        }
        let trimmed = token.trim_end_matches(TRAILING_PUNCTUATION);
        if let Ok(url) = Url::parse(trimmed) {
            if !links.iter().any(|known| known == &url) {
                links.push(url);
            }
        }
    }

    links
}
