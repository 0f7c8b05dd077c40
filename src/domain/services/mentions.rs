//! Lexical mention scanner.
//!
//! Recognizes `@` followed by a username-shaped token. Matching against
//! actual users is case-insensitive exact, so extracted names are
//! lowercased and deduplicated here.

/// Whether a character may appear in a username token.
fn is_username_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '.'
}

/// Extract distinct mentioned names (lowercased) in first-appearance order.
pub fn extract_mentions(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let chars: Vec<char> = text.chars().collect();

    let mut i = 0;
    while i < chars.len() {
        if chars[i] != '@' {
            i += 1;
            continue;
        }
        // An @ glued to a preceding word is not a mention (e.g. emails).
        if i > 0 && is_username_char(chars[i - 1]) {
            i += 1;
            continue;
        }

        let start = i + 1;
        let mut end = start;
        while end < chars.len() && is_username_char(chars[end]) {
            end += 1;
        }

        let token: String = chars[start..end].iter().collect();
        // A sentence period after the name is punctuation, not part of it.
        let token = token.trim_end_matches(&['.', '-'][..]).to_lowercase();

        if !token.is_empty() && !names.contains(&token) {
            names.push(token);
        }
        i = end;
    }

    names
}
