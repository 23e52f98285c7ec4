//! Audio-prompt template substitution.
//!
//! Templates carry placeholder tokens like `{name}`; array fields are joined
//! with `". "` before substitution so the spoken rendition reads as prose.

/// Separator used when a list field is flattened into speech text.
pub const LIST_SEPARATOR: &str = ". ";

/// Replace each `{token}` in `template` with its value.
pub fn render(template: &str, fields: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (token, value) in fields {
        out = out.replace(&format!("{{{}}}", token), value);
    }
    out
}

/// Flatten a list field for speech.
pub fn join_list(items: &[String]) -> String {
    items.join(LIST_SEPARATOR)
}

/// Truncate to at most `max_chars` characters, respecting char boundaries.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
