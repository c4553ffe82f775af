//! Small string helpers shared by the matcher.

/// Whether `text` is a case-insensitive prefix of `literal`.
///
/// An empty `text` is a prefix of every literal.
pub fn nocase_prefix(literal: &str, text: &str) -> bool {
    let mut lit = literal.chars().flat_map(char::to_lowercase);
    text.chars()
        .flat_map(char::to_lowercase)
        .all(|c| lit.next() == Some(c))
}

/// Escape `"` and `\` with a backslash.
pub fn escape_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
