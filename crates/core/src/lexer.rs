/// A word of the input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Word text with quotes removed and escapes resolved.
    pub text: String,
    /// Whether any part of the word was double-quoted.
    pub quoted: bool,
    /// Byte offset of the first character in the line.
    pub start: usize,
    /// Byte offset one past the last character in the line.
    pub end: usize,
}

/// Split a command line into words.
///
/// Words are separated by ASCII whitespace. A double-quoted section may
/// contain whitespace and groups with adjacent unquoted text into one word;
/// the quotes themselves are dropped and the token is marked `quoted`. Inside
/// quotes a backslash escapes the next character. An unterminated quote runs
/// to the end of the line.
pub fn tokenize(line: &str) -> Vec<Token> {
    let mut toks = Vec::new();
    let mut chars = line.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_ascii_whitespace() {
            chars.next();
            continue;
        }

        let mut text = String::new();
        let mut quoted = false;
        let mut in_quotes = false;
        let mut end = start;
        while let Some(&(i, c)) = chars.peek() {
            if !in_quotes && c.is_ascii_whitespace() {
                break;
            }
            chars.next();
            end = i + c.len_utf8();
            match c {
                '"' => {
                    in_quotes = !in_quotes;
                    quoted = true;
                }
                '\\' if in_quotes => {
                    if let Some((j, escaped)) = chars.next() {
                        text.push(escaped);
                        end = j + escaped.len_utf8();
                    }
                }
                _ => text.push(c),
            }
        }
        toks.push(Token {
            text,
            quoted,
            start,
            end,
        });
    }
    toks
}
