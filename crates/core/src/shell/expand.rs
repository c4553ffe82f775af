use super::Context;

/// Name that expands to the command being matched.
pub const CMD_VAR: &str = "__cmd";

/// Characters a shell would interpret inside an unquoted word.
const SHELL_SPECIAL: &[char] = &[
    '`', '|', '$', '<', '>', '&', '(', ')', '#', ';', '\\', '"', '!', '\'', '*', '?', '[',
];

/// How substituted values are written into the expanded text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escape {
    /// Values are inserted as they are.
    Raw,
    /// Values are escaped so `sh` reads each one back as literal text.
    Shell,
}

/// Replace every `${name}` in `text` with its value in `ctx`.
///
/// Lookup order: the result store in scope, [`CMD_VAR`], session variables.
/// Unknown names expand to nothing. A `$` not followed by `{`, and an
/// unterminated `${`, are copied verbatim. Only substituted values are
/// escaped; the surrounding text is left alone.
pub fn expand(text: &str, ctx: &Context<'_>, escape: Escape) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find("${") {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 2..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[pos..]);
            return out;
        };
        if let Some(value) = lookup(&after[..close], ctx) {
            match escape {
                Escape::Raw => out.push_str(value),
                Escape::Shell => push_shell_escaped(&mut out, value),
            }
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

fn push_shell_escaped(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            // A backslash before a newline would join lines instead.
            '\n' => out.push_str("'\n'"),
            c if c.is_whitespace() || SHELL_SPECIAL.contains(&c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
}

fn lookup<'a>(name: &str, ctx: &Context<'a>) -> Option<&'a str> {
    if let Some(value) = ctx.pargv().and_then(|p| p.value(name)) {
        return Some(value);
    }
    if name == CMD_VAR {
        return ctx.command().map(|c| c.name.as_str());
    }
    ctx.shell().var(name)
}
