//! Terminal and JSON rendering of match results.
//!
//! Results go to stdout; status lines and diagnostics go to stderr so the
//! values stay pipeable. Grammar syntax errors are rendered with ariadne,
//! pointing into the original grammar file.

use std::io::{self, IsTerminal};
use std::path::Path;

use anyhow::Result;
use ariadne::{Color, Config, Fmt, Label, Report, ReportKind, Source};
use shellkit_core::{Arg, Completion, ParseOutcome, ParseStatus};
use shellkit_grammar::{Grammar, GrammarError};

// ── Output format ───────────────────────────────────────────────────────

/// Output format for results and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured, human-readable output.
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Use the explicit choice, or pick by whether stdout is a TTY.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            _ => {
                if io::stdout().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Json
                }
            }
        }
    }
}

// ── Grammar errors ──────────────────────────────────────────────────────

/// Render a grammar error to stderr, with source context for JSON errors.
pub(crate) fn render_grammar_error(source: &str, filename: &str, err: &GrammarError) {
    let GrammarError::InvalidJson(json_err) = err else {
        eprintln!("{}: {err}", "grammar error".fg(Color::Red));
        return;
    };

    let start = line_col_offset(source, json_err.line(), json_err.column());
    let end = next_char_boundary(source, start);
    let mut cache = (filename, Source::from(source));

    Report::build(ReportKind::Error, (filename, start..end))
        .with_message("invalid grammar JSON")
        .with_config(Config::default().with_compact(false))
        .with_label(
            Label::new((filename, start..end))
                .with_message(json_err.to_string())
                .with_color(Color::Red),
        )
        .finish()
        .eprint(&mut cache)
        .ok();
}

/// Byte offset of a 1-based line/column position, clamped to the source.
fn line_col_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let line_len = source[line_start..].find('\n').unwrap_or(source.len() - line_start);
    let mut offset = line_start + column.saturating_sub(1).min(line_len);
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

fn next_char_boundary(source: &str, offset: usize) -> usize {
    source[offset..]
        .chars()
        .next()
        .map_or(offset, |c| offset + c.len_utf8())
}

// ── Results ─────────────────────────────────────────────────────────────

fn status_color(status: ParseStatus) -> Color {
    match status {
        ParseStatus::Ok => Color::Green,
        ParseStatus::Partial => Color::Yellow,
        ParseStatus::BadParam | ParseStatus::BadCmd => Color::Red,
    }
}

/// Print a parse outcome: `name = value` lines on stdout, status on stderr.
pub(crate) fn print_outcome(outcome: &ParseOutcome<'_>, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(outcome)?),
        Format::Pretty => {
            if let Some(pargv) = &outcome.pargv {
                for arg in pargv {
                    println!("{} = {}", arg.name().fg(Color::Cyan), arg.value());
                }
            }
            let status = outcome.status;
            match outcome.command {
                Some(cmd) => eprintln!("{}: {}", cmd.name, status.fg(status_color(status))),
                None => eprintln!("{}", status.fg(status_color(status))),
            }
        }
    }
    Ok(())
}

/// Print completion candidates, one per line.
pub(crate) fn print_completion(completion: Option<&Completion<'_>>, format: Format) -> Result<()> {
    match (format, completion) {
        (Format::Json, Some(c)) => println!("{}", serde_json::to_string_pretty(c)?),
        (Format::Json, None) => {
            let out = serde_json::json!({ "command": null, "candidates": [] });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        (Format::Pretty, Some(c)) => {
            for arg in &c.candidates {
                println!("{}", candidate_line(arg));
            }
            if c.candidates.is_empty() {
                eprintln!("no candidates");
            }
        }
        (Format::Pretty, None) => eprintln!("no command to complete"),
    }
    Ok(())
}

/// Keywords print as typed; other parameters as `<name>`, followed by help.
fn candidate_line(arg: &Arg<'_>) -> String {
    let param = arg.param();
    let word = match param.subcommand_value() {
        Some(keyword) => keyword.to_string(),
        None => format!("<{}>", param.name),
    };
    match &param.help {
        Some(help) => format!("{word:<20} {help}"),
        None => word,
    }
}

/// Print a grammar summary after a successful check.
pub(crate) fn print_check(path: &Path, grammar: &Grammar, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let out = serde_json::json!({
                "ok": true,
                "file": path.display().to_string(),
                "commands": grammar.commands.len(),
                "ptypes": grammar.ptypes.len(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => eprintln!(
            "{}: {} commands, {} types",
            "grammar ok".fg(Color::Green),
            grammar.commands.len(),
            grammar.ptypes.len()
        ),
    }
    Ok(())
}

/// Print a failed command as a JSON envelope on stdout.
pub(crate) fn print_error_envelope(err: &anyhow::Error) {
    let out = serde_json::json!({
        "success": false,
        "error": "command_failed",
        "message": format!("{err:#}"),
    });
    // A `Value` built from strings always serializes.
    if let Ok(text) = serde_json::to_string_pretty(&out) {
        println!("{text}");
    }
}
