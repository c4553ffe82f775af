//! Line-level entry points: command resolution, parsing and completion.

use crate::lexer::{Token, tokenize};
use crate::matcher::{MatchState, match_params};
use crate::pargv::Pargv;
use crate::shell::{Context, Shell};
use crate::status::ParseStatus;
use serde::Serialize;
use shellkit_grammar::{Command, Grammar};
use tracing::debug;

/// Result of [`parse_line`].
#[derive(Debug, Clone, Serialize)]
pub struct ParseOutcome<'g> {
    /// Overall status of the match.
    pub status: ParseStatus,
    /// The resolved command, if the line named one.
    #[serde(serialize_with = "command_name")]
    pub command: Option<&'g Command>,
    /// Matched parameters; present only when `status` is [`ParseStatus::Ok`].
    pub pargv: Option<Pargv<'g>>,
}

/// Result of [`complete_line`].
#[derive(Debug, Clone, Serialize)]
pub struct Completion<'g> {
    /// The resolved command.
    #[serde(serialize_with = "required_command_name")]
    pub command: &'g Command,
    /// Status of the match run that collected the candidates.
    pub status: ParseStatus,
    /// Parameters admissible at the word being typed, with that word as value.
    pub candidates: Pargv<'g>,
    /// The partial word under completion (empty at a word boundary).
    pub prefix: String,
}

fn command_name<S: serde::Serializer>(
    command: &Option<&Command>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match command {
        Some(c) => serializer.serialize_some(&c.name),
        None => serializer.serialize_none(),
    }
}

fn required_command_name<S: serde::Serializer>(
    command: &&Command,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&command.name)
}

/// Find the command named by the leading tokens.
///
/// Name words compare case-insensitively; when several commands match
/// (`show` and `show ip`), the one with the most words wins. A quoted word
/// never belongs to a command name.
pub fn resolve_command<'g>(grammar: &'g Grammar, tokens: &[Token]) -> Option<&'g Command> {
    let plain = tokens.iter().take_while(|t| !t.quoted).count();
    (1..=plain).rev().find_map(|n| {
        let name = tokens[..n]
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        grammar.command(&name)
    })
}

/// Parse `line` against the session's grammar.
pub fn parse_line<'g>(shell: &'g Shell, line: &str) -> ParseOutcome<'g> {
    let tokens = tokenize(line);
    let Some(command) = resolve_command(shell.grammar(), &tokens) else {
        debug!(line, "no command matches");
        return ParseOutcome {
            status: ParseStatus::BadCmd,
            command: None,
            pargv: None,
        };
    };

    let ctx = Context::new(shell).with_command(command);
    let mut pargv = Pargv::new();
    let mut state = MatchState::new(&tokens, command.word_count(), &mut pargv);
    let status = match_params(&ctx, command, &command.params, &mut state, 0);
    debug!(command = %command.name, %status, "parsed line");

    ParseOutcome {
        status,
        command: Some(command),
        pargv: status.is_ok().then_some(pargv),
    }
}

/// Collect the parameters that could fill the word being typed at the end
/// of `line`.
///
/// Returns `None` when no command matches or the word being typed is still
/// part of the command name.
pub fn complete_line<'g>(shell: &'g Shell, line: &str) -> Option<Completion<'g>> {
    let tokens = tokenize(line);
    let command = resolve_command(shell.grammar(), &tokens)?;

    // Whitespace inside an open quote belongs to the last word.
    let at_boundary = tokens.last().is_none_or(|t| t.end < line.len());
    let (target, prefix) = match tokens.last() {
        Some(last) if !at_boundary => (tokens.len() - 1, last.text.clone()),
        _ => (tokens.len(), String::new()),
    };
    if target < command.word_count() {
        return None;
    }

    let ctx = Context::new(shell).with_command(command);
    let mut pargv = Pargv::new();
    let mut candidates = Pargv::new();
    let mut state = MatchState::new(&tokens, command.word_count(), &mut pargv)
        .with_completion(&mut candidates, target);
    let status = match_params(&ctx, command, &command.params, &mut state, 0);
    debug!(command = %command.name, target, %status, found = candidates.len(), "completed line");

    Some(Completion {
        command,
        status,
        candidates,
        prefix,
    })
}
