//! shellkit core library.
//!
//! Matches tokenized command lines against a parameter grammar loaded by
//! [`shellkit_grammar`]. The main entry points are [`parse_line`] for
//! matching a complete line and [`complete_line`] for collecting the
//! parameters admissible at the word being typed.

#![warn(missing_docs)]

/// Line tokenizer.
pub mod lexer;
/// Recursive parameter matching and value validation.
pub mod matcher;
/// The ordered result store of one match.
pub mod pargv;
/// Line-level parse and completion entry points.
pub mod parse;
/// Sessions, contexts and action execution.
pub mod shell;
/// Match status taxonomy.
pub mod status;
/// Case-insensitive prefix matching and quoting helpers.
pub mod strings;

// ── Convenience re-exports ──────────────────────────────────────────────────

// Entry points
pub use parse::{Completion, ParseOutcome, complete_line, parse_line, resolve_command};

// Results
pub use pargv::{Arg, Pargv};
pub use status::ParseStatus;

// Sessions and actions
pub use shell::exec::{ActionExecutor, ActionOutput, ExecConfig, ExecError, ScriptExecutor};
pub use shell::{Context, Shell};

// Matching
pub use matcher::validate::validate_value;
pub use matcher::{MatchState, match_params};
