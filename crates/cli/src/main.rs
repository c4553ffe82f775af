mod render;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use shellkit_core::{ExecConfig, ScriptExecutor, Shell, complete_line, parse_line};
use shellkit_grammar::Grammar;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::render::{
    Format, print_check, print_completion, print_error_envelope, print_outcome,
    render_grammar_error,
};

/// Environment variable holding the log filter (e.g. `shellkit_core=debug`).
const LOG_ENV: &str = "SHELLKIT_LOG";

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "shellkit",
    version,
    about = "Match and complete command lines against a shellkit parameter grammar"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

/// Options shared by the commands that run a session.
#[derive(Args, Debug)]
struct SessionArgs {
    /// Grammar file (JSON, `//` and `/* */` comments allowed).
    #[arg(long, short)]
    grammar: PathBuf,

    /// Session variable visible to `${NAME}` in tests and actions.
    /// May be repeated.
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
    vars: Vec<(String, String)>,

    /// Interpreter for action scripts, invoked as `PROGRAM -c SCRIPT`.
    #[arg(long, value_name = "PROGRAM")]
    interpreter: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Match a command line and print the parameter values.
    Parse {
        #[command(flatten)]
        session: SessionArgs,
        /// The line to match, as one argument.
        #[arg(allow_hyphen_values = true)]
        line: String,
    },

    /// List the parameters that can fill the word being typed at the end
    /// of a line.
    Complete {
        #[command(flatten)]
        session: SessionArgs,
        /// The line typed so far; end it with a space to complete a new word.
        #[arg(allow_hyphen_values = true)]
        line: String,
    },

    /// Load a grammar and report any problems.
    Check {
        /// Grammar file to check.
        #[arg(long, short)]
        grammar: PathBuf,
    },
}

fn parse_var(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{s}'")),
    }
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();
    let format = Format::resolve_or_detect(cli.output.as_deref());

    match run(cli.cmd, format) {
        Ok(code) => code,
        Err(err) => {
            match format {
                Format::Json => print_error_envelope(&err),
                Format::Pretty => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    // Logs go to stderr; stdout carries results.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
}

fn run(cmd: Cmd, format: Format) -> Result<ExitCode> {
    match cmd {
        Cmd::Parse { session, line } => cmd_parse(&session, &line, format),
        Cmd::Complete { session, line } => cmd_complete(&session, &line, format),
        Cmd::Check { grammar } => cmd_check(&grammar, format),
    }
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_parse(args: &SessionArgs, line: &str, format: Format) -> Result<ExitCode> {
    let shell = open_session(args, format)?;
    let outcome = parse_line(&shell, line);
    print_outcome(&outcome, format)?;

    Ok(if outcome.status.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn cmd_complete(args: &SessionArgs, line: &str, format: Format) -> Result<ExitCode> {
    let shell = open_session(args, format)?;
    let completion = complete_line(&shell, line);
    print_completion(completion.as_ref(), format)?;
    Ok(ExitCode::SUCCESS)
}

fn cmd_check(path: &Path, format: Format) -> Result<ExitCode> {
    let grammar = load_grammar(path, format)?;
    print_check(path, &grammar, format)?;
    Ok(ExitCode::SUCCESS)
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Read and check a grammar file. JSON syntax errors are shown with source
/// context in pretty mode before the error is returned.
fn load_grammar(path: &Path, format: Format) -> Result<Grammar> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read grammar file '{}'", path.display()))?;
    let grammar = Grammar::from_jsonc_str(&source).map_err(|err| {
        if format == Format::Pretty {
            render_grammar_error(&source, &path.display().to_string(), &err);
        }
        anyhow::Error::new(err).context(format!("invalid grammar '{}'", path.display()))
    })?;
    debug!(
        path = %path.display(),
        commands = grammar.commands.len(),
        ptypes = grammar.ptypes.len(),
        "grammar loaded"
    );
    Ok(grammar)
}

fn open_session(args: &SessionArgs, format: Format) -> Result<Shell> {
    let grammar = load_grammar(&args.grammar, format)?;

    let mut config = ExecConfig::default();
    if let Some(program) = &args.interpreter {
        config.program.clone_from(program);
    }

    let mut shell = Shell::new(Arc::new(grammar)).with_executor(ScriptExecutor::new(config));
    for (name, value) in &args.vars {
        shell.set_var(name.as_str(), value.as_str());
    }
    Ok(shell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn var_requires_name_and_equals() {
        assert_eq!(
            parse_var("mode=advanced"),
            Ok(("mode".to_string(), "advanced".to_string()))
        );
        assert_eq!(parse_var("empty="), Ok(("empty".to_string(), String::new())));
        assert_eq!(parse_var("a=b=c"), Ok(("a".to_string(), "b=c".to_string())));
        assert!(parse_var("=x").is_err());
        assert!(parse_var("novalue").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
