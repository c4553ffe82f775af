use super::Context;
use super::expand::{Escape, expand};
use std::io;
use std::process::{Command as Process, Stdio};
use tracing::debug;

/// Errors that prevent an action from producing an exit status.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ExecError {
    /// The context carries no action to run.
    #[error("no action in scope")]
    NoAction,

    /// The interpreter could not be started.
    #[error("cannot run {program}: {source}")]
    Spawn {
        /// The interpreter that was attempted.
        program: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },
}

/// Exit status and captured output of one action run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionOutput {
    /// Exit status; zero means success.
    pub status: i32,
    /// Captured standard output.
    pub stdout: String,
}

impl ActionOutput {
    /// A successful run with the given output.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            status: 0,
            stdout: stdout.into(),
        }
    }

    /// A failed run with the given exit status and no output.
    pub fn failed(status: i32) -> Self {
        Self {
            status,
            stdout: String::new(),
        }
    }

    /// Whether the action exited with status zero.
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Runs the action in scope of a [`Context`] and waits for it to finish.
///
/// Implementations may have arbitrary side effects. Callers invoke the
/// executor at most once per request and never retry.
pub trait ActionExecutor {
    /// Run `ctx.action()` with `ctx` as its environment.
    fn execute(&self, ctx: &Context<'_>) -> Result<ActionOutput, ExecError>;
}

/// Settings for [`ScriptExecutor`].
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct ExecConfig {
    /// Interpreter invoked as `program -c <script>` unless the action names
    /// its own.
    pub program: String,
    /// Strip trailing newlines from captured output.
    pub trim_output: bool,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            program: "/bin/sh".to_string(),
            trim_output: true,
        }
    }
}

/// Executes actions as scripts through an external interpreter.
///
/// The script is expanded against the context first, so a validation
/// action sees only its synthetic `${value}`. Substituted values are
/// shell-escaped and reach the script as single literal words.
#[derive(Debug, Clone, Default)]
pub struct ScriptExecutor {
    config: ExecConfig,
}

impl ScriptExecutor {
    /// Create an executor with the given configuration.
    pub fn new(config: ExecConfig) -> Self {
        Self { config }
    }

    /// The executor's configuration.
    pub fn config(&self) -> &ExecConfig {
        &self.config
    }
}

impl ActionExecutor for ScriptExecutor {
    fn execute(&self, ctx: &Context<'_>) -> Result<ActionOutput, ExecError> {
        let action = ctx.action().ok_or(ExecError::NoAction)?;
        let program = action.shell.as_deref().unwrap_or(&self.config.program);
        let script = expand(&action.script, ctx, Escape::Shell);
        debug!(program, script = %script, "running action");

        let output = Process::new(program)
            .arg("-c")
            .arg(&script)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| ExecError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let mut stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if self.config.trim_output {
            let trimmed = stdout.trim_end_matches(['\n', '\r']).len();
            stdout.truncate(trimmed);
        }
        // A missing code means the interpreter was killed by a signal.
        let status = output.status.code().unwrap_or(-1);
        debug!(status, "action finished");
        Ok(ActionOutput { status, stdout })
    }
}
