//! Session state and the context handed to tests, validators and actions.

/// Action execution: the executor trait and the script-based implementation.
pub mod exec;
/// `${name}` expansion against a context.
pub mod expand;

use crate::pargv::Pargv;
use exec::{ActionExecutor, ScriptExecutor};
use shellkit_grammar::{Action, Command, Grammar};
use std::collections::HashMap;
use std::sync::Arc;

/// One interactive session: a shared grammar plus session-local state.
///
/// The grammar is shared read-only between sessions; variables and the
/// executor belong to the session, so concurrent sessions never contend.
pub struct Shell {
    grammar: Arc<Grammar>,
    vars: HashMap<String, String>,
    executor: Box<dyn ActionExecutor>,
}

impl Shell {
    /// Create a session using the default [`ScriptExecutor`].
    pub fn new(grammar: Arc<Grammar>) -> Self {
        Self {
            grammar,
            vars: HashMap::new(),
            executor: Box::new(ScriptExecutor::default()),
        }
    }

    /// Replace the action executor.
    pub fn with_executor(mut self, executor: impl ActionExecutor + 'static) -> Self {
        self.executor = Box::new(executor);
        self
    }

    /// The grammar this session matches against.
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// The action executor.
    pub fn executor(&self) -> &dyn ActionExecutor {
        self.executor.as_ref()
    }

    /// Set a session variable, visible to `${name}` expansion.
    pub fn set_var(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Value of a session variable.
    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}

impl std::fmt::Debug for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("commands", &self.grammar.commands.len())
            .field("vars", &self.vars)
            .finish_non_exhaustive()
    }
}

/// What a test expression, validator or action can see.
///
/// All fields are borrows, so contexts are cheap to copy and narrow. The
/// result store is attached only for the duration of a single evaluation.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    shell: &'a Shell,
    command: Option<&'a Command>,
    action: Option<&'a Action>,
    pargv: Option<&'a Pargv<'a>>,
}

impl<'a> Context<'a> {
    /// A context bound to a session only.
    pub fn new(shell: &'a Shell) -> Self {
        Self {
            shell,
            command: None,
            action: None,
            pargv: None,
        }
    }

    /// Bind the command being matched; its action becomes the action in scope.
    pub fn with_command(self, command: &'a Command) -> Self {
        Self {
            command: Some(command),
            action: command.action.as_ref(),
            ..self
        }
    }

    /// A narrower context that also sees `pargv`.
    pub fn with_pargv<'b>(&self, pargv: &'b Pargv<'b>) -> Context<'b>
    where
        'a: 'b,
    {
        Context {
            shell: self.shell,
            command: self.command,
            action: self.action,
            pargv: Some(pargv),
        }
    }

    /// A scoped sub-context for running `action` against a private result store.
    ///
    /// The session and command are borrowed from `self`; the action and store
    /// are substituted, and the outer store is not reachable from the result.
    pub fn scoped<'b>(&self, action: &'b Action, pargv: &'b Pargv<'b>) -> Context<'b>
    where
        'a: 'b,
    {
        Context {
            shell: self.shell,
            command: self.command,
            action: Some(action),
            pargv: Some(pargv),
        }
    }

    /// The session.
    pub fn shell(&self) -> &'a Shell {
        self.shell
    }

    /// The command being matched, if any.
    pub fn command(&self) -> Option<&'a Command> {
        self.command
    }

    /// The action in scope, if any.
    pub fn action(&self) -> Option<&'a Action> {
        self.action
    }

    /// The result store in scope, if any.
    pub fn pargv(&self) -> Option<&'a Pargv<'a>> {
        self.pargv
    }
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("command", &self.command.map(|c| c.name.as_str()))
            .field("action", &self.action)
            .field("pargv", &self.pargv)
            .finish_non_exhaustive()
    }
}
