//! Shared test helpers for `shellkit_core` integration tests.

#![allow(unreachable_pub)]

use shellkit_core::{ActionExecutor, ActionOutput, Context, ExecError, Pargv, Shell};
use shellkit_grammar::Grammar;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, LazyLock};

/// Grammar exercising every parameter mode, loaded once per test binary.
pub static GRAMMAR: LazyLock<Arc<Grammar>> = LazyLock::new(|| {
    Arc::new(Grammar::from_jsonc_str(FIXTURE).unwrap_or_else(|e| panic!("fixture: {e}")))
});

const FIXTURE: &str = r#"{
  "ptypes": [
    {"name": "DIGITS", "method": "regexp", "pattern": "[0-9]+"},
    {"name": "UINT", "method": "unsignedInteger"},
    {"name": "KW", "method": "regexp", "pattern": "\\S+"},
    {"name": "TEXT", "method": "regexp", "pattern": ".*"},
    {"name": "PROTO", "method": "select", "options": [{"name": "tcp"}, {"name": "udp"}]},
    // Validated by the action executor.
    {"name": "COLOR", "method": "code", "action": {"script": "check-color ${value}"}}
  ],
  "commands": [
    {"name": "digits", "params": [{"name": "P", "ptype": "DIGITS"}]},
    {
      "name": "pair",
      "params": [
        {"name": "M", "ptype": "KW"},
        {"name": "verbose", "ptype": "KW", "mode": "subcommand", "optional": true},
        {"name": "count", "ptype": "UINT", "optional": true}
      ]
    },
    {
      "name": "svc",
      "params": [{
        "name": "op", "ptype": "KW", "mode": "switch",
        "alternatives": [
          {"name": "start", "ptype": "KW", "mode": "subcommand",
           "params": [{"name": "delay", "ptype": "UINT", "optional": true}]},
          {"name": "stop", "ptype": "KW", "mode": "subcommand"},
          {"name": "restart", "ptype": "KW", "mode": "subcommand",
           "test": "${mode} = advanced"}
        ]
      }]
    },
    {
      "name": "route",
      "params": [
        {"name": "proto", "ptype": "PROTO"},
        {"name": "port", "ptype": "UINT", "test": "${proto} = tcp"}
      ]
    },
    {"name": "echo", "args": {"name": "text", "ptype": "TEXT"}},
    {
      "name": "log",
      "params": [{"name": "debug", "ptype": "KW", "mode": "subcommand", "optional": true}],
      "args": {"name": "msg", "ptype": "TEXT"}
    },
    {
      "name": "tune",
      "params": [
        {"name": "rate", "ptype": "UINT", "optional": true},
        {"name": "burst", "ptype": "UINT", "optional": true}
      ]
    },
    {"name": "paint", "params": [{"name": "color", "ptype": "COLOR"}]},
    {
      "name": "ordered",
      "params": [
        {"name": "n", "ptype": "UINT"},
        {"name": "a", "ptype": "KW", "mode": "subcommand", "optional": true, "order": true},
        {"name": "b", "ptype": "KW", "mode": "subcommand", "optional": true, "order": true}
      ]
    },
    {
      "name": "mixed",
      "params": [
        {"name": "x", "ptype": "KW", "mode": "subcommand", "optional": true},
        {"name": "y", "ptype": "KW", "mode": "subcommand", "optional": true, "order": true},
        {"name": "z", "ptype": "KW", "mode": "subcommand", "optional": true}
      ]
    }
  ]
}"#;

/// A session over [`GRAMMAR`] with the default script executor.
#[allow(dead_code)]
pub fn shell() -> Shell {
    Shell::new(Arc::clone(&GRAMMAR))
}

/// `(name, value)` pairs of a result store, in match order.
#[allow(dead_code)]
pub fn entries<'a>(pargv: &'a Pargv<'_>) -> Vec<(&'a str, &'a str)> {
    pargv.iter().map(|a| (a.name(), a.value())).collect()
}

// ─── Recording executor ─────────────────────────────────────────────────────

/// What the executor saw on one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// Script of the action in scope.
    pub script: String,
    /// Name of the command in scope.
    pub command: Option<String>,
    /// Names in the result store in scope.
    pub visible: Vec<String>,
    /// Value of the `value` entry.
    pub value: Option<String>,
}

/// Executor that records every call and answers from a fixed rule.
#[derive(Clone)]
pub struct FakeExecutor {
    calls: Rc<RefCell<Vec<Call>>>,
    respond: fn(&str) -> Result<ActionOutput, ExecError>,
}

#[allow(dead_code)]
impl FakeExecutor {
    /// An executor answering with `respond(value)`.
    pub fn new(respond: fn(&str) -> Result<ActionOutput, ExecError>) -> Self {
        Self {
            calls: Rc::default(),
            respond,
        }
    }

    /// Shared handle to the recorded calls.
    pub fn calls(&self) -> Rc<RefCell<Vec<Call>>> {
        Rc::clone(&self.calls)
    }
}

impl ActionExecutor for FakeExecutor {
    fn execute(&self, ctx: &Context<'_>) -> Result<ActionOutput, ExecError> {
        let value = ctx.pargv().and_then(|p| p.value("value")).map(str::to_string);
        self.calls.borrow_mut().push(Call {
            script: ctx.action().map(|a| a.script.clone()).unwrap_or_default(),
            command: ctx.command().map(|c| c.name.clone()),
            visible: ctx
                .pargv()
                .map(|p| p.names().map(str::to_string).collect())
                .unwrap_or_default(),
            value: value.clone(),
        });
        (self.respond)(value.as_deref().unwrap_or(""))
    }
}

/// Colors known to the fake `check-color` action.
///
/// `#rgb` is normalized to upper case, `red` passes silently, `boom` cannot
/// be run and everything else exits 1.
#[allow(dead_code)]
pub fn check_color(value: &str) -> Result<ActionOutput, ExecError> {
    match value {
        v if v.starts_with('#') => Ok(ActionOutput::ok(v.to_uppercase())),
        "red" => Ok(ActionOutput::ok("")),
        "boom" => Err(ExecError::NoAction),
        _ => Ok(ActionOutput::failed(1)),
    }
}
