//! Parameter grammar tables for the shellkit command matcher.
//!
//! A [`Grammar`] holds the value types ([`PType`]) and the commands of a
//! shell, each command carrying a tree of [`Param`] nodes. Grammars are
//! loaded from JSONC files, checked once, and then shared read-only (usually
//! behind an `Arc`) by every matching run and interactive session.

#![warn(missing_docs)]

mod jsonc;
mod param;
mod ptype;

pub use jsonc::strip_comments;
pub use param::{Param, ParamMode};
pub use ptype::{Action, PType, PTypeMethod, Preprocess, SelectOption};

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

/// Errors that can occur when loading or checking a grammar.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GrammarError {
    /// The grammar file could not be read.
    #[error("cannot read grammar {}: {source}", path.display())]
    Io {
        /// Path that was attempted.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// JSON deserialization failed.
    #[error("invalid grammar JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Two commands share a name.
    #[error("duplicate command '{0}'")]
    DuplicateCommand(String),

    /// Two types share a name.
    #[error("duplicate ptype '{0}'")]
    DuplicatePType(String),

    /// Two sibling parameters share a name.
    #[error("command '{command}': duplicate param '{param}'")]
    DuplicateParam {
        /// Command the parameter list belongs to.
        command: String,
        /// The repeated parameter name.
        param: String,
    },

    /// A parameter refers to a type that does not exist.
    #[error("command '{command}': param '{param}' uses unknown ptype '{ptype}'")]
    UnknownPType {
        /// Command the parameter belongs to.
        command: String,
        /// The parameter name.
        param: String,
        /// The missing type name.
        ptype: String,
    },

    /// A `regexp` type has a pattern that does not compile.
    #[error("ptype '{ptype}': invalid pattern")]
    InvalidPattern {
        /// The type name.
        ptype: String,
        /// The regex compilation error.
        #[source]
        source: regex::Error,
    },
}

/// A command of the shell and its parameter grammar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    /// Command name; may span several words (e.g. `"show interface"`).
    pub name: String,
    /// Help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Top-level parameters, in declared order.
    #[serde(default)]
    pub params: Vec<Param>,
    /// Trailing catch-all for free-form text left after all parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Param>,
    /// Action run when the command executes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
}

impl Command {
    /// Create a command without parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: None,
            params: Vec::new(),
            args: None,
            action: None,
        }
    }

    /// The words making up the command name.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.name.split_whitespace()
    }

    /// Number of words in the command name.
    pub fn word_count(&self) -> usize {
        self.words().count()
    }
}

/// Top-level container for the types and commands of a shell.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grammar {
    /// Value types, referenced by name from parameters.
    #[serde(default)]
    pub ptypes: Vec<PType>,
    /// All commands.
    #[serde(default)]
    pub commands: Vec<Command>,

    /// Cached map from type name → index into `ptypes` (lazily initialized).
    #[serde(skip)]
    ptype_map: OnceLock<HashMap<String, usize>>,
    /// Cached map from command name → index into `commands` (lazily initialized).
    #[serde(skip)]
    cmd_map: OnceLock<HashMap<String, usize>>,
}

impl Grammar {
    /// Create a grammar from its parts.
    /// Cache fields are initialized lazily on first access.
    pub fn new(ptypes: Vec<PType>, commands: Vec<Command>) -> Self {
        Self {
            ptypes,
            commands,
            ptype_map: OnceLock::new(),
            cmd_map: OnceLock::new(),
        }
    }

    /// Parse and check a grammar from JSONC text.
    pub fn from_jsonc_str(input: &str) -> Result<Self, GrammarError> {
        let grammar: Grammar = serde_json::from_str(&strip_comments(input))?;
        grammar.check()?;
        Ok(grammar)
    }

    /// Read, parse and check a grammar file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GrammarError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| GrammarError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_jsonc_str(&text)
    }

    fn ptype_map(&self) -> &HashMap<String, usize> {
        self.ptype_map.get_or_init(|| {
            self.ptypes
                .iter()
                .enumerate()
                .map(|(i, t)| (t.name.clone(), i))
                .collect()
        })
    }

    fn cmd_map(&self) -> &HashMap<String, usize> {
        self.cmd_map.get_or_init(|| {
            self.commands
                .iter()
                .enumerate()
                .map(|(i, c)| (normalize_name(&c.name), i))
                .collect()
        })
    }

    /// Look up a type by name.
    pub fn ptype(&self, name: &str) -> Option<&PType> {
        self.ptype_map().get(name).map(|&i| &self.ptypes[i])
    }

    /// Look up a command by name. Whitespace between words and letter case
    /// are not significant.
    pub fn command(&self, name: &str) -> Option<&Command> {
        self.cmd_map()
            .get(&normalize_name(name))
            .map(|&i| &self.commands[i])
    }

    /// Check cross references and uniqueness rules.
    ///
    /// Called by the loaders; grammars assembled in code can call it directly.
    pub fn check(&self) -> Result<(), GrammarError> {
        let mut seen = HashSet::new();
        for t in &self.ptypes {
            if !seen.insert(t.name.as_str()) {
                return Err(GrammarError::DuplicatePType(t.name.clone()));
            }
            if let PTypeMethod::Regexp { pattern } = &t.method {
                PType::compile(pattern).map_err(|source| GrammarError::InvalidPattern {
                    ptype: t.name.clone(),
                    source,
                })?;
            }
        }

        let mut seen = HashSet::new();
        for cmd in &self.commands {
            if !seen.insert(normalize_name(&cmd.name)) {
                return Err(GrammarError::DuplicateCommand(cmd.name.clone()));
            }
            self.check_params(cmd, &cmd.params)?;
            if let Some(args) = &cmd.args {
                self.check_params(cmd, std::slice::from_ref(args))?;
            }
        }
        Ok(())
    }

    fn check_params(&self, cmd: &Command, params: &[Param]) -> Result<(), GrammarError> {
        let mut names = HashSet::new();
        for p in params {
            if !names.insert(p.name.as_str()) {
                return Err(GrammarError::DuplicateParam {
                    command: cmd.name.clone(),
                    param: p.name.clone(),
                });
            }
            if self.ptype(&p.ptype).is_none() {
                return Err(GrammarError::UnknownPType {
                    command: cmd.name.clone(),
                    param: p.name.clone(),
                    ptype: p.ptype.clone(),
                });
            }
            self.check_params(cmd, p.alternatives())?;
            self.check_params(cmd, &p.params)?;
        }
        Ok(())
    }
}

fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
