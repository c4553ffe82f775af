use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// An external action: a script run by the shell's action executor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    /// Script text. `${name}` references are expanded before execution.
    pub script: String,
    /// Interpreter override (defaults to the executor's configured program).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,
}

/// Text transformation applied before a value is validated.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Preprocess {
    /// Leave the text untouched.
    #[default]
    None,
    /// Convert to upper case.
    ToUpper,
    /// Convert to lower case.
    ToLower,
}

impl Preprocess {
    /// Apply the transformation to `text`.
    pub fn apply(self, text: &str) -> String {
        match self {
            Preprocess::None => text.to_string(),
            Preprocess::ToUpper => text.to_uppercase(),
            Preprocess::ToLower => text.to_lowercase(),
        }
    }
}

/// One `select` choice: the name typed on the line and its mapped value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectOption {
    /// Name accepted on the command line.
    pub name: String,
}

/// How a type decides whether a text is an acceptable value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum PTypeMethod {
    /// The whole text must match a regular expression.
    Regexp {
        /// Pattern, implicitly anchored at both ends.
        pattern: String,
    },
    /// Signed decimal integer within optional inclusive bounds.
    Integer {
        /// Lower bound.
        #[serde(default)]
        min: Option<i64>,
        /// Upper bound.
        #[serde(default)]
        max: Option<i64>,
    },
    /// Unsigned decimal integer within optional inclusive bounds.
    UnsignedInteger {
        /// Lower bound.
        #[serde(default)]
        min: Option<u64>,
        /// Upper bound.
        #[serde(default)]
        max: Option<u64>,
    },
    /// The text must be one of a fixed set of names.
    Select {
        /// Allowed choices.
        options: Vec<SelectOption>,
    },
    /// Validation is delegated to an action.
    Code {
        /// Action invoked with a single `value` parameter.
        action: Action,
    },
}

/// A named value type that parameters refer to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PType {
    /// Unique type name.
    pub name: String,
    /// Help text shown for parameters of this type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Validation method.
    #[serde(flatten)]
    pub method: PTypeMethod,
    /// Transformation applied before static validation.
    #[serde(default)]
    pub preprocess: Preprocess,

    /// Compiled `Regexp` pattern (lazily initialized).
    #[serde(skip)]
    regex_cache: OnceLock<Option<Regex>>,
}

impl PType {
    /// Create a type with the given name and method.
    pub fn new(name: impl Into<String>, method: PTypeMethod) -> Self {
        Self {
            name: name.into(),
            help: None,
            method,
            preprocess: Preprocess::None,
            regex_cache: OnceLock::new(),
        }
    }

    /// The action backing a `code` type, `None` for static types.
    pub fn action(&self) -> Option<&Action> {
        match &self.method {
            PTypeMethod::Code { action } => Some(action),
            _ => None,
        }
    }

    /// Compile the anchored form of a regexp pattern.
    pub(crate) fn compile(pattern: &str) -> Result<Regex, regex::Error> {
        Regex::new(&format!("^(?:{pattern})$"))
    }

    fn regex(&self, pattern: &str) -> Option<&Regex> {
        self.regex_cache
            .get_or_init(|| Self::compile(pattern).ok())
            .as_ref()
    }

    /// Validate `text` with the static rule of this type.
    ///
    /// Returns the accepted (preprocessed) value, or `None` on rejection.
    /// `code` types have no static rule and always reject here.
    pub fn validate_static(&self, text: &str) -> Option<String> {
        let value = self.preprocess.apply(text);
        let accepted = match &self.method {
            PTypeMethod::Regexp { pattern } => self.regex(pattern)?.is_match(&value),
            PTypeMethod::Integer { min, max } => {
                let n = value.parse::<i64>().ok()?;
                min.is_none_or(|lo| n >= lo) && max.is_none_or(|hi| n <= hi)
            }
            PTypeMethod::UnsignedInteger { min, max } => {
                // `u64::from_str` accepts a leading '+', which is not a digit string.
                if value.starts_with('+') {
                    return None;
                }
                let n = value.parse::<u64>().ok()?;
                min.is_none_or(|lo| n >= lo) && max.is_none_or(|hi| n <= hi)
            }
            PTypeMethod::Select { options } => options.iter().any(|o| o.name == value),
            PTypeMethod::Code { .. } => false,
        };
        accepted.then_some(value)
    }
}
