use serde::{Deserialize, Serialize};

/// Matching mode of a parameter node.
///
/// Mode-specific data lives only in the variant that uses it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ParamMode {
    /// A plain value validated against the parameter's type.
    #[default]
    Ordinary,
    /// Exactly one of the alternatives matches.
    Switch {
        /// Candidate sub-parameters, tried in declared order.
        alternatives: Vec<Param>,
    },
    /// A keyword the argument must case-insensitively prefix-match.
    Subcommand {
        /// The literal keyword.
        value: String,
    },
}

/// A node of a command's parameter grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawParam", into = "RawParam")]
pub struct Param {
    /// Identifier, unique among its siblings.
    pub name: String,
    /// Help text for completion and help output.
    pub help: Option<String>,
    /// Name of the [`PType`](crate::PType) values are validated against.
    pub ptype: String,
    /// Matching mode.
    pub mode: ParamMode,
    /// Whether the parameter may be absent from the line.
    pub optional: bool,
    /// Whether an optional parameter keeps its declared relative position.
    pub order: bool,
    /// Applicability expression; the node is skipped when it evaluates false.
    pub test: Option<String>,
    /// Nested parameters matched immediately after this one.
    pub params: Vec<Param>,
}

impl Param {
    /// Create a mandatory, ordinary parameter.
    pub fn new(name: impl Into<String>, ptype: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: None,
            ptype: ptype.into(),
            mode: ParamMode::Ordinary,
            optional: false,
            order: false,
            test: None,
            params: Vec::new(),
        }
    }

    /// The synthetic `value` parameter handed to a type's validation action.
    pub fn value_param(ptype: impl Into<String>) -> Self {
        let mut param = Self::new("value", ptype);
        param.help = Some("Value under validation".to_string());
        param
    }

    /// Whether this is a switch node.
    pub fn is_switch(&self) -> bool {
        matches!(self.mode, ParamMode::Switch { .. })
    }

    /// Literal keyword of a subcommand node.
    pub fn subcommand_value(&self) -> Option<&str> {
        match &self.mode {
            ParamMode::Subcommand { value } => Some(value),
            _ => None,
        }
    }

    /// Switch alternatives (empty for other modes).
    pub fn alternatives(&self) -> &[Param] {
        match &self.mode {
            ParamMode::Switch { alternatives } => alternatives,
            _ => &[],
        }
    }
}

// ── Wire form ───────────────────────────────────────────────────────────
// Grammar files describe the mode with a flat `mode` string plus optional
// `alternatives`/`value` keys. The raw form is checked and folded into
// `ParamMode` so invalid combinations never reach the matcher.

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum ModeKind {
    #[default]
    #[serde(alias = "common")]
    Ordinary,
    Switch,
    Subcommand,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawParam {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    help: Option<String>,
    ptype: String,
    #[serde(default)]
    mode: ModeKind,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    optional: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    order: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    test: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    alternatives: Vec<Param>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    params: Vec<Param>,
}

impl TryFrom<RawParam> for Param {
    type Error = String;

    fn try_from(raw: RawParam) -> Result<Self, Self::Error> {
        let mode = match raw.mode {
            ModeKind::Ordinary => {
                if !raw.alternatives.is_empty() {
                    return Err(format!(
                        "param '{}': alternatives require mode \"switch\"",
                        raw.name
                    ));
                }
                ParamMode::Ordinary
            }
            ModeKind::Switch => {
                if raw.alternatives.is_empty() {
                    return Err(format!("switch param '{}' has no alternatives", raw.name));
                }
                if !raw.params.is_empty() {
                    return Err(format!(
                        "switch param '{}' cannot have nested params; nest them under an alternative",
                        raw.name
                    ));
                }
                ParamMode::Switch {
                    alternatives: raw.alternatives,
                }
            }
            ModeKind::Subcommand => ParamMode::Subcommand {
                value: raw.value.unwrap_or_else(|| raw.name.clone()),
            },
        };
        Ok(Param {
            name: raw.name,
            help: raw.help,
            ptype: raw.ptype,
            mode,
            optional: raw.optional,
            order: raw.order,
            test: raw.test,
            params: raw.params,
        })
    }
}

impl From<Param> for RawParam {
    fn from(param: Param) -> Self {
        let (mode, value, alternatives) = match param.mode {
            ParamMode::Ordinary => (ModeKind::Ordinary, None, Vec::new()),
            ParamMode::Switch { alternatives } => (ModeKind::Switch, None, alternatives),
            ParamMode::Subcommand { value } => (ModeKind::Subcommand, Some(value), Vec::new()),
        };
        RawParam {
            name: param.name,
            help: param.help,
            ptype: param.ptype,
            mode,
            optional: param.optional,
            order: param.order,
            test: param.test,
            value,
            alternatives,
            params: param.params,
        }
    }
}
