use serde::Serialize;

/// Outcome of matching a line against a command's grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStatus {
    /// Every mandatory parameter matched; the result store is complete.
    Ok,
    /// Input ended before all mandatory parameters were satisfied.
    Partial,
    /// A mandatory parameter's argument was present but rejected.
    BadParam,
    /// The command is unknown, or leftover words have no args parameter.
    BadCmd,
}

impl ParseStatus {
    /// Whether this is [`ParseStatus::Ok`].
    pub fn is_ok(self) -> bool {
        self == ParseStatus::Ok
    }
}

impl std::fmt::Display for ParseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseStatus::Ok => write!(f, "ok"),
            ParseStatus::Partial => write!(f, "incomplete command"),
            ParseStatus::BadParam => write!(f, "illegal parameter"),
            ParseStatus::BadCmd => write!(f, "illegal command"),
        }
    }
}
