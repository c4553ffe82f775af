//! Recursive matching of a token stream against a parameter tree.
//!
//! [`match_params`] walks one sibling list at a time and recurses into a
//! node's nested parameters right after the node matches. All state that
//! outlives a single sibling list (the token cursor and the result stores)
//! lives in [`MatchState`], threaded through the recursion by `&mut`.
//!
//! Optional parameters that are not `order`ed may appear in any relative
//! order: after one matches, the scan rewinds to just past the last
//! mandatory (or ordered) sibling so the remaining optionals are tried again
//! against the next token. Tokens are never un-consumed; each rewind is
//! bounded because a parameter already in the result store cannot match a
//! second time.

/// Value validation: static type rules and action-delegated checks.
pub mod validate;

use crate::lexer::Token;
use crate::pargv::Pargv;
use crate::shell::{Context, line_test};
use crate::status::ParseStatus;
use crate::strings::{escape_quoted, nocase_prefix};
use shellkit_grammar::{Command, Param, ParamMode};
use tracing::{debug, trace};
use validate::validate_value;

/// Mutable state shared by every level of one matching run.
pub struct MatchState<'g, 's> {
    tokens: &'s [Token],
    cursor: usize,
    pargv: &'s mut Pargv<'g>,
    completion: Option<CompletionState<'g, 's>>,
}

struct CompletionState<'g, 's> {
    candidates: &'s mut Pargv<'g>,
    target: usize,
}

impl<'g, 's> MatchState<'g, 's> {
    /// Start matching `tokens` at `cursor`, recording results in `pargv`.
    pub fn new(tokens: &'s [Token], cursor: usize, pargv: &'s mut Pargv<'g>) -> Self {
        Self {
            tokens,
            cursor,
            pargv,
            completion: None,
        }
    }

    /// Also record every parameter admissible at token index `target`.
    pub fn with_completion(mut self, candidates: &'s mut Pargv<'g>, target: usize) -> Self {
        self.completion = Some(CompletionState { candidates, target });
        self
    }

    /// Index of the next unconsumed token.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn at_completion_target(&self) -> bool {
        self.completion
            .as_ref()
            .is_some_and(|c| c.target == self.cursor)
    }
}

/// Match the sibling list `params` of `command`, starting at the state's cursor.
///
/// `level` is 0 for the command's own parameter list; only that level folds
/// leftover words into the command's args parameter.
pub fn match_params<'g>(
    ctx: &Context<'_>,
    command: &'g Command,
    params: &'g [Param],
    state: &mut MatchState<'g, '_>,
    level: usize,
) -> ParseStatus {
    let tokens = state.tokens;
    let argc = tokens.len();
    let mut index = 0;
    let mut last_mandatory: Option<usize> = None;

    while let Some(param) = params.get(index) {
        if !applicable(ctx, param, state.pargv) {
            index += 1;
            continue;
        }

        let arg = tokens.get(state.cursor).map(|t| t.text.as_str());
        offer_candidates(ctx, param, arg, state);

        if !param.optional {
            last_mandatory = Some(index);
        }

        let current: &Pargv<'g> = state.pargv;
        let matched = if current.contains(&param.name) {
            trace!(param = %param.name, "already matched");
            None
        } else {
            arg.and_then(|arg| match &param.mode {
                ParamMode::Switch { alternatives } => alternatives
                    .iter()
                    .filter(|alt| applicable(ctx, alt, current))
                    .find_map(|alt| validate_value(ctx, alt, arg).map(|v| (alt, v))),
                ParamMode::Ordinary | ParamMode::Subcommand { .. } => {
                    validate_value(ctx, param, arg).map(|v| (param, v))
                }
            })
        };

        match matched {
            Some((node, value)) => {
                debug!(param = %node.name, value = %value, cursor = state.cursor, level, "matched");
                if param.is_switch() {
                    state.pargv.insert(param, node.name.clone());
                }
                state.pargv.insert(node, value);

                // An optional word still being typed stays under the cursor so
                // the next completion request sees it again.
                let frozen = param.optional && state.at_completion_target() && state.cursor + 1 == argc;
                if !frozen {
                    state.cursor += 1;
                    if !node.params.is_empty() {
                        let status = match_params(ctx, command, &node.params, state, level + 1);
                        if !status.is_ok() {
                            return status;
                        }
                    }
                }

                if param.optional && !param.order {
                    index = last_mandatory.map_or(0, |i| i + 1);
                } else {
                    last_mandatory = Some(index);
                    index += 1;
                }
            }
            None if param.optional => index += 1,
            None if arg.is_none() => break,
            None => {
                debug!(param = %param.name, arg = ?arg, "rejected mandatory parameter");
                return ParseStatus::BadParam;
            }
        }
    }

    if state.cursor >= argc
        && params
            .get(index..)
            .is_some_and(|rest| rest.iter().any(|p| !p.optional))
    {
        return ParseStatus::Partial;
    }

    let exhausted = index >= params.len();
    if level == 0 {
        if let Some(completion) = state.completion.as_mut()
            && let Some(args) = &command.args
            && completion.candidates.is_empty()
            && state.cursor <= argc
            && exhausted
        {
            trace!(param = %args.name, "offering args");
            completion.candidates.insert(args, "");
        }

        if state.cursor < argc && exhausted {
            let Some(args) = &command.args else {
                debug!(command = %command.name, leftover = argc - state.cursor, "no args parameter for leftover words");
                return ParseStatus::BadCmd;
            };
            let folded = fold_args(&tokens[state.cursor..]);
            state.cursor = argc;
            state.pargv.insert(args, folded);
        }
    }

    ParseStatus::Ok
}

fn applicable(ctx: &Context<'_>, param: &Param, pargv: &Pargv<'_>) -> bool {
    match &param.test {
        None => true,
        Some(expr) => line_test::evaluate(expr, &ctx.with_pargv(pargv)),
    }
}

/// Subcommands are offered only when the word typed so far prefixes them.
fn admissible(param: &Param, arg: Option<&str>) -> bool {
    match (param.subcommand_value(), arg) {
        (Some(keyword), Some(arg)) => nocase_prefix(keyword, arg),
        _ => true,
    }
}

fn offer_candidates<'g>(
    ctx: &Context<'_>,
    param: &'g Param,
    arg: Option<&str>,
    state: &mut MatchState<'g, '_>,
) {
    let Some(completion) = state.completion.as_mut() else {
        return;
    };
    if completion.target != state.cursor || state.pargv.contains(&param.name) {
        return;
    }
    let value = arg.unwrap_or("");
    match &param.mode {
        ParamMode::Switch { alternatives } => {
            for alt in alternatives {
                if applicable(ctx, alt, state.pargv) && admissible(alt, arg) {
                    trace!(param = %alt.name, cursor = state.cursor, "candidate");
                    completion.candidates.insert(alt, value);
                }
            }
        }
        ParamMode::Ordinary | ParamMode::Subcommand { .. } => {
            if admissible(param, arg) {
                trace!(param = %param.name, cursor = state.cursor, "candidate");
                completion.candidates.insert(param, value);
            }
        }
    }
}

/// Join leftover words into one args value, re-quoting words that were quoted.
fn fold_args(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| {
            let enc = escape_quoted(&t.text);
            if t.quoted { format!("\"{enc}\"") } else { enc }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
