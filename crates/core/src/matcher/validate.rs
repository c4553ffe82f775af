use crate::pargv::Pargv;
use crate::shell::Context;
use crate::strings::nocase_prefix;
use shellkit_grammar::{Action, PType, Param};
use tracing::{debug, warn};

/// Check `text` against `param` and return the accepted value.
///
/// Subcommand nodes first require `text` to prefix their keyword. Static
/// types then apply their rule; `code` types run their action in a scoped
/// sub-context (see [`validate_with_action`]). `None` means rejection.
pub fn validate_value(ctx: &Context<'_>, param: &Param, text: &str) -> Option<String> {
    if let Some(keyword) = param.subcommand_value()
        && !nocase_prefix(keyword, text)
    {
        return None;
    }
    let Some(ptype) = ctx.shell().grammar().ptype(&param.ptype) else {
        warn!(param = %param.name, ptype = %param.ptype, "unknown ptype");
        return None;
    };
    match ptype.action() {
        None => ptype.validate_static(text),
        Some(action) => validate_with_action(ctx, ptype, action, text),
    }
}

/// Validate `text` by running `action` with a single `value` parameter.
///
/// The action sees a copy of `ctx` whose action and result store are
/// replaced; the synthetic parameter and store live only for this call.
/// Non-zero exit rejects; non-empty output replaces the value; empty output
/// accepts `text` unchanged. Executor failures reject.
fn validate_with_action(
    ctx: &Context<'_>,
    ptype: &PType,
    action: &Action,
    text: &str,
) -> Option<String> {
    let value_param = Param::value_param(&ptype.name);
    let mut pargv = Pargv::new();
    pargv.insert(&value_param, text);
    let scoped = ctx.scoped(action, &pargv);

    let output = match ctx.shell().executor().execute(&scoped) {
        Ok(output) => output,
        Err(e) => {
            warn!(ptype = %ptype.name, error = %e, "validation action failed to run");
            return None;
        }
    };
    debug!(ptype = %ptype.name, text, status = output.status, "validation action finished");

    if !output.success() {
        return None;
    }
    if output.stdout.is_empty() {
        Some(text.to_string())
    } else {
        Some(output.stdout)
    }
}
