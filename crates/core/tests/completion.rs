//! Candidate collection through `complete_line`.

mod common;

use common::{entries, shell};
use shellkit_core::{Completion, ParseStatus, Shell, complete_line, parse_line};

fn complete<'g>(shell: &'g Shell, line: &str) -> Completion<'g> {
    complete_line(shell, line).unwrap_or_else(|| panic!("{line:?}: no completion"))
}

fn names(completion: &Completion<'_>) -> Vec<String> {
    completion
        .candidates
        .names()
        .map(str::to_string)
        .collect()
}

#[test]
fn unresolved_command_has_no_completion() {
    let shell = shell();
    assert!(complete_line(&shell, "").is_none());
    assert!(complete_line(&shell, "dig").is_none());
    assert!(complete_line(&shell, "digits").is_none());
}

#[test]
fn unfilled_mandatory_offers_exactly_that_param() {
    let shell = shell();
    let c = complete(&shell, "digits ");
    assert_eq!(c.command.name, "digits");
    assert_eq!(c.status, ParseStatus::Partial);
    assert_eq!(c.prefix, "");
    assert_eq!(entries(&c.candidates), vec![("P", "")]);

    let c = complete(&shell, "digits 4");
    assert_eq!(c.prefix, "4");
    assert_eq!(entries(&c.candidates), vec![("P", "4")]);
}

#[test]
fn switch_offers_applicable_alternatives() {
    let shell = shell();
    let c = complete(&shell, "svc ");
    assert_eq!(names(&c), ["start", "stop"]);
    assert_eq!(c.status, ParseStatus::Partial);

    let mut advanced = common::shell();
    advanced.set_var("mode", "advanced");
    assert_eq!(names(&complete(&advanced, "svc ")), ["start", "stop", "restart"]);
}

#[test]
fn subcommands_are_filtered_by_partial_word() {
    let shell = shell();
    let c = complete(&shell, "svc st");
    assert_eq!(entries(&c.candidates), vec![("start", "st"), ("stop", "st")]);
    assert_eq!(names(&complete(&shell, "svc STO")), ["stop"]);
    assert!(complete(&shell, "svc x").candidates.is_empty());
}

#[test]
fn consumed_params_are_never_offered() {
    let shell = shell();
    assert_eq!(names(&complete(&shell, "pair x ")), ["verbose", "count"]);
    assert_eq!(names(&complete(&shell, "pair x verbose ")), ["count"]);
    assert_eq!(names(&complete(&shell, "pair x 3 ")), ["verbose"]);
    assert!(complete(&shell, "pair x 3 verbose ").candidates.is_empty());
}

#[test]
fn ordered_optionals_offer_only_later_siblings() {
    let shell = shell();
    assert_eq!(names(&complete(&shell, "ordered 1 ")), ["a", "b"]);
    assert_eq!(names(&complete(&shell, "ordered 1 a ")), ["b"]);
    assert!(complete(&shell, "ordered 1 b ").candidates.is_empty());
    assert_eq!(names(&complete(&shell, "mixed y ")), ["z"]);
}

#[test]
fn open_quote_keeps_the_space_in_the_word() {
    let shell = shell();
    let c = complete(&shell, "digits \"4 ");
    assert_eq!(c.prefix, "4 ");
    assert_eq!(entries(&c.candidates), vec![("P", "4 ")]);
    assert_eq!(c.status, ParseStatus::BadParam);
}

#[test]
fn untestable_params_are_never_offered() {
    let shell = shell();
    let c = complete(&shell, "route udp ");
    assert!(c.candidates.is_empty());
    assert_eq!(c.status, ParseStatus::Ok);
    assert_eq!(names(&complete(&shell, "route tcp ")), ["port"]);
}

#[test]
fn args_param_offered_when_nothing_else_fits() {
    let shell = shell();
    let c = complete(&shell, "echo ");
    assert_eq!(entries(&c.candidates), vec![("text", "")]);
    assert_eq!(c.status, ParseStatus::Ok);

    // An optional keyword is still possible, so args waits.
    assert_eq!(names(&complete(&shell, "log ")), ["debug"]);
    assert_eq!(names(&complete(&shell, "log hello ")), ["msg"]);
    assert!(complete(&shell, "digits ").candidates.contains("P"));
}

#[test]
fn trailing_optional_word_stays_under_cursor() {
    let shell = shell();

    // Both optionals accept the word being typed. Each is offered, each is
    // recorded with the cursor held on that word, and the unconsumed word
    // then has no args parameter to land in.
    let c = complete(&shell, "tune 5");
    assert_eq!(entries(&c.candidates), vec![("rate", "5"), ("burst", "5")]);
    assert_eq!(c.status, ParseStatus::BadCmd);

    // The same line parses normally outside completion.
    let outcome = parse_line(&shell, "tune 5");
    assert_eq!(outcome.status, ParseStatus::Ok);
    let pargv = outcome.pargv.expect("ok parse keeps the store");
    assert_eq!(entries(&pargv), vec![("rate", "5")]);

    // At a word boundary nothing is frozen.
    let c = complete(&shell, "tune 5 ");
    assert_eq!(entries(&c.candidates), vec![("burst", "")]);
    assert_eq!(c.status, ParseStatus::Ok);
}

#[test]
fn serializes_candidates_with_help() {
    let shell = shell();
    let json = serde_json::to_value(complete(&shell, "svc s")).expect("serializable");
    assert_eq!(json["command"], "svc");
    assert_eq!(json["prefix"], "s");
    assert_eq!(json["status"], "ok");
    assert_eq!(json["candidates"][0]["name"], "start");
    assert_eq!(json["candidates"][1]["name"], "stop");
    assert!(json["candidates"][0]["help"].is_null());
}
