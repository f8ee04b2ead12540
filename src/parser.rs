//! This module provides the parser for tape-machine programs, utilizing the `pest` crate.
//! It defines functions to parse `.tur` input into a validated `Program` struct.

use crate::{
    analyzer::analyze,
    program::Program,
    types::{
        ControlState, MatchSpec, Movement, ProgramError, Rule as TransitionRule, Symbol, WriteSpec,
    },
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::Pair,
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;
use std::collections::HashSet;

/// Derives a `PestParser` for the program grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct ProgramParser;

/// Parses the given input string into a `Program` struct.
///
/// This is the main entry point for parsing program definitions. It trims
/// the input, parses it using the `ProgramParser`, and then processes the
/// resulting parse tree into a structured `Program`. The parsed program is
/// automatically validated before being returned.
///
/// # Arguments
///
/// * `input` - A string slice containing the program definition.
///
/// # Returns
///
/// * `Ok(Program)` if the input is successfully parsed and validated.
/// * `Err(ProgramError::Parse)` if there are any syntax or structural errors.
/// * `Err(ProgramError::Validation)` if the program fails the static checks.
pub fn parse(input: &str) -> Result<Program, ProgramError> {
    let root = ProgramParser::parse(Rule::program, input.trim())
        .map_err(|e| ProgramError::Parse(e.into()))?
        .next()
        .unwrap();

    let program = parse_program(root)?;

    // Analyze the parsed program
    analyze(&program)?;

    Ok(program)
}

/// Parses the top-level structure of a program from a `Pair<Rule::program>`.
///
/// This function extracts the program's name, tape, head position, halting
/// states, and rules. It also performs validation checks for uniqueness and
/// consistency of sections.
fn parse_program(pair: Pair<Rule>) -> Result<Program, ProgramError> {
    let mut name: Option<String> = None;
    let mut tape: Option<Vec<Symbol<char>>> = None;
    let mut head: Option<i64> = None;
    let mut halting: Option<Vec<(String, Span)>> = None;
    let mut rules: Option<Vec<TransitionRule<char>>> = None;
    let mut initial_state: Option<ControlState> = None;
    let mut seen = HashSet::new();

    // Parse top-level sections
    for p in pair.into_inner() {
        let span = p.as_span();
        let rule = p.as_rule();

        check_unique_rule(rule, span, &mut seen)?;

        match rule {
            Rule::name => name = Some(p.into_inner().next().unwrap().as_str().trim().into()),
            Rule::tape => tape = Some(p.into_inner().map(parse_cell).collect()),
            Rule::head => head = Some(parse_head(p)?),
            Rule::halting => {
                halting = Some(
                    p.into_inner()
                        .map(|state| (state.as_str().into(), state.as_span()))
                        .collect(),
                );
            }
            Rule::rules => {
                let halting_names = halting
                    .iter()
                    .flatten()
                    .map(|(state, _)| state.clone())
                    .collect();
                rules = Some(parse_rules(p, &halting_names, &mut initial_state)?);
            }
            _ => {} // Skip other rules
        }
    }

    // Handle mandatory checks
    let name = check_required_rule(name, "name")?;
    let rules = check_required_rule(rules, "rules")?;
    let initial_state = initial_state
        .ok_or_else(|| ProgramError::Validation("'rules' section defines no states".into()))?;

    // Every declared halting state must be the target of some rule. The
    // initial state is exempt: the machine starts there.
    let reached: HashSet<&str> = rules
        .iter()
        .filter(|rule| rule.to.halting)
        .map(|rule| rule.to.name.as_str())
        .collect();
    for (state, span) in halting.iter().flatten() {
        if state != &initial_state.name && !reached.contains(state.as_str()) {
            return Err(parse_error(
                &format!("Halting state '{state}' is never reached"),
                *span,
            ));
        }
    }

    Ok(Program {
        name,
        tape: tape.unwrap_or_default(),
        head: head.unwrap_or(0),
        initial_state,
        rules,
    })
}

/// Creates a `ProgramError::Parse` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> ProgramError {
    ProgramError::Parse(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}

/// Parses a head position from a `Pair<Rule::head>`, rejecting values that
/// do not fit the position type.
fn parse_head(pair: Pair<Rule>) -> Result<i64, ProgramError> {
    let int = pair.into_inner().next().unwrap();

    int.as_str()
        .parse::<i64>()
        .map_err(|_| parse_error("Invalid head position", int.as_span()))
}

/// Parses the rules section from a `Pair<Rule::rules>`.
///
/// It extracts each state's rules and sets the first encountered state as
/// the initial state. It also checks for duplicate rule blocks, duplicate
/// reads within a block, and rules defined on halting states.
fn parse_rules(
    pair: Pair<Rule>,
    halting: &HashSet<String>,
    initial_state: &mut Option<ControlState>,
) -> Result<Vec<TransitionRule<char>>, ProgramError> {
    let mut rules = Vec::new();
    let mut seen = HashSet::new();

    for block in pair.into_inner() {
        let span = block.as_span();
        let mut pairs = block.into_inner();
        let state = control_state(pairs.next().unwrap().as_str(), halting);

        // Set first state as initial state
        if initial_state.is_none() {
            *initial_state = Some(state.clone());
        }

        // Prevent duplicated rule blocks
        if !seen.insert(state.name.clone()) {
            return Err(parse_error(
                &format!("Duplicate rule block: {}", state.name),
                span,
            ));
        }

        let actions: Vec<Pair<Rule>> = pairs.collect();
        if state.halting && !actions.is_empty() {
            return Err(parse_error(
                &format!("Halting state '{}' cannot define rules", state.name),
                span,
            ));
        }
        if !state.halting && actions.is_empty() {
            return Err(parse_error(
                &format!("State '{}' defines no rules and is not halting", state.name),
                span,
            ));
        }

        // Prevent two rules on the same read within one block
        let mut seen_reads = HashSet::new();
        for action in actions {
            let span = action.as_span();
            let rule = parse_action(action, &state, halting)?;

            if !seen_reads.insert(rule.read.clone()) {
                return Err(parse_error(
                    &format!(
                        "Duplicate rule for state {} and read {:?}",
                        state.name, rule.read
                    ),
                    span,
                ));
            }

            rules.push(rule);
        }
    }

    Ok(rules)
}

/// Parses a single rule from a `Pair<Rule::action>`.
///
/// It extracts the read spec, write spec (defaults to keep if omitted),
/// movement, and next state.
fn parse_action(
    pair: Pair<Rule>,
    from: &ControlState,
    halting: &HashSet<String>,
) -> Result<TransitionRule<char>, ProgramError> {
    let mut pairs = pair.into_inner();
    let read = parse_match_spec(pairs.next().unwrap());

    // If `write` is omitted, the cell is left untouched
    let write = match pairs.peek().unwrap().as_rule() {
        Rule::movement => WriteSpec::Keep,
        _ => parse_write_spec(pairs.next().unwrap()),
    };

    let movement = pairs.next().unwrap();
    let movement = movement
        .as_str()
        .parse::<Movement>()
        .map_err(|e| parse_error(&e.to_string(), movement.as_span()))?;
    let to = control_state(pairs.next().unwrap().as_str(), halting);

    Ok(TransitionRule {
        from: from.clone(),
        read,
        write,
        movement,
        to,
    })
}

/// Parses a read spec, which is either a wildcard or a concrete cell.
fn parse_match_spec(pair: Pair<Rule>) -> MatchSpec<char> {
    let inner = pair.into_inner().next().unwrap();
    match inner.as_rule() {
        Rule::any => MatchSpec::Any,
        _ => MatchSpec::Symbol(parse_cell(inner)),
    }
}

/// Parses a write spec, which is either the keep marker or a concrete cell.
fn parse_write_spec(pair: Pair<Rule>) -> WriteSpec<char> {
    let inner = pair.into_inner().next().unwrap();
    match inner.as_rule() {
        Rule::keep => WriteSpec::Keep,
        _ => WriteSpec::Symbol(parse_cell(inner)),
    }
}

/// Parses a single cell, handling quoted symbols and the blank marker.
fn parse_cell(pair: Pair<Rule>) -> Symbol<char> {
    let inner = pair.into_inner().next().unwrap();
    match inner.as_rule() {
        Rule::blank => Symbol::Blank,
        _ => Symbol::Value(inner.as_str().trim_matches('\'').chars().next().unwrap()),
    }
}

/// Resolves a state name against the declared halting set.
fn control_state(name: &str, halting: &HashSet<String>) -> ControlState {
    if halting.contains(name) {
        ControlState::halting(name)
    } else {
        ControlState::new(name)
    }
}

/// Checks if a given section has already been declared, ensuring uniqueness
/// of top-level sections.
fn check_unique_rule(rule: Rule, span: Span, seen: &mut HashSet<Rule>) -> Result<(), ProgramError> {
    if !matches!(rule, Rule::name | Rule::tape | Rule::head | Rule::halting) {
        return Ok(());
    };

    if seen.contains(&rule) {
        return Err(parse_error(
            &format!("Duplicate \"{rule:?}:\" declaration"),
            span,
        ));
    }

    seen.insert(rule);

    Ok(())
}

/// Checks if a required section is present, returning an `Err` if it's missing.
fn check_required_rule<T>(value: Option<T>, name: &str) -> Result<T, ProgramError> {
    value.ok_or_else(|| ProgramError::Validation(format!("Missing '{name}' section")))
}
