//! This module provides functions for analyzing programs to detect common
//! errors and inconsistencies before execution. This includes checks for
//! halting behavior, defined states, reachable states, and handled tape
//! symbols.

use crate::program::Program;
use crate::types::{MatchSpec, ProgramError, Symbol};
use std::collections::HashSet;

/// Represents various errors that can be found during the analysis of a program.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// Indicates that no rule targets a halting state, so the machine can
    /// never halt regularly.
    NoHaltingStates,
    /// Indicates that rules reference working states that no rule block
    /// defines.
    UndefinedStates(Vec<String>),
    /// Indicates states that are defined in the program's rules but cannot
    /// be reached from the initial state.
    UnreachableStates(Vec<String>),
    /// Indicates that the initial tape contains symbols for which no rule
    /// is defined.
    UnhandledSymbols(Vec<Symbol<char>>),
}

impl From<AnalysisError> for ProgramError {
    /// Converts an `AnalysisError` into a `ProgramError::Validation`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::NoHaltingStates => {
                ProgramError::Validation("No rule targets a halting state".to_string())
            }
            AnalysisError::UndefinedStates(states) => ProgramError::Validation(format!(
                "Rules reference undefined states: {:?}",
                states
            )),
            AnalysisError::UnreachableStates(states) => ProgramError::Validation(format!(
                "Unreachable states detected: {:?}",
                states
            )),
            AnalysisError::UnhandledSymbols(symbols) => ProgramError::Validation(format!(
                "Initial tape contains symbols not handled by any rule: {:?}",
                symbols
            )),
        }
    }
}

/// Analyzes a given `Program` for structural and logical errors.
///
/// This function orchestrates a series of checks covering halting behavior,
/// state references, reachability, and symbol handling.
///
/// # Arguments
///
/// * `program` - A reference to the `Program` to be analyzed.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(ProgramError::Validation)` if any check fails.
pub fn analyze(program: &Program) -> Result<(), ProgramError> {
    let errors = [
        check_halting_states,
        check_undefined_states,
        check_unreachable_states,
        check_tape_symbols,
    ]
    .iter()
    .filter_map(|f| f(program).err())
    .collect::<Vec<_>>();

    // Return the first error
    if let Some(first_error) = errors.first() {
        return Err(first_error.clone().into());
    }

    Ok(())
}

/// Checks that the machine can halt at all.
///
/// A program halts regularly when some rule moves into a halting state, or
/// when its initial state is itself halting.
fn check_halting_states(program: &Program) -> Result<(), AnalysisError> {
    if program.initial_state.halting {
        return Ok(());
    }

    if !program.rules.iter().any(|rule| rule.to.halting) {
        return Err(AnalysisError::NoHaltingStates);
    }

    Ok(())
}

/// Checks that every referenced working state is defined by a rule block.
///
/// Halting states are implicitly defined and need no rules of their own.
fn check_undefined_states(program: &Program) -> Result<(), AnalysisError> {
    let defined: HashSet<&str> = program
        .rules
        .iter()
        .map(|rule| rule.from.name.as_str())
        .collect();

    let referenced =
        std::iter::once(&program.initial_state).chain(program.rules.iter().map(|rule| &rule.to));
    let mut undefined: Vec<String> = referenced
        .filter(|state| !state.halting && !defined.contains(state.name.as_str()))
        .map(|state| state.name.clone())
        .collect();

    if !undefined.is_empty() {
        undefined.sort();
        undefined.dedup();
        return Err(AnalysisError::UndefinedStates(undefined));
    }

    Ok(())
}

/// Checks for unreachable states by traversing the state graph starting
/// from the initial state.
///
/// Any state defined in the program's rules that cannot be reached from the
/// initial state through any sequence of rules is considered unreachable.
fn check_unreachable_states(program: &Program) -> Result<(), AnalysisError> {
    let mut visited = HashSet::new();
    let mut queue = vec![program.initial_state.name.clone()];

    while let Some(state) = queue.pop() {
        if visited.contains(&state) {
            continue;
        }

        visited.insert(state.clone());

        for rule in program.rules.iter().filter(|rule| rule.from.name == state) {
            if !visited.contains(&rule.to.name) {
                queue.push(rule.to.name.clone());
            }
        }
    }

    let all_states: HashSet<String> = program
        .rules
        .iter()
        .map(|rule| rule.from.name.clone())
        .collect();
    let mut unreachable: Vec<String> = all_states.difference(&visited).cloned().collect();

    if !unreachable.is_empty() {
        unreachable.sort(); // Sort for deterministic output
        return Err(AnalysisError::UnreachableStates(unreachable));
    }

    Ok(())
}

/// Checks that all symbols present in the initial tape have a rule that can
/// read them.
///
/// This prevents the machine from getting stuck right away due to an
/// unhandled symbol on the tape. A single wildcard read handles every
/// symbol, so its presence satisfies the check.
fn check_tape_symbols(program: &Program) -> Result<(), AnalysisError> {
    let tape_symbols: HashSet<Symbol<char>> = program.tape.iter().copied().collect();

    // Nothing to check on an empty tape
    if tape_symbols.is_empty() {
        return Ok(());
    }

    if program.rules.iter().any(|rule| rule.read == MatchSpec::Any) {
        return Ok(());
    }

    let handled: HashSet<Symbol<char>> = program
        .rules
        .iter()
        .filter_map(|rule| match rule.read {
            MatchSpec::Symbol(symbol) => Some(symbol),
            MatchSpec::Any => None,
        })
        .collect();

    let mut unhandled: Vec<Symbol<char>> = tape_symbols.difference(&handled).copied().collect();

    if !unhandled.is_empty() {
        unhandled.sort(); // Sort for deterministic output
        return Err(AnalysisError::UnhandledSymbols(unhandled));
    }

    Ok(())
}
