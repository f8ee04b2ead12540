//! This module converts programs between their in-memory form and the two
//! document formats: canonical rule-format text and JSON.

use crate::analyzer::analyze;
use crate::parser::parse;
use crate::program::Program;
use crate::types::{MatchSpec, ProgramError, Symbol, WriteSpec};

/// Renders a program as canonical rule-format text.
///
/// Sections come out in a fixed order: `name`, then `tape` (omitted when the
/// initial tape is empty), `head` (omitted when it is 0), `halting`, and
/// `rules`. Rule blocks keep the initial state first and otherwise follow
/// the order in which states first appear in the rules; the write part is
/// always spelled out, with `=` for keep.
///
/// Any program that passes analysis survives a round trip through
/// [`decode`] unchanged, except that rules end up grouped by state. The
/// quote character itself has no textual representation.
///
/// # Arguments
///
/// * `program` - The program to render.
///
/// # Returns
///
/// * `String` - The canonical text.
pub fn encode(program: &Program) -> String {
    let mut sections = vec![format!("name: {}", program.name)];

    if !program.tape.is_empty() {
        sections.push(format!("tape: {}", encode_cells(&program.tape)));
    }

    if program.head != 0 {
        sections.push(format!("head: {}", program.head));
    }

    let halting = program.halting_states();
    if !halting.is_empty() {
        sections.push(format!("halting: {}", halting.join(", ")));
    }

    format!("{}\n\n{}\n", sections.join("\n"), encode_rules(program))
}

/// Parses rule-format text back into a program.
///
/// This is the inverse of [`encode`], though it accepts any valid source
/// text, canonical or not.
///
/// # Arguments
///
/// * `input` - The source text to parse.
///
/// # Returns
///
/// * `Ok(Program)` - The parsed and analyzed program.
/// * `Err(ProgramError)` - If parsing or analysis fails.
pub fn decode(input: &str) -> Result<Program, ProgramError> {
    parse(input)
}

/// Serializes a program to pretty-printed JSON.
///
/// # Arguments
///
/// * `program` - The program to serialize.
///
/// # Returns
///
/// * `Ok(String)` - The JSON document.
/// * `Err(ProgramError::Json)` - If serialization fails.
pub fn to_json(program: &Program) -> Result<String, ProgramError> {
    serde_json::to_string_pretty(program).map_err(|e| ProgramError::Json(e.to_string()))
}

/// Deserializes a program from JSON produced by [`to_json`].
///
/// The deserialized program goes through the same analysis as parsed source
/// text, so a document describing a program that can never halt is rejected
/// here rather than at run time.
///
/// # Arguments
///
/// * `input` - The JSON document.
///
/// # Returns
///
/// * `Ok(Program)` - The deserialized and analyzed program.
/// * `Err(ProgramError)` - If deserialization or analysis fails.
pub fn from_json(input: &str) -> Result<Program, ProgramError> {
    let program: Program =
        serde_json::from_str(input).map_err(|e| ProgramError::Json(e.to_string()))?;
    analyze(&program)?;
    Ok(program)
}

/// Renders the `rules:` section, one block per state.
fn encode_rules(program: &Program) -> String {
    let mut lines = vec!["rules:".to_string()];

    for state in block_order(program) {
        lines.push(format!("  {state}:"));
        for rule in program.rules.iter().filter(|rule| rule.from.name == state) {
            lines.push(format!(
                "    {} -> {}, {}, {}",
                encode_match_spec(&rule.read),
                encode_write_spec(&rule.write),
                rule.movement,
                rule.to.name
            ));
        }
    }

    lines.join("\n")
}

/// The initial state first, then the remaining from-states in first
/// appearance order.
fn block_order(program: &Program) -> Vec<String> {
    let mut order = vec![program.initial_state.name.clone()];

    for rule in &program.rules {
        if !order.contains(&rule.from.name) {
            order.push(rule.from.name.clone());
        }
    }

    order
}

fn encode_cells(cells: &[Symbol<char>]) -> String {
    cells.iter().map(encode_cell).collect::<Vec<_>>().join(", ")
}

fn encode_match_spec(read: &MatchSpec<char>) -> String {
    match read {
        MatchSpec::Any => "*".to_string(),
        MatchSpec::Symbol(symbol) => encode_cell(symbol),
    }
}

fn encode_write_spec(write: &WriteSpec<char>) -> String {
    match write {
        WriteSpec::Keep => "=".to_string(),
        WriteSpec::Symbol(symbol) => encode_cell(symbol),
    }
}

/// Renders one cell, quoting characters the bare form cannot carry.
fn encode_cell(symbol: &Symbol<char>) -> String {
    match symbol {
        Symbol::Blank => "_".to_string(),
        Symbol::Value(c) if is_reserved(*c) => format!("'{c}'"),
        Symbol::Value(c) => c.to_string(),
    }
}

fn is_reserved(c: char) -> bool {
    matches!(c, '\'' | '_' | '*' | '=' | ',' | ':' | '#' | '-') || c.is_whitespace()
}
