//! This module defines `Program`, the parsed description of a machine over
//! the `char` alphabet: a name, the initial tape and head position, the
//! initial state, and the transition rules. It also provides the one-call
//! `run` convenience producing a `RunOutcome` report.

use serde::{Deserialize, Serialize};

use crate::head::Head;
use crate::machine::Machine;
use crate::table::TransitionTable;
use crate::tape::InfiniteTape;
use crate::types::{ControlState, MachineError, Rule, Symbol};

/// A machine description with a `char` alphabet.
///
/// This is the document form of a program: what the parser produces, what
/// the encoder serializes, and what the registry stores. Building the
/// runtime pieces goes through [`Program::table`] and
/// [`Program::initial_tape`], or [`Program::run`] for the common case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Program {
    /// The program's name.
    pub name: String,
    /// Initial tape contents, written starting at position 0.
    pub tape: Vec<Symbol<char>>,
    /// Initial head position; may be negative or outside the initial tape.
    pub head: i64,
    /// The state the machine starts in.
    pub initial_state: ControlState,
    /// The transition rules, in declaration order.
    pub rules: Vec<Rule<char>>,
}

impl Program {
    /// Builds the transition table from the program's rules. Later
    /// duplicates of a `(state, read)` pair replace earlier ones.
    pub fn table(&self) -> TransitionTable<char> {
        self.rules.iter().cloned().collect()
    }

    /// Materializes the initial tape, its contents starting at position 0.
    pub fn initial_tape(&self) -> InfiniteTape<char> {
        let mut tape = InfiniteTape::new();
        tape.set(0, &self.tape);
        tape
    }

    /// Distinct halting state names, in first appearance order. The initial
    /// state comes first when it is itself halting.
    pub fn halting_states(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let states = std::iter::once(&self.initial_state)
            .chain(self.rules.iter().flat_map(|rule| [&rule.from, &rule.to]));
        for state in states {
            if state.halting && !names.iter().any(|n| n == &state.name) {
                names.push(state.name.clone());
            }
        }
        names
    }

    /// Assembles tape, head, and table, and runs the machine to halt.
    pub fn run(&self) -> Result<RunOutcome, MachineError<char>> {
        let table = self.table();
        let mut head = Head::new(self.initial_tape(), self.head);
        let mut machine = Machine::new(&mut head, &table, self.initial_state.clone());

        machine.run()?;
        let state = machine.state().clone();
        let steps = machine.steps();

        Ok(RunOutcome {
            state,
            steps,
            pos: head.pos(),
            min_pos: head.min_pos(),
            max_pos: head.max_pos(),
            tape: tape_window(head.tape(), head.min_pos(), head.max_pos()),
        })
    }
}

/// The result of running a program to halt: the final state, step count,
/// head position, walked extent, and the tape over that extent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunOutcome {
    /// The halting state the machine stopped in.
    pub state: ControlState,
    /// Number of executed steps.
    pub steps: usize,
    /// Final head position.
    pub pos: i64,
    /// Smallest position the head visited.
    pub min_pos: i64,
    /// Largest position the head visited.
    pub max_pos: i64,
    /// Tape contents over the walked extent, blanks rendered as `_`.
    pub tape: String,
}

/// Renders tape contents between `from` and `to` inclusive as symbols
/// separated by single spaces, blanks as `_`.
pub fn tape_window(tape: &InfiniteTape<char>, from: i64, to: i64) -> String {
    let mut cells = Vec::new();
    for i in from..=to {
        cells.push(tape.get(i).to_string());
    }
    cells.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MatchSpec, Movement, WriteSpec};

    fn zeroing_program(input: &str) -> Program {
        let zero = ControlState::new("zero");
        let halt = ControlState::halting("halt");
        Program {
            name: "Zero all".to_string(),
            tape: input.chars().map(Symbol::Value).collect(),
            head: 0,
            initial_state: zero.clone(),
            rules: vec![
                Rule {
                    from: zero.clone(),
                    read: MatchSpec::Any,
                    write: WriteSpec::Symbol(Symbol::Value('0')),
                    movement: Movement::Right,
                    to: zero.clone(),
                },
                Rule {
                    from: zero,
                    read: MatchSpec::Symbol(Symbol::Blank),
                    write: WriteSpec::Keep,
                    movement: Movement::Stay,
                    to: halt,
                },
            ],
        }
    }

    #[test]
    fn test_table_applies_upsert() {
        let mut program = zeroing_program("1");
        // shadow the wildcard rule with a later duplicate
        program.rules.push(Rule {
            from: ControlState::new("zero"),
            read: MatchSpec::Any,
            write: WriteSpec::Keep,
            movement: Movement::Left,
            to: ControlState::new("zero"),
        });

        let table = program.table();
        assert_eq!(table.len(), 2);
        let found = table
            .find(&ControlState::new("zero"), &Symbol::Value('1'))
            .unwrap();
        assert_eq!(found.movement, Movement::Left);
    }

    #[test]
    fn test_initial_tape_starts_at_zero() {
        let program = Program {
            name: "t".to_string(),
            tape: vec![Symbol::Value('a'), Symbol::Blank, Symbol::Value('b')],
            head: -4,
            initial_state: ControlState::new("s"),
            rules: Vec::new(),
        };

        let tape = program.initial_tape();
        assert_eq!(tape.get(0), Symbol::Value('a'));
        assert_eq!(tape.get(1), Symbol::Blank);
        assert_eq!(tape.get(2), Symbol::Value('b'));
        assert_eq!(tape.bounds(), Some((0, 2)));
    }

    #[test]
    fn test_halting_states_deduplicated_in_order() {
        let program = zeroing_program("1");
        assert_eq!(program.halting_states(), vec!["halt".to_string()]);
    }

    #[test]
    fn test_run_reports_outcome() {
        let outcome = zeroing_program("11").run().unwrap();

        assert_eq!(outcome.state, ControlState::halting("halt"));
        assert_eq!(outcome.steps, 3);
        assert_eq!(outcome.pos, 2);
        assert_eq!(outcome.min_pos, 0);
        assert_eq!(outcome.max_pos, 2);
        assert_eq!(outcome.tape, "0 0 _");
    }

    #[test]
    fn test_run_surfaces_step_failure() {
        let mut program = zeroing_program("11");
        // narrow the rules so the blank after the input has no match
        program.rules.truncate(1);
        program.rules[0].read = MatchSpec::Symbol(Symbol::Value('1'));

        let err = program.run().unwrap_err();
        assert!(matches!(err, MachineError::RunFailed { step: 3, .. }));
    }

    #[test]
    fn test_tape_window_renders_blanks() {
        let mut tape = InfiniteTape::new();
        tape.set(-1, &[Symbol::Value('1'), Symbol::Blank, Symbol::Value('0')]);

        assert_eq!(tape_window(&tape, -2, 2), "_ 1 _ 0 _");
        assert_eq!(tape_window(&tape, 0, 0), "_");
    }
}
