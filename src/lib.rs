//! This crate provides the core logic for a Turing machine simulator over an
//! arbitrary alphabet. It includes modules for the tape, head, and
//! transition-table primitives, the machine driver built on top of them,
//! parsing and analyzing programs in the textual rule format, and a registry
//! of embedded example programs.
//!
//! The runtime is generic over the alphabet; the program format fixes it to
//! `char`:
//!
//! ```
//! use tapevm::{
//!     ControlState, Head, InfiniteTape, Machine, MatchSpec, Movement, Rule, Symbol,
//!     TransitionTable, WriteSpec,
//! };
//!
//! let zero = ControlState::new("zero");
//! let done = ControlState::halting("done");
//! let table: TransitionTable<i32> = [
//!     Rule {
//!         from: zero.clone(),
//!         read: MatchSpec::Any,
//!         write: WriteSpec::Symbol(Symbol::Value(0)),
//!         movement: Movement::Right,
//!         to: zero.clone(),
//!     },
//!     Rule {
//!         from: zero.clone(),
//!         read: MatchSpec::Symbol(Symbol::Blank),
//!         write: WriteSpec::Keep,
//!         movement: Movement::Stay,
//!         to: done,
//!     },
//! ]
//! .into_iter()
//! .collect();
//!
//! let mut tape = InfiniteTape::new();
//! tape.set(0, &[Symbol::Value(4), Symbol::Value(7), Symbol::Value(9)]);
//!
//! let mut head = Head::new(tape, 0);
//! let mut machine = Machine::new(&mut head, &table, zero);
//! machine.run()?;
//!
//! assert!(machine.is_halted());
//! assert_eq!(head.pos(), 3);
//! assert_eq!(head.tape().get(1), Symbol::Value(0));
//! # Ok::<(), tapevm::MachineError<i32>>(())
//! ```

pub mod analyzer;
pub mod encoder;
pub mod head;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod program;
pub mod programs;
pub mod table;
pub mod tape;
pub mod types;

/// Re-exports the parser's `pest`-generated rule enum under a name that does
/// not collide with the transition [`Rule`].
pub use crate::parser::Rule as ParseRule;
/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the encoding functions from the encoder module.
pub use encoder::{decode, encode, from_json, to_json};
/// Re-exports the `Head` struct from the head module.
pub use head::Head;
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the `Machine` driver from the machine module.
pub use machine::Machine;
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports the `Program` document, the `RunOutcome` report, and the
/// `tape_window` helper from the program module.
pub use program::{tape_window, Program, RunOutcome};
/// Re-exports `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the `TransitionTable` struct from the table module.
pub use table::TransitionTable;
/// Re-exports the `InfiniteTape` struct and the `Tape` trait from the tape module.
pub use tape::{InfiniteTape, Tape};
/// Re-exports the machine definition and error types from the types module.
pub use types::{
    ControlState, InvalidMovement, MachineError, MatchSpec, Movement, ProgramError, Rule, Symbol,
    TapeError, WriteSpec,
};
