//! This module defines the core data model shared by every layer of the
//! machine: symbols, control states, movements, transition rules, and the
//! error types returned by tape, table, and driver operations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::parser::Rule as ParseRule;

/// A single tape slot value: either the distinguished blank or a payload
/// value of the machine's alphabet.
///
/// `Blank` is what every never-written position reads as. It is a variant,
/// not a reserved payload value, so no alphabet value can collide with it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Symbol<A> {
    /// The unwritten-slot default.
    #[default]
    Blank,
    /// An ordinary alphabet value.
    Value(A),
}

impl<A> Symbol<A> {
    /// Returns `true` for the blank variant.
    pub fn is_blank(&self) -> bool {
        matches!(self, Symbol::Blank)
    }

    /// Returns the payload value, or `None` for blank.
    pub fn value(&self) -> Option<&A> {
        match self {
            Symbol::Blank => None,
            Symbol::Value(v) => Some(v),
        }
    }
}

impl<A: fmt::Display> fmt::Display for Symbol<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Blank => write!(f, "_"),
            Symbol::Value(v) => write!(f, "{v}"),
        }
    }
}

/// A named control state of the driver, carrying a halting flag.
///
/// Equality and hashing cover both fields: a state named `done` with the
/// halting flag set is a different state from a non-halting `done`. Table
/// lookups and halt detection rely on this.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlState {
    /// The state's name.
    pub name: String,
    /// Whether reaching this state stops a run.
    pub halting: bool,
}

impl ControlState {
    /// Creates a non-halting state.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            halting: false,
        }
    }

    /// Creates a halting state.
    pub fn halting(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            halting: true,
        }
    }
}

impl fmt::Display for ControlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.halting {
            write!(f, "[{}]", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// The directions a cursor can take after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Movement {
    /// Move the cursor one position to the left.
    Left,
    /// Move the cursor one position to the right.
    Right,
    /// Keep the cursor where it is.
    Stay,
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Movement::Left => "L",
            Movement::Right => "R",
            Movement::Stay => "S",
        };
        write!(f, "{s}")
    }
}

/// Error for movement tokens outside the supported set.
///
/// Unknown tokens are rejected here, at construction time; there is no
/// silent no-op movement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid movement: {0}")]
pub struct InvalidMovement(pub String);

impl FromStr for Movement {
    type Err = InvalidMovement;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" | "<" => Ok(Movement::Left),
            "R" | ">" => Ok(Movement::Right),
            "S" | "-" => Ok(Movement::Stay),
            other => Err(InvalidMovement(other.to_string())),
        }
    }
}

/// The read side of a rule: match one specific symbol, or any symbol the
/// state has no exact rule for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchSpec<A> {
    /// Match exactly this symbol (blank included).
    Symbol(Symbol<A>),
    /// Wildcard: match any symbol without an exact rule for this state.
    Any,
}

/// The write side of a rule: write one specific symbol, or leave the slot
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WriteSpec<A> {
    /// Write exactly this symbol (blank included, which erases the slot).
    Symbol(Symbol<A>),
    /// Inertia: keep whatever the slot currently holds.
    Keep,
}

/// A single transition rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule<A> {
    /// The state this rule fires from.
    pub from: ControlState,
    /// What the cursor must read for this rule to match.
    pub read: MatchSpec<A>,
    /// What to write before moving.
    pub write: WriteSpec<A>,
    /// Where the cursor moves after writing.
    pub movement: Movement,
    /// The state the driver enters next.
    pub to: ControlState,
}

/// Failure reported by a tape backing store.
///
/// The in-memory tape never produces one; substituted backing stores (a
/// disk-backed tape, say) surface their failures through this type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Backing store failure: {0}")]
pub struct TapeError(pub String);

/// Errors produced while stepping or running a machine.
///
/// `Display`, `Error`, and `From<TapeError>` are implemented by hand: a
/// derived `Error` impl would carry a `Box<MachineError<A>>: Error` bound
/// for the `RunFailed` source field, which no `A` can satisfy.
#[derive(Debug, Clone, PartialEq)]
pub enum MachineError<A> {
    /// A step was requested while the control state is already halting.
    AlreadyHalted(ControlState),
    /// The transition table holds no rules at all for the current state.
    NoRuleForState(ControlState),
    /// The state has rules, but none matches the symbol and no wildcard
    /// rule is registered.
    NoRuleForStateAndSymbol(ControlState, Symbol<A>),
    /// The tape backing store failed; propagated unchanged.
    BackingStore(TapeError),
    /// A `run` aborted: names the 1-based step at which the wrapped error
    /// occurred.
    RunFailed {
        /// The failing step, counting run's own invocations from 1.
        step: usize,
        /// The underlying step failure.
        source: Box<MachineError<A>>,
    },
}

impl<A: fmt::Debug> fmt::Display for MachineError<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MachineError::AlreadyHalted(state) => {
                write!(f, "Machine already halted in state {state}")
            }
            MachineError::NoRuleForState(state) => {
                write!(f, "No rule defined for state {state}")
            }
            MachineError::NoRuleForStateAndSymbol(state, symbol) => {
                write!(f, "No rule defined for state {state} and symbol {symbol:?}")
            }
            MachineError::BackingStore(source) => write!(f, "{source}"),
            MachineError::RunFailed { step, source } => {
                write!(f, "Execution failed at step {step}: {source}")
            }
        }
    }
}

impl<A: fmt::Debug + 'static> std::error::Error for MachineError<A> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MachineError::BackingStore(source) => Some(source),
            MachineError::RunFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl<A> From<TapeError> for MachineError<A> {
    fn from(source: TapeError) -> Self {
        MachineError::BackingStore(source)
    }
}

/// Errors produced by the textual program layer: parsing, validation,
/// loading, and encoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProgramError {
    /// An error during parsing of a program definition.
    #[error("Program parsing error: {0}")]
    Parse(#[from] Box<pest::error::Error<ParseRule>>),
    /// An error during validation of a program's structure or logic.
    #[error("Program validation error: {0}")]
    Validation(String),
    /// An error related to file system operations on program files.
    #[error("File error: {0}")]
    File(String),
    /// An error during JSON encoding or decoding of a program.
    #[error("JSON error: {0}")]
    Json(String),
}
