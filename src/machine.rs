//! This module defines `Machine`, the execution driver: it reads the symbol
//! under the head, looks up the matching rule, applies the rule's write and
//! movement, and tracks the control state across steps and runs.

use std::hash::Hash;

use crate::head::Head;
use crate::table::TransitionTable;
use crate::tape::Tape;
use crate::types::{ControlState, MachineError, WriteSpec};

/// A machine executing one program over one head.
///
/// The machine borrows the head and the table, so both stay inspectable by
/// the caller after a run. The current control state is owned here and
/// changes once per successful step.
pub struct Machine<'a, T: Tape> {
    head: &'a mut Head<T>,
    table: &'a TransitionTable<T::Alphabet>,
    state: ControlState,
    steps: usize,
}

impl<'a, T: Tape> Machine<'a, T>
where
    T::Alphabet: Clone + Eq + Hash,
{
    /// Creates a machine over `head` and `table`, starting in `initial`.
    pub fn new(
        head: &'a mut Head<T>,
        table: &'a TransitionTable<T::Alphabet>,
        initial: ControlState,
    ) -> Self {
        Self {
            head,
            table,
            state: initial,
            steps: 0,
        }
    }

    /// Executes one transition.
    ///
    /// Fails with [`MachineError::AlreadyHalted`] when the current state is
    /// halting, and with the table's lookup error when no rule covers the
    /// symbol under the head; lookup failures leave tape, position, and
    /// state untouched. On a match the rule's write is applied unless it is
    /// the keep directive, the movement is applied, and the control state
    /// becomes the rule's target.
    pub fn step(&mut self) -> Result<(), MachineError<T::Alphabet>> {
        if self.state.halting {
            return Err(MachineError::AlreadyHalted(self.state.clone()));
        }

        let symbol = self.head.read()?;
        let rule = self.table.find(&self.state, &symbol)?.clone();

        if let WriteSpec::Symbol(out) = rule.write {
            self.head.write(out)?;
        }
        self.head.advance(rule.movement);
        self.state = rule.to;
        self.steps += 1;

        Ok(())
    }

    /// Steps until the control state is halting.
    ///
    /// Returns immediately when the machine is already halted. On a step
    /// failure, stops and wraps the cause in
    /// [`MachineError::RunFailed`] together with the failing step index,
    /// counting this call's own step attempts from 1. Never bounds the
    /// number of steps; callers wanting interruption drive [`Machine::step`]
    /// in their own loop.
    pub fn run(&mut self) -> Result<(), MachineError<T::Alphabet>> {
        let mut step = 1;
        while !self.state.halting {
            self.step().map_err(|source| MachineError::RunFailed {
                step,
                source: Box::new(source),
            })?;
            step += 1;
        }
        Ok(())
    }

    /// The current control state.
    pub fn state(&self) -> &ControlState {
        &self.state
    }

    /// Returns `true` once the control state is halting.
    pub fn is_halted(&self) -> bool {
        self.state.halting
    }

    /// Total successful steps executed by this machine.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The head driven by this machine.
    pub fn head(&self) -> &Head<T> {
        &*self.head
    }
}
