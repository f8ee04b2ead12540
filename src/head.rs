//! This module defines `Head`, the cursor bound to a tape: it owns the
//! current position, tracks the extent of every position visited since
//! binding, and delegates reads and writes to the underlying storage.

use std::fmt;
use std::fmt::Write as _;

use crate::tape::Tape;
use crate::types::{Movement, Symbol, TapeError};

/// A positioned read/write cursor over a tape.
///
/// `T` may own the tape or borrow it (`&mut` tapes implement [`Tape`] too),
/// so callers can keep the tape around and inspect it after a run. A head
/// is always bound; rebinding goes through [`Head::bind`].
#[derive(Debug)]
pub struct Head<T> {
    tape: T,
    pos: i64,
    min_pos: i64,
    max_pos: i64,
}

impl<T: Tape> Head<T> {
    /// Binds a new head to `tape` at `pos`. Both extent trackers start at
    /// `pos`.
    pub fn new(tape: T, pos: i64) -> Self {
        Self {
            tape,
            pos,
            min_pos: pos,
            max_pos: pos,
        }
    }

    /// Rebinds the head to another tape, resetting position and extent
    /// tracking. Returns the previously bound tape.
    pub fn bind(&mut self, tape: T, pos: i64) -> T {
        self.pos = pos;
        self.min_pos = pos;
        self.max_pos = pos;
        std::mem::replace(&mut self.tape, tape)
    }

    /// Unbinds the head, handing the tape back.
    pub fn into_inner(self) -> T {
        self.tape
    }

    /// Applies a movement, widening the visited extent when the new
    /// position falls outside it.
    pub fn advance(&mut self, movement: Movement) {
        match movement {
            Movement::Left => {
                self.pos -= 1;
                if self.pos < self.min_pos {
                    self.min_pos = self.pos;
                }
            }
            Movement::Right => {
                self.pos += 1;
                if self.pos > self.max_pos {
                    self.max_pos = self.pos;
                }
            }
            Movement::Stay => {}
        }
    }

    /// Reads the symbol under the head.
    pub fn read(&self) -> Result<Symbol<T::Alphabet>, TapeError> {
        self.tape.read(self.pos)
    }

    /// Writes a symbol under the head.
    pub fn write(&mut self, symbol: Symbol<T::Alphabet>) -> Result<(), TapeError> {
        self.tape.write(self.pos, &[symbol])
    }

    /// The current position.
    pub fn pos(&self) -> i64 {
        self.pos
    }

    /// The smallest position visited since binding.
    pub fn min_pos(&self) -> i64 {
        self.min_pos
    }

    /// The largest position visited since binding.
    pub fn max_pos(&self) -> i64 {
        self.max_pos
    }

    /// The bound tape.
    pub fn tape(&self) -> &T {
        &self.tape
    }

    /// Renders the tape between `from` and `to` inclusive, one position per
    /// line, with the head's current position marked.
    pub fn render(&self, from: i64, to: i64) -> Result<String, TapeError>
    where
        T::Alphabet: fmt::Display,
    {
        let mut out = String::new();
        for i in from..=to {
            let symbol = self.tape.read(i)?;
            if self.pos == i {
                let _ = writeln!(out, "[{i}: {symbol}]");
            } else {
                let _ = writeln!(out, " {i}: {symbol}");
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tape::InfiniteTape;

    #[test]
    fn test_new_binds_at_position() {
        let head = Head::new(InfiniteTape::<char>::new(), 7);

        assert_eq!(head.pos(), 7);
        assert_eq!(head.min_pos(), 7);
        assert_eq!(head.max_pos(), 7);
    }

    #[test]
    fn test_read_delegates_to_current_position() {
        let mut tape = InfiniteTape::new();
        tape.set(5, &[Symbol::Value("bananas")]);

        let head = Head::new(tape, 5);
        assert_eq!(head.read().unwrap(), Symbol::Value("bananas"));
    }

    #[test]
    fn test_write_delegates_to_current_position() {
        let mut head = Head::new(InfiniteTape::new(), -2);
        head.write(Symbol::Value('x')).unwrap();

        assert_eq!(head.tape().get(-2), Symbol::Value('x'));
        assert_eq!(head.tape().get(0), Symbol::Blank);
    }

    #[test]
    fn test_advance_updates_position_and_extent() {
        let mut head = Head::new(InfiniteTape::<char>::new(), 0);

        head.advance(Movement::Left);
        head.advance(Movement::Left);
        assert_eq!(head.pos(), -2);
        assert_eq!(head.min_pos(), -2);
        assert_eq!(head.max_pos(), 0);

        head.advance(Movement::Right);
        head.advance(Movement::Right);
        head.advance(Movement::Right);
        assert_eq!(head.pos(), 1);
        assert_eq!(head.min_pos(), -2);
        assert_eq!(head.max_pos(), 1);

        head.advance(Movement::Stay);
        assert_eq!(head.pos(), 1);
        assert_eq!(head.min_pos(), -2);
        assert_eq!(head.max_pos(), 1);
    }

    #[test]
    fn test_left_then_right_returns_to_origin() {
        let mut head = Head::new(InfiniteTape::<char>::new(), 3);
        head.advance(Movement::Left);
        head.advance(Movement::Right);

        assert_eq!(head.pos(), 3);
        assert_eq!(head.min_pos(), 2);
        assert_eq!(head.max_pos(), 3);
    }

    #[test]
    fn test_bind_resets_extent_and_returns_previous_tape() {
        let mut first = InfiniteTape::new();
        first.set(0, &[Symbol::Value('a')]);

        let mut head = Head::new(first, 0);
        head.advance(Movement::Right);
        head.advance(Movement::Right);

        let previous = head.bind(InfiniteTape::new(), 10);
        assert_eq!(previous.get(0), Symbol::Value('a'));
        assert_eq!(head.pos(), 10);
        assert_eq!(head.min_pos(), 10);
        assert_eq!(head.max_pos(), 10);
        assert_eq!(head.read().unwrap(), Symbol::Blank);
    }

    #[test]
    fn test_into_inner_returns_tape() {
        let mut head = Head::new(InfiniteTape::new(), 4);
        head.write(Symbol::Value('k')).unwrap();

        let tape = head.into_inner();
        assert_eq!(tape.get(4), Symbol::Value('k'));
    }

    #[test]
    fn test_head_over_borrowed_tape() {
        let mut tape = InfiniteTape::new();
        {
            let mut head = Head::new(&mut tape, 1);
            head.write(Symbol::Value('z')).unwrap();
            head.advance(Movement::Right);
            assert_eq!(head.pos(), 2);
        }
        assert_eq!(tape.get(1), Symbol::Value('z'));
    }

    #[test]
    fn test_render_marks_head_position() {
        let mut tape = InfiniteTape::new();
        tape.set(0, &[Symbol::Value('a'), Symbol::Value('b')]);

        let head = Head::new(tape, 1);
        let rendered = head.render(-1, 2).unwrap();

        assert_eq!(rendered, " -1: _\n 0: a\n[1: b]\n 2: _\n");
    }
}
