//! This module defines the storage layer: the `Tape` capability trait over
//! arbitrary integer positions and `InfiniteTape`, the in-memory
//! bidirectionally growable implementation backing ordinary runs.

use crate::types::{Symbol, TapeError};

/// Read/write capability over a semantically infinite sequence of symbol
/// slots addressed by arbitrary, possibly negative, positions.
///
/// The in-memory implementation never fails; the contract returns `Result`
/// so substituted backing stores (for example a disk-backed tape) can
/// signal failures, which the cursor and driver propagate unchanged.
pub trait Tape {
    /// The payload type stored in non-blank slots.
    type Alphabet;

    /// Returns the symbol at `pos`. Positions never written read as
    /// `Symbol::Blank`.
    fn read(&self, pos: i64) -> Result<Symbol<Self::Alphabet>, TapeError>;

    /// Writes `symbols` starting at `pos`, covering
    /// `pos ..= pos + symbols.len() - 1` and growing storage as needed.
    /// Writing an empty slice is a no-op.
    fn write(&mut self, pos: i64, symbols: &[Symbol<Self::Alphabet>]) -> Result<(), TapeError>;
}

impl<T: Tape + ?Sized> Tape for &mut T {
    type Alphabet = T::Alphabet;

    fn read(&self, pos: i64) -> Result<Symbol<Self::Alphabet>, TapeError> {
        (**self).read(pos)
    }

    fn write(&mut self, pos: i64, symbols: &[Symbol<Self::Alphabet>]) -> Result<(), TapeError> {
        (**self).write(pos, symbols)
    }
}

/// Growable bidirectional tape over a contiguous buffer.
///
/// Only the span between the lowest and highest written positions is
/// materialized; `offset` maps logical positions into the buffer
/// (`index = pos + offset`). Growth recomputes the absolute bounds,
/// reallocates once, and remaps existing content, so a write extending the
/// span on the left, the right, or both sides at once behaves identically.
/// The buffer never shrinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfiniteTape<A> {
    buf: Vec<Symbol<A>>,
    offset: i64,
}

impl<A> InfiniteTape<A> {
    /// Creates an empty tape; every position reads blank.
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            offset: 0,
        }
    }

    /// Returns the inclusive logical bounds of the materialized span, or
    /// `None` while nothing has been written.
    pub fn bounds(&self) -> Option<(i64, i64)> {
        if self.buf.is_empty() {
            None
        } else {
            let lo = -self.offset;
            Some((lo, lo + self.buf.len() as i64 - 1))
        }
    }
}

impl<A: Clone> InfiniteTape<A> {
    /// Returns the symbol at `pos`; blank outside the materialized span.
    pub fn get(&self, pos: i64) -> Symbol<A> {
        let idx = pos + self.offset;
        if idx < 0 || idx >= self.buf.len() as i64 {
            return Symbol::Blank;
        }
        self.buf[idx as usize].clone()
    }

    /// Writes `symbols` starting at `pos`, growing the buffer when the
    /// write falls outside the current span. Gaps opened between old and
    /// new content stay blank.
    pub fn set(&mut self, pos: i64, symbols: &[Symbol<A>]) {
        if symbols.is_empty() {
            return;
        }
        let span_hi = pos + symbols.len() as i64 - 1;
        let current = self.bounds();
        let (lo, hi) = match current {
            Some((cur_lo, cur_hi)) => (cur_lo.min(pos), cur_hi.max(span_hi)),
            None => (pos, span_hi),
        };
        if current != Some((lo, hi)) {
            let mut grown = vec![Symbol::Blank; (hi - lo + 1) as usize];
            if let Some((cur_lo, _)) = current {
                let shift = (cur_lo - lo) as usize;
                for (i, symbol) in std::mem::take(&mut self.buf).into_iter().enumerate() {
                    grown[shift + i] = symbol;
                }
            }
            self.buf = grown;
            self.offset = -lo;
        }
        let start = (pos + self.offset) as usize;
        self.buf[start..start + symbols.len()].clone_from_slice(symbols);
    }
}

impl<A> Default for InfiniteTape<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Clone> Tape for InfiniteTape<A> {
    type Alphabet = A;

    fn read(&self, pos: i64) -> Result<Symbol<A>, TapeError> {
        Ok(self.get(pos))
    }

    fn write(&mut self, pos: i64, symbols: &[Symbol<A>]) -> Result<(), TapeError> {
        self.set(pos, symbols);
        Ok(())
    }
}
