use std::collections::VecDeque;

use crate::error::MachineError;
use crate::symbol::{HEAD_MARKER, Symbol};

/// A tape that looks infinite in both directions but only stores the
/// occupied span.
///
/// Position 0 is always the leftmost stored cell. Everything outside
/// `0..len` reads as blank. The stored span never begins or ends with a
/// blank: writing a blank at or left of the left end removes the leftmost
/// cell, writing one onto the rightmost cell removes that cell (either way
/// along with any blanks it exposes), and writing a non-blank symbol just
/// past either end grows the tape by one cell.
///
/// Because growing or shrinking the left end renumbers every cell, `write`
/// returns the position the written cell now has, so the caller's head stays
/// on the same piece of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: VecDeque<Symbol>,
    delimiter: char,
}

impl Tape {
    /// Lay `input` onto a fresh tape, one symbol per character.
    pub fn from_input(input: &str, delimiter: char) -> Result<Self, MachineError> {
        let cells = input
            .chars()
            .map(|c| Symbol::from_char(c, delimiter))
            .collect::<Option<VecDeque<_>>>()
            .ok_or_else(|| MachineError::Rejected {
                input: input.to_string(),
                delimiter,
            })?;
        let mut tape = Self { cells, delimiter };
        tape.trim();
        Ok(tape)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Read the cell at `position`. Never fails: unstored cells are blank.
    pub fn read(&self, position: isize) -> Symbol {
        usize::try_from(position)
            .ok()
            .and_then(|i| self.cells.get(i).copied())
            .unwrap_or(Symbol::Blank)
    }

    /// Write `symbol` at `position` and return the position of that same
    /// cell after the tape has been renumbered.
    pub fn write(&mut self, position: isize, symbol: Symbol) -> isize {
        let len = self.cells.len() as isize;

        if symbol == Symbol::Blank {
            if position <= 0 {
                // At or left of the left end: the leftmost cell goes.
                let removed = self.trim_front();
                return position - removed as isize;
            }
            if position >= len {
                return position;
            }
            if position == len - 1 {
                self.cells.pop_back();
                self.trim_back();
                return position;
            }
            self.cells[position as usize] = Symbol::Blank;
            return position;
        }

        if position < 0 {
            // Cells between the new one and the old left end stay blank.
            for _ in 0..(-position - 1) {
                self.cells.push_front(Symbol::Blank);
            }
            self.cells.push_front(symbol);
            return 0;
        }
        if position >= len {
            for _ in 0..(position - len) {
                self.cells.push_back(Symbol::Blank);
            }
            self.cells.push_back(symbol);
            return position;
        }
        self.cells[position as usize] = symbol;
        position
    }

    /// The occupied span as a string.
    pub fn content(&self) -> String {
        self.cells
            .iter()
            .map(|s| s.to_char(self.delimiter))
            .collect()
    }

    /// The occupied span, widened to reach `position` if the head is off
    /// the stored cells, with the head marker in front of the head's cell.
    pub fn render_with_head(&self, position: isize) -> String {
        let len = self.cells.len() as isize;
        let start = position.min(0);
        let end = position.max(len - 1);
        let mut out = String::with_capacity((end - start + 2).max(1) as usize);
        for i in start..=end {
            if i == position {
                out.push(HEAD_MARKER);
            }
            out.push(self.read(i).to_char(self.delimiter));
        }
        out
    }

    /// Drop the leftmost cell and any blanks behind it. Returns how many
    /// cells were removed.
    fn trim_front(&mut self) -> usize {
        let mut removed = 0;
        if self.cells.pop_front().is_some() {
            removed += 1;
        }
        while self.cells.front() == Some(&Symbol::Blank) {
            self.cells.pop_front();
            removed += 1;
        }
        removed
    }

    fn trim_back(&mut self) {
        while self.cells.back() == Some(&Symbol::Blank) {
            self.cells.pop_back();
        }
    }

    fn trim(&mut self) {
        while self.cells.front() == Some(&Symbol::Blank) {
            self.cells.pop_front();
        }
        self.trim_back();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tape(s: &str) -> Tape {
        Tape::from_input(s, 'x').unwrap()
    }

    #[test]
    fn test_read_outside_is_blank() {
        let t = tape("10x1");
        assert_eq!(t.read(-1), Symbol::Blank);
        assert_eq!(t.read(-1000), Symbol::Blank);
        assert_eq!(t.read(4), Symbol::Blank);
        assert_eq!(t.read(isize::MAX), Symbol::Blank);
        assert_eq!(t.read(2), Symbol::Delimiter);
    }

    #[test]
    fn test_overwrite_in_place() {
        let mut t = tape("10x1");
        assert_eq!(t.write(1, Symbol::End), 1);
        assert_eq!(t.content(), "1yx1");
    }

    #[test]
    fn test_append_one_past_end() {
        let mut t = tape("10");
        assert_eq!(t.write(2, Symbol::End), 2);
        assert_eq!(t.content(), "10y");
    }

    #[test]
    fn test_blank_past_end_is_noop() {
        let mut t = tape("10");
        assert_eq!(t.write(2, Symbol::Blank), 2);
        assert_eq!(t.content(), "10");
    }

    #[test]
    fn test_blank_left_of_tape_erases_left_end() {
        let mut t = tape("10x1");
        assert_eq!(t.write(-1, Symbol::Blank), -2);
        assert_eq!(t.content(), "0x1");
        assert_eq!(t.write(-5, Symbol::Blank), -6);
        assert_eq!(t.content(), "x1");

        let mut empty = tape("");
        assert_eq!(empty.write(-1, Symbol::Blank), -1);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_insert_left_realigns() {
        let mut t = tape("10");
        assert_eq!(t.write(-1, Symbol::Shift), 0);
        assert_eq!(t.content(), "s10");
        assert_eq!(t.read(1), Symbol::One);
    }

    #[test]
    fn test_erase_left_end_realigns() {
        let mut t = tape("10x1");
        assert_eq!(t.write(0, Symbol::Blank), -1);
        assert_eq!(t.content(), "0x1");
        assert_eq!(t.read(0), Symbol::Zero);
    }

    #[test]
    fn test_erase_right_end_shrinks() {
        let mut t = tape("10x1");
        assert_eq!(t.write(3, Symbol::Blank), 3);
        assert_eq!(t.content(), "10x");
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn test_erase_ends_trims_exposed_blanks() {
        let mut t = tape("10x1");
        t.write(1, Symbol::Blank);
        t.write(2, Symbol::Blank);
        assert_eq!(t.content(), "1--1");
        t.write(3, Symbol::Blank);
        assert_eq!(t.content(), "1");

        let mut t = tape("10x1");
        t.write(1, Symbol::Blank);
        assert_eq!(t.write(0, Symbol::Blank), -2);
        assert_eq!(t.content(), "x1");
    }

    #[test]
    fn test_erase_everything() {
        let mut t = tape("1");
        assert_eq!(t.write(0, Symbol::Blank), -1);
        assert!(t.is_empty());
        assert_eq!(t.content(), "");
        assert_eq!(t.write(0, Symbol::Zero), 0);
        assert_eq!(t.content(), "0");
    }

    #[test]
    fn test_render_with_head() {
        let t = tape("10x1");
        assert_eq!(t.render_with_head(0), "Q10x1");
        assert_eq!(t.render_with_head(2), "10Qx1");
        assert_eq!(t.render_with_head(-2), "Q--10x1");
        assert_eq!(t.render_with_head(5), "10x1-Q-");
        assert_eq!(tape("").render_with_head(0), "Q-");
    }

    #[test]
    fn test_custom_delimiter() {
        let t = Tape::from_input("1*1", '*').unwrap();
        assert_eq!(t.read(1), Symbol::Delimiter);
        assert_eq!(t.content(), "1*1");
        assert!(Tape::from_input("1x1", '*').is_err());
    }
}
