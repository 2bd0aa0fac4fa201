use crate::acceptance::{DEFAULT_DELIMITER, is_accepted_with};
use crate::error::MachineError;
use crate::head::{Head, Mode};
use crate::scan::Scan;
use crate::symbol::{Symbol, is_reserved};

use Symbol::{
    Blank, Consumed, Delimiter, End, One, Shift, StandInOne, StandInZero, Tenner, Zero,
};

/// Configuration for a single multiplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineConfig {
    /// Character separating the two factors on the input tape.
    pub delimiter: char,
    /// Whether every move is traced.
    pub mode: Mode,
    /// Maximum number of head moves before giving up (`None` for no limit).
    pub step_limit: Option<u64>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            mode: Mode::Run,
            step_limit: Some(1 << 32),
        }
    }
}

/// Control point of the multiplication procedure.
///
/// Each phase leaves the head at a fixed landmark that the next phase
/// starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// A first factor of exactly `0` is replaced by the result `0`.
    ZeroCheck,
    /// Mark the right end of the second factor with `y`.
    EndMark,
    /// Walk to the delimiter.
    DigitScan,
    /// Consume the lowest unconsumed digit of the first factor. A `1` appends
    /// a new term: the second factor followed by one `s` per digit already
    /// consumed.
    ///
    /// A `0` digit only becomes `d`; the shift it owes the later terms is
    /// carried by that `d`. `z` exists only while a `1` is being handled:
    /// each consumed digit flips to `z` as its `s` is written and back to `d`
    /// afterwards, so no `z` is on the tape between two advances.
    Dispatch,
    /// Turn every `s` into a literal trailing `0`.
    PlaceValue,
    /// Erase both factors up to and including the first `y`.
    InputRemoval,
    /// Add the leftmost term into the next one, one pass per advance.
    Addition,
    /// Drop the start marker, the last `y` and leading zeros.
    Cleanup,
    Done,
}

/// Carry held in the control state between two columns of an addition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Carry {
    Clear,
    Pending,
}

/// One column of an addition: top digit, bottom digit and incoming carry
/// give the stand-in for the sum digit and the outgoing carry. `None` if
/// either cell is not a digit.
fn add_column(top: Symbol, bottom: Symbol, carry: Carry) -> Option<(Symbol, Carry)> {
    use Carry::{Clear, Pending};
    let column = match (top, bottom, carry) {
        (Zero, Zero, Clear) => (StandInZero, Clear),
        (Zero, One, Clear) | (One, Zero, Clear) | (Zero, Zero, Pending) => (StandInOne, Clear),
        (One, One, Clear) | (Zero, One, Pending) | (One, Zero, Pending) => (StandInZero, Pending),
        (One, One, Pending) => (StandInOne, Pending),
        _ => return None,
    };
    Some(column)
}

/// A single-tape Turing machine that multiplies two binary numbers.
///
/// The machine only ever moves its head one cell, reads, and writes. A
/// multiplier is single-use: build a fresh one for every product.
///
/// ```
/// use tapemul::multiplier::Multiplier;
///
/// let mut m = Multiplier::new("1101x10001").unwrap();
/// m.calculate().unwrap();
/// assert_eq!(m.tape_content(), "11011101");
/// ```
#[derive(Debug, Clone)]
pub struct Multiplier {
    head: Head,
    phase: Phase,
}

impl Multiplier {
    pub fn new(input: &str) -> Result<Self, MachineError> {
        Self::with_config(input, MachineConfig::default())
    }

    pub fn with_config(input: &str, config: MachineConfig) -> Result<Self, MachineError> {
        if is_reserved(config.delimiter) {
            return Err(MachineError::ReservedDelimiter(config.delimiter));
        }
        if !is_accepted_with(input, config.delimiter) {
            return Err(MachineError::Rejected {
                input: input.to_string(),
                delimiter: config.delimiter,
            });
        }
        let head = Head::new(input, config.delimiter, config.step_limit)?.with_mode(config.mode);
        Ok(Self {
            head,
            phase: Phase::ZeroCheck,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of head moves made so far.
    pub fn steps(&self) -> u64 {
        self.head.steps()
    }

    /// The occupied part of the tape. After [`calculate`](Self::calculate)
    /// this is the product in binary.
    pub fn tape_content(&self) -> String {
        self.head.tape().content()
    }

    /// The tape with a `Q` in front of the cell under the head.
    pub fn render_with_head(&self) -> String {
        self.head.render()
    }

    /// Run every remaining phase.
    pub fn calculate(&mut self) -> Result<(), MachineError> {
        while self.phase != Phase::Done {
            self.advance()?;
        }
        Ok(())
    }

    /// Do one unit of work and return the phase that comes next.
    ///
    /// `Dispatch` consumes one digit of the first factor per call and
    /// `Addition` performs one pairwise addition per call; every other phase
    /// runs to completion. Advancing a finished machine does nothing.
    pub fn advance(&mut self) -> Result<Phase, MachineError> {
        let next = match self.phase {
            Phase::ZeroCheck => self.zero_check()?,
            Phase::EndMark => self.end_mark()?,
            Phase::DigitScan => self.digit_scan()?,
            Phase::Dispatch => self.dispatch()?,
            Phase::PlaceValue => self.place_value()?,
            Phase::InputRemoval => self.input_removal()?,
            Phase::Addition => self.addition()?,
            Phase::Cleanup => self.cleanup()?,
            Phase::Done => Phase::Done,
        };
        if next != self.phase {
            tracing::debug!(
                from = ?self.phase,
                to = ?next,
                steps = self.head.steps(),
                tape_len = self.head.tape().len(),
                "phase transition"
            );
        }
        self.phase = next;
        Ok(next)
    }

    // Head starts on the first cell of the first factor.
    fn zero_check(&mut self) -> Result<Phase, MachineError> {
        let h = &mut self.head;
        if h.symbol() != Zero {
            return Ok(Phase::EndMark);
        }
        h.move_right()?;
        if h.symbol() != Delimiter {
            h.move_left()?;
            return Ok(Phase::EndMark);
        }
        h.move_left()?;
        while h.symbol() != Blank {
            h.move_right_and_write(Blank)?;
        }
        h.write(Zero);
        Ok(Phase::Done)
    }

    fn end_mark(&mut self) -> Result<Phase, MachineError> {
        let h = &mut self.head;
        h.scan_right_until(&[Delimiter])?;
        h.move_right()?;
        h.scan_right_until(&[Blank])?;
        h.write(End);
        Ok(Phase::DigitScan)
    }

    fn digit_scan(&mut self) -> Result<Phase, MachineError> {
        self.head.scan_left_until(&[Delimiter])?;
        Ok(Phase::Dispatch)
    }

    // Head starts and ends on the delimiter.
    fn dispatch(&mut self) -> Result<Phase, MachineError> {
        let h = &mut self.head;
        h.move_left()?;
        match h.scan_left_until(&[Zero, One, Blank])? {
            Blank => Ok(Phase::PlaceValue),
            Zero => {
                h.write(Consumed);
                h.scan_right_until(&[Delimiter])?;
                Ok(Phase::Dispatch)
            }
            _ => {
                self.copy_second_factor()?;
                self.emit_shifts()?;
                let h = &mut self.head;
                h.scan_right_until(&[Blank])?;
                h.write(End);
                h.scan_left_until(&[Delimiter])?;
                Ok(Phase::Dispatch)
            }
        }
    }

    /// Append the second factor digit by digit to the right end of the tape,
    /// parking each copied source digit as a stand-in, then restore the
    /// source. Leaves the head on the delimiter.
    fn copy_second_factor(&mut self) -> Result<(), MachineError> {
        let h = &mut self.head;
        loop {
            h.scan_right_until(&[Delimiter])?;
            h.move_right()?;
            let Some(bit) = h.scan_right_until(&[Zero, One, End])?.bit() else {
                break;
            };
            h.write(Symbol::stand_in(bit));
            h.scan_right_until(&[Blank])?;
            h.write(Symbol::digit(bit));
            h.scan_left_until(&[Delimiter])?;
        }
        h.move_left()?;
        while matches!(h.symbol(), StandInZero | StandInOne) {
            let restored = h.symbol().restored();
            h.move_left_and_write(restored)?;
        }
        Ok(())
    }

    /// Write one `s` behind the new term for every first-factor digit
    /// consumed so far, then consume the current digit. Consumed digits are
    /// counted by flipping them to tenner markers one at a time. Leaves the
    /// head on the delimiter.
    fn emit_shifts(&mut self) -> Result<(), MachineError> {
        let h = &mut self.head;
        h.move_left()?;
        loop {
            match h.symbol() {
                Tenner => h.move_left()?,
                Consumed => {
                    h.write(Tenner);
                    h.scan_right_until(&[Blank])?;
                    h.write(Shift);
                    h.scan_left_until(&[Delimiter])?;
                    h.move_left()?;
                }
                _ => break,
            }
        }
        h.move_right_and_write(Consumed)?;
        while h.symbol() == Tenner {
            h.move_right_and_write(Consumed)?;
        }
        Ok(())
    }

    fn place_value(&mut self) -> Result<Phase, MachineError> {
        let h = &mut self.head;
        h.scan_right_until(&[End])?;
        loop {
            h.move_right()?;
            match h.symbol() {
                Shift => h.write(Zero),
                Blank => break,
                _ => {}
            }
        }
        Ok(Phase::InputRemoval)
    }

    // Head starts on the blank right of the last term.
    fn input_removal(&mut self) -> Result<Phase, MachineError> {
        let h = &mut self.head;
        h.move_left()?;
        h.scan_left_until(&[Blank])?;
        h.move_right()?;
        loop {
            let erased = h.symbol();
            h.move_right_and_write(Blank)?;
            if erased == End {
                break;
            }
        }
        if h.symbol() == Blank {
            // The first factor had no 1 digit, so no term was produced.
            h.write(Zero);
            return Ok(Phase::Done);
        }
        h.move_left()?;
        h.write(Shift);
        Ok(Phase::Addition)
    }

    // Head starts and ends on the start marker.
    fn addition(&mut self) -> Result<Phase, MachineError> {
        let h = &mut self.head;
        h.scan_right_until(&[End])?;
        h.move_right()?;
        if h.symbol() == Blank {
            return Ok(Phase::Cleanup);
        }
        h.scan_left_until(&[Shift])?;

        let carry = self.add_digits()?;
        self.settle_carry(carry)?;
        self.drop_top_term()?;
        Ok(Phase::Addition)
    }

    /// Add the top (leftmost) term into the bottom term, lowest digit first.
    /// Top digits become `d` once read, bottom digits become stand-ins for
    /// the sum digit. Returns the carry out of the top term's highest digit
    /// with the head back on the start marker.
    ///
    /// The bottom term is never shorter than the top one: each term carries
    /// at least one more shift than the term before it, and a sum is at
    /// most one digit longer than its bottom term.
    fn add_digits(&mut self) -> Result<Carry, MachineError> {
        let h = &mut self.head;
        let mut carry = Carry::Clear;
        loop {
            h.move_right()?;
            h.scan_right_until(&[End])?;
            h.move_left()?;
            let top = match h.scan_left_until(&[Zero, One, Shift])? {
                Shift => return Ok(carry),
                digit => digit,
            };
            h.write(Consumed);

            h.scan_right_until(&[End])?;
            h.move_right()?;
            h.scan_right_until(&[StandInZero, StandInOne, End])?;
            h.move_left()?;
            let bottom = match h.symbol() {
                bottom @ (Zero | One) => bottom,
                End => return Err(MachineError::BottomTermExhausted),
                other => return Err(MachineError::UnexpectedSymbol(other)),
            };
            let (sum, next) =
                add_column(top, bottom, carry).ok_or(MachineError::UnexpectedSymbol(top))?;
            h.write(sum);
            carry = next;

            h.scan_left_until(&[Shift])?;
        }
    }

    /// Push a pending carry into the bottom term, then restore its
    /// stand-ins. A carry out of the bottom's highest digit lands on the
    /// separating `y`. Leaves the head on the bottom term's closing `y`.
    fn settle_carry(&mut self, carry: Carry) -> Result<(), MachineError> {
        let h = &mut self.head;
        h.scan_right_until(&[End])?;
        h.move_right()?;
        h.scan_right_until(&[StandInZero, StandInOne, End])?;
        if carry == Carry::Pending {
            h.move_left()?;
            while h.symbol() == One {
                h.move_left_and_write(StandInZero)?;
            }
            h.write(StandInOne);
        }
        while h.symbol() != End {
            let restored = h.symbol().restored();
            h.move_right_and_write(restored)?;
        }
        Ok(())
    }

    /// Erase the start marker, the consumed top term and its `y` (unless a
    /// carry took its place), then put the start marker back in front of the
    /// sum.
    fn drop_top_term(&mut self) -> Result<(), MachineError> {
        let h = &mut self.head;
        h.scan_left_until(&[Shift])?;
        while matches!(h.symbol(), Shift | Consumed) {
            h.move_right_and_write(Blank)?;
        }
        if h.symbol() == End {
            h.move_right_and_write(Blank)?;
        }
        h.move_left()?;
        h.write(Shift);
        Ok(())
    }

    // Head starts on the blank right of the last `y`.
    fn cleanup(&mut self) -> Result<Phase, MachineError> {
        let h = &mut self.head;
        h.move_left()?;
        h.write(Blank);
        h.scan_left_until(&[Shift])?;
        h.move_right_and_write(Blank)?;
        while h.symbol() == Zero {
            h.move_right()?;
            let last = h.symbol() == Blank;
            h.move_left()?;
            if last {
                break;
            }
            h.move_right_and_write(Blank)?;
        }
        Ok(Phase::Done)
    }
}
