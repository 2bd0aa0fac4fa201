use crate::error::MachineError;
use crate::scan::Scan;
use crate::symbol::Symbol;
use crate::tape::Tape;

/// How much the head reports while it works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Run silently.
    #[default]
    Run,
    /// Emit a `tracing` event with the rendered tape after every move.
    Step,
}

/// The read/write head of the machine.
///
/// Owns the tape, the head position and a cached copy of the symbol under
/// the head. The position may point left of the tape (negative) or past its
/// right end; both read as blank until something is written there.
///
/// Every move counts as one step. With a step limit configured, the move
/// that exceeds it fails with [`MachineError::StepLimitExceeded`], which
/// stops a scan for a symbol that never appears.
#[derive(Debug, Clone)]
pub struct Head {
    tape: Tape,
    position: isize,
    symbol: Symbol,
    steps: u64,
    step_limit: Option<u64>,
    mode: Mode,
}

impl Head {
    /// Put `input` on a fresh tape and park the head on its first cell.
    pub fn new(
        input: &str,
        delimiter: char,
        step_limit: Option<u64>,
    ) -> Result<Self, MachineError> {
        let tape = Tape::from_input(input, delimiter)?;
        let symbol = tape.read(0);
        Ok(Self {
            tape,
            position: 0,
            symbol,
            steps: 0,
            step_limit,
            mode: Mode::Run,
        })
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn position(&self) -> isize {
        self.position
    }

    /// Number of moves made so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Write `symbol` under the head without moving.
    pub fn write(&mut self, symbol: Symbol) {
        self.position = self.tape.write(self.position, symbol);
        self.symbol = self.tape.read(self.position);
    }

    /// Write `symbol` under the head, then step right.
    pub fn move_right_and_write(&mut self, symbol: Symbol) -> Result<(), MachineError> {
        self.write(symbol);
        self.move_right()
    }

    /// Write `symbol` under the head, then step left.
    pub fn move_left_and_write(&mut self, symbol: Symbol) -> Result<(), MachineError> {
        self.write(symbol);
        self.move_left()
    }

    /// The tape with the head marker in front of the current cell.
    pub fn render(&self) -> String {
        self.tape.render_with_head(self.position)
    }

    fn refresh(&mut self) -> Result<(), MachineError> {
        self.symbol = self.tape.read(self.position);
        self.steps += 1;
        if self.mode == Mode::Step {
            tracing::info!(step = self.steps, position = self.position, "{}", self.render());
        }
        match self.step_limit {
            Some(limit) if self.steps > limit => Err(MachineError::StepLimitExceeded { limit }),
            _ => Ok(()),
        }
    }
}

impl Scan for Head {
    fn symbol(&self) -> Symbol {
        self.symbol
    }

    fn move_left(&mut self) -> Result<(), MachineError> {
        self.position -= 1;
        self.refresh()
    }

    fn move_right(&mut self) -> Result<(), MachineError> {
        self.position += 1;
        self.refresh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_reads_first_cell() {
        let h = Head::new("10x1", 'x', None).unwrap();
        assert_eq!(h.position(), 0);
        assert_eq!(h.symbol(), Symbol::One);
        assert_eq!(h.steps(), 0);
    }

    #[test]
    fn test_moves_refresh_symbol() {
        let mut h = Head::new("10x1", 'x', None).unwrap();
        h.move_right().unwrap();
        assert_eq!(h.symbol(), Symbol::Zero);
        h.move_right().unwrap();
        assert_eq!(h.symbol(), Symbol::Delimiter);
        h.move_left().unwrap();
        h.move_left().unwrap();
        h.move_left().unwrap();
        assert_eq!(h.position(), -1);
        assert_eq!(h.symbol(), Symbol::Blank);
        assert_eq!(h.steps(), 5);
    }

    #[test]
    fn test_write_then_move_right() {
        let mut h = Head::new("10x1", 'x', None).unwrap();
        h.move_right_and_write(Symbol::Consumed).unwrap();
        assert_eq!(h.tape().content(), "d0x1");
        assert_eq!(h.position(), 1);
        assert_eq!(h.symbol(), Symbol::Zero);
    }

    #[test]
    fn test_erasing_from_the_left_walks_the_content() {
        let mut h = Head::new("10x1", 'x', None).unwrap();
        h.move_right_and_write(Symbol::Blank).unwrap();
        assert_eq!(h.tape().content(), "0x1");
        assert_eq!(h.position(), 0);
        assert_eq!(h.symbol(), Symbol::Zero);
        h.move_right_and_write(Symbol::Blank).unwrap();
        assert_eq!(h.tape().content(), "x1");
        assert_eq!(h.symbol(), Symbol::Delimiter);
    }

    #[test]
    fn test_writing_left_of_tape_keeps_head_on_new_cell() {
        let mut h = Head::new("10x1", 'x', None).unwrap();
        h.move_left().unwrap();
        h.write(Symbol::Shift);
        assert_eq!(h.position(), 0);
        assert_eq!(h.symbol(), Symbol::Shift);
        h.move_right().unwrap();
        assert_eq!(h.symbol(), Symbol::One);
        assert_eq!(h.tape().content(), "s10x1");
    }

    #[test]
    fn test_move_left_and_write_at_right_end() {
        let mut h = Head::new("10x1", 'x', None).unwrap();
        h.scan_right_until(&[Symbol::Blank]).unwrap();
        h.move_left().unwrap();
        h.move_left_and_write(Symbol::Blank).unwrap();
        assert_eq!(h.tape().content(), "10x");
        assert_eq!(h.symbol(), Symbol::Delimiter);
    }

    #[test]
    fn test_step_limit() {
        let mut h = Head::new("1", 'x', Some(2)).unwrap();
        h.move_right().unwrap();
        h.move_right().unwrap();
        assert_eq!(
            h.move_right(),
            Err(MachineError::StepLimitExceeded { limit: 2 })
        );
    }

    #[test]
    fn test_step_mode_does_not_change_state() {
        let mut quiet = Head::new("10x1", 'x', None).unwrap();
        let mut loud = Head::new("10x1", 'x', None).unwrap().with_mode(Mode::Step);
        for h in [&mut quiet, &mut loud] {
            h.move_right_and_write(Symbol::Consumed).unwrap();
            h.scan_right_until(&[Symbol::Blank]).unwrap();
        }
        assert_eq!(quiet.render(), loud.render());
        assert_eq!(quiet.steps(), loud.steps());
    }
}
