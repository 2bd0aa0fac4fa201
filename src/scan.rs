use crate::error::MachineError;
use crate::symbol::Symbol;

/// Single-step movement plus the "move until" searches built on it.
///
/// A scan looks at the current cell first, so a head already sitting on a
/// target does not move. A scan whose targets never show up keeps moving
/// until the implementor's step fuse (if any) stops it.
pub trait Scan {
    /// The symbol under the head.
    fn symbol(&self) -> Symbol;

    fn move_left(&mut self) -> Result<(), MachineError>;

    fn move_right(&mut self) -> Result<(), MachineError>;

    /// Move right until the head reads one of `targets`. Returns the symbol
    /// it stopped on.
    fn scan_right_until(&mut self, targets: &[Symbol]) -> Result<Symbol, MachineError> {
        while !targets.contains(&self.symbol()) {
            self.move_right()?;
        }
        Ok(self.symbol())
    }

    /// Move left until the head reads one of `targets`. Returns the symbol
    /// it stopped on.
    fn scan_left_until(&mut self, targets: &[Symbol]) -> Result<Symbol, MachineError> {
        while !targets.contains(&self.symbol()) {
            self.move_left()?;
        }
        Ok(self.symbol())
    }
}
