use thiserror::Error;

use crate::symbol::Symbol;

/// Everything that can stop a multiplier before it reaches its result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    /// The input is not `<binary><delimiter><binary>`.
    #[error("input {input:?} is not of the form <binary>{delimiter}<binary>")]
    Rejected { input: String, delimiter: char },

    /// The delimiter is a glyph the machine already uses.
    #[error("delimiter {0:?} is part of the tape alphabet")]
    ReservedDelimiter(char),

    /// An addition pass ran out of bottom-term digits before the top term
    /// was used up.
    #[error("addition reached the term separator while top-term digits remain")]
    BottomTermExhausted,

    /// An addition pass found a symbol that cannot stand in a term.
    #[error("addition found {0:?} where a bottom-term digit belongs")]
    UnexpectedSymbol(Symbol),

    /// The head moved more often than the configured fuse allows.
    #[error("step limit of {limit} moves exceeded")]
    StepLimitExceeded { limit: u64 },
}
