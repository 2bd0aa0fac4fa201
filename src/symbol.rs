/// Glyph used to display a blank cell.
pub const BLANK_CHAR: char = '-';

/// Glyph inserted in front of the cell under the head when rendering a trace.
pub const HEAD_MARKER: char = 'Q';

/// The tape alphabet of the multiplier.
///
/// Besides the two binary digits, the delimiter and the blank, the machine
/// writes six bookkeeping markers while it works:
/// - `d`: a first-factor digit (or, during addition, a top-term digit) that
///   has been consumed
/// - `y`: the end of a number; separates partial-product terms
/// - `z`: one place-value shift owed to the term being built
/// - `s`: a shift that becomes a literal trailing zero; later the start
///   marker of the addition passes
/// - `a` / `b`: stand-ins for `0` / `1` on cells that are already processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Zero,
    One,
    Delimiter,
    Blank,
    Consumed,
    End,
    Tenner,
    Shift,
    StandInZero,
    StandInOne,
}

impl Symbol {
    /// The binary digit for `bit` (any nonzero value is `One`).
    pub fn digit(bit: u8) -> Self {
        if bit == 0 { Symbol::Zero } else { Symbol::One }
    }

    /// The stand-in marker for `bit`.
    pub fn stand_in(bit: u8) -> Self {
        if bit == 0 {
            Symbol::StandInZero
        } else {
            Symbol::StandInOne
        }
    }

    /// Value of a binary digit, `None` for every other symbol.
    pub fn bit(self) -> Option<u8> {
        match self {
            Symbol::Zero => Some(0),
            Symbol::One => Some(1),
            _ => None,
        }
    }

    /// Turn a stand-in back into the digit it replaced. Other symbols are
    /// returned unchanged.
    pub fn restored(self) -> Self {
        match self {
            Symbol::StandInZero => Symbol::Zero,
            Symbol::StandInOne => Symbol::One,
            other => other,
        }
    }

    pub fn to_char(self, delimiter: char) -> char {
        match self {
            Symbol::Zero => '0',
            Symbol::One => '1',
            Symbol::Delimiter => delimiter,
            Symbol::Blank => BLANK_CHAR,
            Symbol::Consumed => 'd',
            Symbol::End => 'y',
            Symbol::Tenner => 'z',
            Symbol::Shift => 's',
            Symbol::StandInZero => 'a',
            Symbol::StandInOne => 'b',
        }
    }

    pub fn from_char(c: char, delimiter: char) -> Option<Self> {
        if c == delimiter {
            return Some(Symbol::Delimiter);
        }
        match c {
            '0' => Some(Symbol::Zero),
            '1' => Some(Symbol::One),
            BLANK_CHAR => Some(Symbol::Blank),
            'd' => Some(Symbol::Consumed),
            'y' => Some(Symbol::End),
            'z' => Some(Symbol::Tenner),
            's' => Some(Symbol::Shift),
            'a' => Some(Symbol::StandInZero),
            'b' => Some(Symbol::StandInOne),
            _ => None,
        }
    }
}

/// Returns true if `c` cannot serve as the delimiter because the machine
/// already uses it for something else.
pub fn is_reserved(c: char) -> bool {
    c == HEAD_MARKER || (c != 'x' && Symbol::from_char(c, 'x').is_some())
}
