use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Rules of Conway's Game of Life.
pub const B3S23: RuleSet = RuleSet::new(0b1000, 0b1100);

/// # Representation
/// Life rules are represented as
/// ```notrust
/// |------birth------|
/// 0000_0000_0000_0000_0000_0000_0000_0000
///                     |----survival-----|
/// ```
///
/// # Examples
/// ```notrust
/// b3s23:                0000_0000_0000_1000_0000_0000_0000_1100
///
/// b0s0:                 0000_0000_0000_0000_0000_0000_0000_0000
/// b012345678s012345678: 0000_0001_1111_1111_0000_0001_1111_1111
/// ```
///
/// See: https://conwaylife.com/wiki/Rulestring
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RuleSet {
    rule: u32,
}

impl Default for RuleSet {
    fn default() -> Self {
        B3S23
    }
}

impl RuleSet {
    /// Create a new `RuleSet` for the given births and survivals. Bit `i` of `b` (resp. `s`) being
    /// on means a dead (resp. live) cell with `i` neighbors is alive next generation. Any bit past
    /// the 8th is ignored.
    pub const fn new(b: u16, s: u16) -> Self {
        let b = b & 0x1FF;
        let s = s & 0x1FF;

        Self {
            rule: (b as u32) << 16 | s as u32,
        }
    }

    pub fn births(&self) -> u16 {
        ((self.rule & 0x1FF0000) >> 0x10) as u16
    }

    pub fn survivals(&self) -> u16 {
        (self.rule & 0x1FF) as u16
    }

    /// Whether a cell is alive next generation.
    pub fn next_state(&self, alive: bool, neighbors: u8) -> bool {
        if neighbors > 8 {
            return false;
        }

        let mask = if alive {
            self.survivals()
        } else {
            self.births()
        };

        mask & (1 << neighbors) != 0
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// Formats as `B3/S23`
impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = |mask: u16| -> String {
            (0..=8u8)
                .filter(|&n| mask & (1u16 << n) != 0)
                .map(|n| char::from(b'0' + n))
                .collect()
        };

        write!(f, "B{}/S{}", digits(self.births()), digits(self.survivals()))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("Unexpected character '{0}' in rule")]
    InvalidChar(char),

    #[error("Neighbor count {0} is out of range, expected 0 to 8")]
    OutOfRange(u32),

    #[error("Neighbor count '{0}' appears before 'B' or 'S'")]
    MissingSection(char),
}

/// Parses `B3/S23`, `b3s23` and similar spellings.
impl FromStr for RuleSet {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        enum State {
            Start,
            Birth,
            Survival,
        }

        let mut state = State::Start;
        let (mut b, mut s_) = (0u16, 0u16);

        for c in s.trim().chars() {
            match c {
                'b' | 'B' => state = State::Birth,
                's' | 'S' => state = State::Survival,
                '/' => {}
                c if c.is_ascii_digit() => {
                    let n = c.to_digit(10).ok_or(RuleError::InvalidChar(c))?;
                    if n > 8 {
                        return Err(RuleError::OutOfRange(n));
                    }

                    match state {
                        State::Start => return Err(RuleError::MissingSection(c)),
                        State::Birth => b |= 1 << n,
                        State::Survival => s_ |= 1 << n,
                    }
                }
                c => return Err(RuleError::InvalidChar(c)),
            }
        }

        Ok(RuleSet::new(b, s_))
    }
}
