//! Board positions and their inside/outside digit decomposition

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// A position on the full board, always within `0..=99`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BoardNumber(u8);

impl BoardNumber {
    /// Highest position on the full board
    pub const MAX: u8 = 99;

    /// Construct a board number, returning `None` outside `0..=99`.
    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MAX).then_some(Self(value))
    }

    /// Construct from a wide integer (as found on the wire).
    pub fn from_u64(value: u64) -> Option<Self> {
        u8::try_from(value).ok().and_then(Self::new)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Every position on the full board, in ascending order.
    pub fn all() -> impl Iterator<Item = BoardNumber> {
        (0..=Self::MAX).map(Self)
    }

    /// Split into inside/outside digits. See [`decompose`].
    pub fn decompose(self) -> Decomposition {
        decompose(self)
    }
}

impl fmt::Display for BoardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error parsing a [`BoardNumber`] from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseBoardNumberError {
    #[error("not a base-10 integer: {0:?}")]
    NotANumber(String),

    #[error("{0} is outside the board (0-99)")]
    OutOfRange(u64),
}

impl FromStr for BoardNumber {
    type Err = ParseBoardNumberError;

    /// Parses base-10 text, tolerating surrounding whitespace and leading
    /// zeros (`"07"` is position 7).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value: u64 = trimmed
            .parse()
            .map_err(|_| ParseBoardNumberError::NotANumber(trimmed.to_string()))?;
        Self::from_u64(value).ok_or(ParseBoardNumberError::OutOfRange(value))
    }
}

/// Inside (leading) and outside (trailing) digit of a board position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Decomposition {
    /// Leading digit, `0..=9`
    pub inside: u8,
    /// Trailing digit, `0..=9`
    pub outside: u8,
}

/// Map a board position to its inside/outside digits.
///
/// Single-digit positions have an implicit leading zero: `7` is `(0, 7)`,
/// `45` is `(4, 5)`. Over `0..=99` the mapping is injective.
pub fn decompose(number: BoardNumber) -> Decomposition {
    let n = number.value();
    if n < 10 {
        Decomposition {
            inside: 0,
            outside: n,
        }
    } else {
        Decomposition {
            inside: n / 10,
            outside: n % 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn num(n: u8) -> BoardNumber {
        BoardNumber::new(n).unwrap()
    }

    #[test]
    fn test_decompose_reference_values() {
        assert_eq!(
            decompose(num(7)),
            Decomposition {
                inside: 0,
                outside: 7
            }
        );
        assert_eq!(
            decompose(num(45)),
            Decomposition {
                inside: 4,
                outside: 5
            }
        );
        assert_eq!(
            decompose(num(99)),
            Decomposition {
                inside: 9,
                outside: 9
            }
        );
        assert_eq!(
            decompose(num(10)),
            Decomposition {
                inside: 1,
                outside: 0
            }
        );
        assert_eq!(
            decompose(num(0)),
            Decomposition {
                inside: 0,
                outside: 0
            }
        );
    }

    #[test]
    fn test_decompose_is_injective_over_board() {
        let pairs: HashSet<Decomposition> = BoardNumber::all().map(decompose).collect();
        assert_eq!(pairs.len(), 100);
    }

    #[test]
    fn test_decompose_is_deterministic_and_in_digit_range() {
        for n in BoardNumber::all() {
            let first = decompose(n);
            assert_eq!(first, n.decompose());
            assert!(first.inside <= 9);
            assert!(first.outside <= 9);
            assert_eq!(first.inside * 10 + first.outside, n.value());
        }
    }

    #[test]
    fn test_board_number_rejects_out_of_range() {
        assert!(BoardNumber::new(99).is_some());
        assert!(BoardNumber::new(100).is_none());
        assert!(BoardNumber::from_u64(1_000).is_none());
    }

    #[test]
    fn test_board_number_parse() {
        assert_eq!("07".parse::<BoardNumber>(), Ok(num(7)));
        assert_eq!(" 45 ".parse::<BoardNumber>(), Ok(num(45)));
        assert_eq!(
            "100".parse::<BoardNumber>(),
            Err(ParseBoardNumberError::OutOfRange(100))
        );
        assert!(matches!(
            "seven".parse::<BoardNumber>(),
            Err(ParseBoardNumberError::NotANumber(_))
        ));
        assert!("-1".parse::<BoardNumber>().is_err());
    }

    #[test]
    fn test_all_covers_full_board_in_order() {
        let all: Vec<u8> = BoardNumber::all().map(BoardNumber::value).collect();
        assert_eq!(all.len(), 100);
        assert_eq!(all.first(), Some(&0));
        assert_eq!(all.last(), Some(&99));
    }
}
