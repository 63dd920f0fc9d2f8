//! One-way declaration state of a round

use serde::Serialize;

use crate::number::BoardNumber;

/// Whether the round's winning number has been fixed.
///
/// `Declared(0)` is a real declaration; "not declared" is only ever
/// `Open`, never a zero sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "winning_number", rename_all = "snake_case")]
pub enum DeclarationState {
    #[default]
    Open,
    Declared(BoardNumber),
}

/// Outcome of attempting to declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclareTransition {
    /// `Open -> Declared`
    Declared(BoardNumber),
    /// Already declared with the same number.
    Unchanged,
    /// Already declared with a different number; the first one is kept.
    Conflict {
        kept: BoardNumber,
        rejected: BoardNumber,
    },
}

impl DeclarationState {
    pub fn is_open(&self) -> bool {
        matches!(self, DeclarationState::Open)
    }

    pub fn is_declared(&self) -> bool {
        !self.is_open()
    }

    pub fn winning_number(&self) -> Option<BoardNumber> {
        match self {
            DeclarationState::Open => None,
            DeclarationState::Declared(n) => Some(*n),
        }
    }

    /// Move to `Declared(number)`. Irreversible: once declared, the
    /// winning number never changes.
    pub fn declare(&mut self, number: BoardNumber) -> DeclareTransition {
        match *self {
            DeclarationState::Open => {
                *self = DeclarationState::Declared(number);
                DeclareTransition::Declared(number)
            }
            DeclarationState::Declared(existing) if existing == number => {
                DeclareTransition::Unchanged
            }
            DeclarationState::Declared(existing) => DeclareTransition::Conflict {
                kept: existing,
                rejected: number,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: u8) -> BoardNumber {
        BoardNumber::new(n).unwrap()
    }

    #[test]
    fn test_default_is_open() {
        let state = DeclarationState::default();
        assert!(state.is_open());
        assert_eq!(state.winning_number(), None);
    }

    #[test]
    fn test_declared_zero_is_distinct_from_open() {
        let mut state = DeclarationState::Open;
        assert_eq!(state.declare(num(0)), DeclareTransition::Declared(num(0)));

        assert!(state.is_declared());
        assert_eq!(state.winning_number(), Some(num(0)));
        assert_ne!(state, DeclarationState::Open);
    }

    #[test]
    fn test_declaration_is_irreversible() {
        let mut state = DeclarationState::Open;
        state.declare(num(45));

        assert_eq!(state.declare(num(45)), DeclareTransition::Unchanged);
        assert_eq!(
            state.declare(num(12)),
            DeclareTransition::Conflict {
                kept: num(45),
                rejected: num(12)
            }
        );
        assert_eq!(state, DeclarationState::Declared(num(45)));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(DeclarationState::Declared(num(0))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"state": "declared", "winning_number": 0})
        );

        let json = serde_json::to_value(DeclarationState::Open).unwrap();
        assert_eq!(json, serde_json::json!({"state": "open"}));
    }
}
