//! Operator selection on the full board
//!
//! A [`Selection`] only remembers which number was picked. Amounts are
//! always read from the current [`BoardSnapshot`], so the projection follows
//! every board refresh.

use serde::Serialize;

use bidboard_core::{Amount, BoardNumber, BoardSnapshot};

/// The chosen number, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    chosen: Option<BoardNumber>,
}

/// One side of the digit decomposition with its current amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DerivedAmount {
    pub number: u8,
    pub amount: Amount,
}

/// Selection as seen against a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectionView {
    pub number: BoardNumber,
    /// Full-board amount, zero when the number has no bid.
    pub amount: Amount,
    pub inside: DerivedAmount,
    pub outside: DerivedAmount,
}

impl Selection {
    pub fn chosen(&self) -> Option<BoardNumber> {
        self.chosen
    }

    pub fn is_empty(&self) -> bool {
        self.chosen.is_none()
    }

    /// Record `number` unless the round is already declared.
    ///
    /// Returns whether the selection was recorded.
    pub fn select(&mut self, number: BoardNumber, snapshot: &BoardSnapshot) -> bool {
        if snapshot.declaration().is_declared() {
            return false;
        }
        self.chosen = Some(number);
        true
    }

    pub fn clear(&mut self) {
        self.chosen = None;
    }

    pub fn project(&self, snapshot: &BoardSnapshot) -> Option<SelectionView> {
        self.chosen.map(|number| project_number(number, snapshot))
    }
}

/// Amounts for `number` and its inside/outside digits.
pub fn project_number(number: BoardNumber, snapshot: &BoardSnapshot) -> SelectionView {
    let digits = number.decompose();
    SelectionView {
        number,
        amount: snapshot.full().amount_or_zero(number.value()),
        inside: DerivedAmount {
            number: digits.inside,
            amount: snapshot.inside().amount_or_zero(digits.inside),
        },
        outside: DerivedAmount {
            number: digits.outside,
            amount: snapshot.outside().amount_or_zero(digits.outside),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bidboard_core::{BidEntry, BoardUpdate, FetchSeq};

    fn num(n: u8) -> BoardNumber {
        BoardNumber::new(n).unwrap()
    }

    fn snapshot() -> BoardSnapshot {
        let mut snap = BoardSnapshot::new();
        snap.apply(
            FetchSeq::first(),
            &BoardUpdate {
                full: vec![
                    BidEntry::new(12, 30),
                    BidEntry::new(45, 10),
                    BidEntry::new(7, 10),
                ],
                inside: vec![BidEntry::new(4, 15), BidEntry::new(0, 2)],
                outside: vec![BidEntry::new(5, 11), BidEntry::new(7, 9)],
                declared: None,
            },
        );
        snap
    }

    #[test]
    fn test_select_projects_derived_amounts() {
        let snap = snapshot();
        let mut selection = Selection::default();
        assert!(selection.select(num(45), &snap));

        let view = selection.project(&snap).unwrap();
        assert_eq!(view.amount, Amount::new(10));
        assert_eq!(
            view.inside,
            DerivedAmount {
                number: 4,
                amount: Amount::new(15)
            }
        );
        assert_eq!(
            view.outside,
            DerivedAmount {
                number: 5,
                amount: Amount::new(11)
            }
        );
    }

    #[test]
    fn test_single_digit_uses_outside_board() {
        let snap = snapshot();
        let view = project_number(num(7), &snap);
        assert_eq!(view.inside.number, 0);
        assert_eq!(view.inside.amount, Amount::new(2));
        assert_eq!(view.outside.number, 7);
        assert_eq!(view.outside.amount, Amount::new(9));
    }

    #[test]
    fn test_unbid_number_defaults_to_zero() {
        let snap = snapshot();
        let view = project_number(num(99), &snap);
        assert_eq!(view.amount, Amount::ZERO);
        assert_eq!(view.inside.amount, Amount::ZERO);
        assert_eq!(view.outside.amount, Amount::ZERO);
    }

    #[test]
    fn test_projection_follows_refresh() {
        let mut snap = snapshot();
        let mut selection = Selection::default();
        selection.select(num(45), &snap);

        snap.apply(
            FetchSeq::new(2),
            &BoardUpdate {
                full: vec![BidEntry::new(45, 80)],
                ..BoardUpdate::default()
            },
        );
        assert_eq!(selection.project(&snap).unwrap().amount, Amount::new(80));
    }

    #[test]
    fn test_select_is_noop_once_declared() {
        let mut snap = snapshot();
        snap.declare(num(0));

        let mut selection = Selection::default();
        assert!(!selection.select(num(45), &snap));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_clear() {
        let snap = snapshot();
        let mut selection = Selection::default();
        selection.select(num(12), &snap);
        selection.clear();
        assert_eq!(selection.chosen(), None);
        assert_eq!(selection.project(&snap), None);
    }
}
