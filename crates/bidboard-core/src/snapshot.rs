//! The per-round board snapshot and the ordering rules for applying fetches

use serde::Serialize;

use crate::board::{BidEntry, Board, BoardKind};
use crate::declaration::{DeclarationState, DeclareTransition};
use crate::number::BoardNumber;

/// Monotonic tag assigned to each fetch when it is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct FetchSeq(u64);

impl FetchSeq {
    pub fn first() -> Self {
        Self(1)
    }

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for FetchSeq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A parsed bids response, ready to be applied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardUpdate {
    pub full: Vec<BidEntry>,
    pub inside: Vec<BidEntry>,
    pub outside: Vec<BidEntry>,
    /// Winning number if the service reports the round as declared.
    pub declared: Option<BoardNumber>,
}

/// Result of [`BoardSnapshot::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Boards were replaced.
    Applied {
        /// Set when this update moved the round from open to declared.
        newly_declared: Option<BoardNumber>,
        /// Entries skipped because they fell outside a board's domain.
        skipped: usize,
    },
    /// The update was not newer than the last applied one and was ignored.
    Stale { last_applied: FetchSeq },
}

/// The three boards of one round plus its declaration state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    full: Board,
    inside: Board,
    outside: Board,
    declaration: DeclarationState,
    last_applied: Option<FetchSeq>,
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardSnapshot {
    /// Empty boards, round open.
    pub fn new() -> Self {
        Self {
            full: Board::new(BoardKind::Full),
            inside: Board::new(BoardKind::Inside),
            outside: Board::new(BoardKind::Outside),
            declaration: DeclarationState::Open,
            last_applied: None,
        }
    }

    pub fn full(&self) -> &Board {
        &self.full
    }

    pub fn inside(&self) -> &Board {
        &self.inside
    }

    pub fn outside(&self) -> &Board {
        &self.outside
    }

    pub fn board(&self, kind: BoardKind) -> &Board {
        match kind {
            BoardKind::Full => &self.full,
            BoardKind::Inside => &self.inside,
            BoardKind::Outside => &self.outside,
        }
    }

    pub fn declaration(&self) -> DeclarationState {
        self.declaration
    }

    pub fn last_applied(&self) -> Option<FetchSeq> {
        self.last_applied
    }

    /// Apply a fetched update tagged with `seq`.
    ///
    /// Updates not newer than the last applied one are ignored, so a late
    /// response cannot overwrite fresher boards. All three boards are fully
    /// replaced. A declared number in the update moves the round to
    /// `Declared`; an existing declaration is never changed.
    pub fn apply(&mut self, seq: FetchSeq, update: &BoardUpdate) -> ApplyOutcome {
        if let Some(last) = self.last_applied {
            if seq <= last {
                return ApplyOutcome::Stale { last_applied: last };
            }
        }

        let skipped = self.full.replace_with(&update.full)
            + self.inside.replace_with(&update.inside)
            + self.outside.replace_with(&update.outside);
        self.last_applied = Some(seq);

        let newly_declared = match update.declared {
            Some(number) => match self.declaration.declare(number) {
                DeclareTransition::Declared(n) => Some(n),
                DeclareTransition::Unchanged => None,
                DeclareTransition::Conflict { kept, rejected } => {
                    tracing::warn!(
                        "Service reports winning number {} but round was declared with {}; keeping {}",
                        rejected,
                        kept,
                        kept
                    );
                    None
                }
            },
            None => None,
        };

        ApplyOutcome::Applied {
            newly_declared,
            skipped,
        }
    }

    /// Record a declaration committed from this view.
    pub fn declare(&mut self, number: BoardNumber) -> DeclareTransition {
        self.declaration.declare(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Amount;

    fn num(n: u8) -> BoardNumber {
        BoardNumber::new(n).unwrap()
    }

    fn sample_update() -> BoardUpdate {
        BoardUpdate {
            full: vec![
                BidEntry::new(12, 30),
                BidEntry::new(45, 10),
                BidEntry::new(7, 10),
            ],
            inside: vec![BidEntry::new(4, 15), BidEntry::new(1, 30)],
            outside: vec![BidEntry::new(5, 11), BidEntry::new(2, 30)],
            declared: None,
        }
    }

    #[test]
    fn test_new_snapshot_is_empty_and_open() {
        let snap = BoardSnapshot::new();
        assert!(snap.full().is_empty());
        assert!(snap.inside().is_empty());
        assert!(snap.outside().is_empty());
        assert!(snap.declaration().is_open());
        assert_eq!(snap.last_applied(), None);
    }

    #[test]
    fn test_apply_replaces_all_boards() {
        let mut snap = BoardSnapshot::new();
        let outcome = snap.apply(FetchSeq::first(), &sample_update());

        assert_eq!(
            outcome,
            ApplyOutcome::Applied {
                newly_declared: None,
                skipped: 0
            }
        );
        assert_eq!(snap.full().amount_of(12), Some(Amount::new(30)));
        assert_eq!(snap.inside().amount_of(4), Some(Amount::new(15)));
        assert_eq!(snap.outside().amount_of(5), Some(Amount::new(11)));

        let next = BoardUpdate {
            full: vec![BidEntry::new(3, 1)],
            ..BoardUpdate::default()
        };
        snap.apply(FetchSeq::new(2), &next);
        assert_eq!(snap.full().amount_of(12), None);
        assert!(snap.inside().is_empty());
        assert!(snap.outside().is_empty());
    }

    #[test]
    fn test_stale_update_is_ignored() {
        let mut snap = BoardSnapshot::new();
        snap.apply(FetchSeq::new(5), &sample_update());

        let older = BoardUpdate {
            full: vec![BidEntry::new(99, 1)],
            ..BoardUpdate::default()
        };
        let outcome = snap.apply(FetchSeq::new(4), &older);
        assert_eq!(
            outcome,
            ApplyOutcome::Stale {
                last_applied: FetchSeq::new(5)
            }
        );
        assert_eq!(snap.full().amount_of(99), None);
        assert_eq!(snap.full().amount_of(12), Some(Amount::new(30)));

        // Same sequence twice is also stale.
        assert!(matches!(
            snap.apply(FetchSeq::new(5), &older),
            ApplyOutcome::Stale { .. }
        ));
    }

    #[test]
    fn test_reapplying_identical_update_is_idempotent() {
        let mut snap = BoardSnapshot::new();
        snap.apply(FetchSeq::new(1), &sample_update());
        let first = (
            snap.full().clone(),
            snap.inside().clone(),
            snap.outside().clone(),
        );

        snap.apply(FetchSeq::new(2), &sample_update());
        assert_eq!(first.0, *snap.full());
        assert_eq!(first.1, *snap.inside());
        assert_eq!(first.2, *snap.outside());
        assert_eq!(snap.full().len(), 3);
    }

    #[test]
    fn test_declared_zero_from_fetch() {
        let mut snap = BoardSnapshot::new();
        let update = BoardUpdate {
            declared: Some(num(0)),
            ..sample_update()
        };

        let outcome = snap.apply(FetchSeq::first(), &update);
        assert_eq!(
            outcome,
            ApplyOutcome::Applied {
                newly_declared: Some(num(0)),
                skipped: 0
            }
        );
        assert_eq!(snap.declaration(), DeclarationState::Declared(num(0)));
    }

    #[test]
    fn test_existing_declaration_is_kept() {
        let mut snap = BoardSnapshot::new();
        snap.declare(num(45));

        let update = BoardUpdate {
            declared: Some(num(12)),
            ..sample_update()
        };
        let outcome = snap.apply(FetchSeq::first(), &update);
        assert_eq!(
            outcome,
            ApplyOutcome::Applied {
                newly_declared: None,
                skipped: 0
            }
        );
        assert_eq!(snap.declaration().winning_number(), Some(num(45)));
    }

    #[test]
    fn test_skipped_entries_are_counted() {
        let mut snap = BoardSnapshot::new();
        let update = BoardUpdate {
            inside: vec![BidEntry::new(10, 3)],
            ..BoardUpdate::default()
        };
        assert_eq!(
            snap.apply(FetchSeq::first(), &update),
            ApplyOutcome::Applied {
                newly_declared: None,
                skipped: 1
            }
        );
    }

    #[test]
    fn test_fetch_seq_ordering() {
        let a = FetchSeq::first();
        let b = a.next();
        assert!(b > a);
        assert_eq!(b.value(), 2);
        assert_eq!(b.to_string(), "#2");
    }
}
