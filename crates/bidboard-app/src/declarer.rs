//! Declaration workflow for one round
//!
//! ```text
//! NoSelection -> Selected -> ConfirmPending -> Committing -> Declared
//!                   ^              |               |
//!                   +---- cancel --+               |
//!                   +------------- failure --------+
//! ```
//!
//! The declarer owns the operator's [`Selection`]. Only one commit may be in
//! flight; a second confirmation while committing is refused without
//! touching the service.

use serde::Serialize;
use thiserror::Error;

use bidboard_core::{BoardNumber, BoardSnapshot};
use bidboard_remote::DeclareRequest;

use crate::selection::Selection;

/// Why a declarer operation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeclareBlocked {
    #[error("round is already declared")]
    AlreadyDeclared,

    #[error("no number is selected")]
    NoSelection,

    #[error("no confirmation is pending")]
    NotConfirming,

    #[error("a declaration is already in flight")]
    CommitInFlight,
}

/// Current step of the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeclarerPhase {
    #[default]
    NoSelection,
    Selected,
    ConfirmPending,
    /// Waiting for the service; carries the request that was sent.
    Committing(DeclareRequest),
    Declared(BoardNumber),
}

impl DeclarerPhase {
    pub fn label(&self) -> &'static str {
        match self {
            DeclarerPhase::NoSelection => "no_selection",
            DeclarerPhase::Selected => "selected",
            DeclarerPhase::ConfirmPending => "confirm_pending",
            DeclarerPhase::Committing(_) => "committing",
            DeclarerPhase::Declared(_) => "declared",
        }
    }
}

impl Serialize for DeclarerPhase {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Declarer {
    phase: DeclarerPhase,
    selection: Selection,
}

impl Declarer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DeclarerPhase {
        self.phase
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_committing(&self) -> bool {
        matches!(self.phase, DeclarerPhase::Committing(_))
    }

    /// Pick `number`. A pending confirmation is dropped; an in-flight commit
    /// keeps the number it was sent with.
    pub fn select(
        &mut self,
        number: BoardNumber,
        snapshot: &BoardSnapshot,
    ) -> Result<(), DeclareBlocked> {
        if !self.selection.select(number, snapshot) {
            return Err(DeclareBlocked::AlreadyDeclared);
        }
        if !self.is_committing() {
            self.phase = DeclarerPhase::Selected;
        }
        Ok(())
    }

    pub fn clear_selection(&mut self, snapshot: &BoardSnapshot) -> Result<(), DeclareBlocked> {
        if snapshot.declaration().is_declared() {
            return Err(DeclareBlocked::AlreadyDeclared);
        }
        self.selection.clear();
        if !self.is_committing() {
            self.phase = DeclarerPhase::NoSelection;
        }
        Ok(())
    }

    /// `Selected -> ConfirmPending`. Returns the number to confirm.
    pub fn open_confirm(&mut self, snapshot: &BoardSnapshot) -> Result<BoardNumber, DeclareBlocked> {
        if snapshot.declaration().is_declared() {
            return Err(DeclareBlocked::AlreadyDeclared);
        }
        match self.phase {
            DeclarerPhase::Committing(_) => Err(DeclareBlocked::CommitInFlight),
            DeclarerPhase::Declared(_) => Err(DeclareBlocked::AlreadyDeclared),
            DeclarerPhase::NoSelection => Err(DeclareBlocked::NoSelection),
            DeclarerPhase::Selected | DeclarerPhase::ConfirmPending => {
                let number = self.selection.chosen().ok_or(DeclareBlocked::NoSelection)?;
                self.phase = DeclarerPhase::ConfirmPending;
                Ok(number)
            }
        }
    }

    /// `ConfirmPending -> Selected`, no remote call.
    pub fn cancel_confirm(&mut self) -> Result<(), DeclareBlocked> {
        if self.phase != DeclarerPhase::ConfirmPending {
            return Err(DeclareBlocked::NotConfirming);
        }
        self.phase = DeclarerPhase::Selected;
        Ok(())
    }

    /// `ConfirmPending -> Committing`. Returns the request to send, carrying
    /// the chosen number and its current full-board amount.
    pub fn confirm(&mut self, snapshot: &BoardSnapshot) -> Result<DeclareRequest, DeclareBlocked> {
        if snapshot.declaration().is_declared() {
            return Err(DeclareBlocked::AlreadyDeclared);
        }
        match self.phase {
            DeclarerPhase::Committing(_) => Err(DeclareBlocked::CommitInFlight),
            DeclarerPhase::Declared(_) => Err(DeclareBlocked::AlreadyDeclared),
            DeclarerPhase::NoSelection | DeclarerPhase::Selected => {
                Err(DeclareBlocked::NotConfirming)
            }
            DeclarerPhase::ConfirmPending => {
                let number = self.selection.chosen().ok_or(DeclareBlocked::NoSelection)?;
                let request = DeclareRequest {
                    bid_number: number,
                    bid_amount: snapshot.full().amount_or_zero(number.value()),
                };
                self.phase = DeclarerPhase::Committing(request);
                Ok(request)
            }
        }
    }

    /// The round is declared with `number`, either by our own commit or as
    /// observed by the synchronizer. Clears the selection.
    pub fn mark_declared(&mut self, number: BoardNumber) {
        self.selection.clear();
        self.phase = DeclarerPhase::Declared(number);
    }

    /// `Committing -> Selected` (or `NoSelection` if the selection was
    /// cleared meanwhile). Has no effect in any other phase.
    pub fn commit_failed(&mut self) {
        if self.is_committing() {
            self.phase = if self.selection.is_empty() {
                DeclarerPhase::NoSelection
            } else {
                DeclarerPhase::Selected
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bidboard_core::{Amount, BidEntry, BoardUpdate, FetchSeq};

    fn num(n: u8) -> BoardNumber {
        BoardNumber::new(n).unwrap()
    }

    fn snapshot() -> BoardSnapshot {
        let mut snap = BoardSnapshot::new();
        snap.apply(
            FetchSeq::first(),
            &BoardUpdate {
                full: vec![BidEntry::new(12, 30), BidEntry::new(45, 10)],
                ..BoardUpdate::default()
            },
        );
        snap
    }

    #[test]
    fn test_happy_path() {
        let snap = snapshot();
        let mut declarer = Declarer::new();
        assert_eq!(declarer.phase(), DeclarerPhase::NoSelection);

        declarer.select(num(45), &snap).unwrap();
        assert_eq!(declarer.phase(), DeclarerPhase::Selected);

        assert_eq!(declarer.open_confirm(&snap), Ok(num(45)));
        assert_eq!(declarer.phase(), DeclarerPhase::ConfirmPending);

        let request = declarer.confirm(&snap).unwrap();
        assert_eq!(
            request,
            DeclareRequest {
                bid_number: num(45),
                bid_amount: Amount::new(10)
            }
        );
        assert!(declarer.is_committing());

        declarer.mark_declared(num(45));
        assert_eq!(declarer.phase(), DeclarerPhase::Declared(num(45)));
        assert!(declarer.selection().is_empty());
    }

    #[test]
    fn test_open_confirm_requires_selection() {
        let snap = snapshot();
        let mut declarer = Declarer::new();
        assert_eq!(
            declarer.open_confirm(&snap),
            Err(DeclareBlocked::NoSelection)
        );
    }

    #[test]
    fn test_confirm_requires_pending_confirmation() {
        let snap = snapshot();
        let mut declarer = Declarer::new();
        declarer.select(num(12), &snap).unwrap();
        assert_eq!(declarer.confirm(&snap), Err(DeclareBlocked::NotConfirming));
    }

    #[test]
    fn test_cancel_returns_to_selected() {
        let snap = snapshot();
        let mut declarer = Declarer::new();
        declarer.select(num(12), &snap).unwrap();
        declarer.open_confirm(&snap).unwrap();

        declarer.cancel_confirm().unwrap();
        assert_eq!(declarer.phase(), DeclarerPhase::Selected);
        assert_eq!(declarer.selection().chosen(), Some(num(12)));
        assert_eq!(declarer.cancel_confirm(), Err(DeclareBlocked::NotConfirming));
    }

    #[test]
    fn test_second_confirmation_is_refused_while_committing() {
        let snap = snapshot();
        let mut declarer = Declarer::new();
        declarer.select(num(12), &snap).unwrap();
        declarer.open_confirm(&snap).unwrap();
        declarer.confirm(&snap).unwrap();

        assert_eq!(declarer.confirm(&snap), Err(DeclareBlocked::CommitInFlight));
        assert_eq!(
            declarer.open_confirm(&snap),
            Err(DeclareBlocked::CommitInFlight)
        );
    }

    #[test]
    fn test_reselect_while_committing_keeps_request() {
        let snap = snapshot();
        let mut declarer = Declarer::new();
        declarer.select(num(12), &snap).unwrap();
        declarer.open_confirm(&snap).unwrap();
        let request = declarer.confirm(&snap).unwrap();

        declarer.select(num(45), &snap).unwrap();
        assert_eq!(declarer.phase(), DeclarerPhase::Committing(request));

        declarer.commit_failed();
        assert_eq!(declarer.phase(), DeclarerPhase::Selected);
        assert_eq!(declarer.selection().chosen(), Some(num(45)));
    }

    #[test]
    fn test_commit_failure_returns_to_selected() {
        let snap = snapshot();
        let mut declarer = Declarer::new();
        declarer.select(num(12), &snap).unwrap();
        declarer.open_confirm(&snap).unwrap();
        declarer.confirm(&snap).unwrap();

        declarer.commit_failed();
        assert_eq!(declarer.phase(), DeclarerPhase::Selected);
        assert_eq!(declarer.selection().chosen(), Some(num(12)));
    }

    #[test]
    fn test_reselect_drops_pending_confirmation() {
        let snap = snapshot();
        let mut declarer = Declarer::new();
        declarer.select(num(12), &snap).unwrap();
        declarer.open_confirm(&snap).unwrap();

        declarer.select(num(45), &snap).unwrap();
        assert_eq!(declarer.phase(), DeclarerPhase::Selected);
    }

    #[test]
    fn test_everything_blocked_once_declared() {
        let mut snap = snapshot();
        let mut declarer = Declarer::new();
        declarer.select(num(12), &snap).unwrap();

        snap.declare(num(0));
        declarer.mark_declared(num(0));

        assert_eq!(
            declarer.select(num(45), &snap),
            Err(DeclareBlocked::AlreadyDeclared)
        );
        assert_eq!(
            declarer.open_confirm(&snap),
            Err(DeclareBlocked::AlreadyDeclared)
        );
        assert_eq!(declarer.confirm(&snap), Err(DeclareBlocked::AlreadyDeclared));
        assert_eq!(
            declarer.clear_selection(&snap),
            Err(DeclareBlocked::AlreadyDeclared)
        );
        assert_eq!(declarer.phase(), DeclarerPhase::Declared(num(0)));
    }

    #[test]
    fn test_confirm_of_unbid_number_sends_zero_amount() {
        let snap = snapshot();
        let mut declarer = Declarer::new();
        declarer.select(num(3), &snap).unwrap();
        declarer.open_confirm(&snap).unwrap();
        assert_eq!(declarer.confirm(&snap).unwrap().bid_amount, Amount::ZERO);
    }
}
