//! Render-ready projections of a round view
//!
//! Everything here is recomputed from the [`RoundView`] on demand: extrema,
//! highlight and interactivity are never cached.

use serde::Serialize;

use bidboard_core::{
    Amount, BoardKind, BoardNumber, BoardSnapshot, DeclarationState, Extrema, RoundId,
};

use crate::declarer::DeclarerPhase;
use crate::selection::SelectionView;
use crate::state::RoundView;
use crate::sync::SyncState;

/// Palette resolved for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    /// Round declared; all cells frozen
    Neutral,
    Min,
    Max,
    Selected,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellProjection {
    pub number: u8,
    pub amount: Option<Amount>,
    pub is_min: bool,
    pub is_max: bool,
    pub is_selected: bool,
    pub interactive: bool,
    pub highlight: Highlight,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardProjection {
    pub kind: BoardKind,
    pub extrema: Extrema,
    pub cells: Vec<CellProjection>,
}

/// Data for the confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfirmView {
    pub number: BoardNumber,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundProjection {
    pub round_id: RoundId,
    pub declaration: DeclarationState,
    pub phase: DeclarerPhase,
    pub sync: SyncState,
    pub selection: Option<SelectionView>,
    pub confirm: Option<ConfirmView>,
    pub full: BoardProjection,
    pub inside: BoardProjection,
    pub outside: BoardProjection,
}

/// Project the whole round view.
pub fn project(round: &RoundView) -> RoundProjection {
    let snapshot = &round.snapshot;
    let selection = round.declarer.selection().project(snapshot);

    let selected_full = selection.map(|s| s.number.value());
    let selected_inside = selection.map(|s| s.inside.number);
    let selected_outside = selection.map(|s| s.outside.number);

    let confirm = match round.declarer.phase() {
        DeclarerPhase::ConfirmPending => selection.map(|s| ConfirmView {
            number: s.number,
            amount: s.amount,
        }),
        _ => None,
    };

    RoundProjection {
        round_id: round.round_id.clone(),
        declaration: snapshot.declaration(),
        phase: round.declarer.phase(),
        sync: round.sync,
        selection,
        confirm,
        full: project_board(snapshot, BoardKind::Full, selected_full),
        inside: project_board(snapshot, BoardKind::Inside, selected_inside),
        outside: project_board(snapshot, BoardKind::Outside, selected_outside),
    }
}

/// Project one board. `selected` marks the cell tied to the selection.
pub fn project_board(
    snapshot: &BoardSnapshot,
    kind: BoardKind,
    selected: Option<u8>,
) -> BoardProjection {
    let board = snapshot.board(kind);
    let declared = snapshot.declaration().is_declared();
    let extrema = board.extrema();

    let cells = (0..board.kind().domain_size())
        .map(|index| {
            let number = index as u8;
            let amount = board.amount_of(number);
            let flags = extrema.flags_for(board.wager_of(number));
            let is_selected = !declared && selected == Some(number);

            CellProjection {
                number,
                amount,
                is_min: flags.is_min,
                is_max: flags.is_max,
                is_selected,
                interactive: kind == BoardKind::Full && !declared,
                highlight: resolve_highlight(declared, flags.is_min, flags.is_max, is_selected),
            }
        })
        .collect();

    BoardProjection {
        kind,
        extrema,
        cells,
    }
}

/// Declared wins over everything; then min, max, selected.
pub fn resolve_highlight(
    declared: bool,
    is_min: bool,
    is_max: bool,
    is_selected: bool,
) -> Highlight {
    if declared {
        Highlight::Neutral
    } else if is_min {
        Highlight::Min
    } else if is_max {
        Highlight::Max
    } else if is_selected {
        Highlight::Selected
    } else {
        Highlight::Default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bidboard_core::{BidEntry, BoardUpdate, FetchSeq};

    fn num(n: u8) -> BoardNumber {
        BoardNumber::new(n).unwrap()
    }

    fn round() -> RoundView {
        let mut round = RoundView::new(RoundId::new("r1").unwrap());
        round.snapshot.apply(
            FetchSeq::first(),
            &BoardUpdate {
                full: vec![
                    BidEntry::new(12, 30),
                    BidEntry::new(45, 10),
                    BidEntry::new(7, 10),
                    BidEntry::new(50, 20),
                ],
                inside: vec![BidEntry::new(4, 15), BidEntry::new(1, 30)],
                outside: vec![BidEntry::new(5, 11), BidEntry::new(2, 30)],
                declared: None,
            },
        );
        round
    }

    #[test]
    fn test_board_shapes() {
        let projection = project(&round());
        assert_eq!(projection.full.cells.len(), 100);
        assert_eq!(projection.inside.cells.len(), 10);
        assert_eq!(projection.outside.cells.len(), 10);
        assert_eq!(projection.full.cells[99].number, 99);
    }

    #[test]
    fn test_tied_minimum_flags_every_member() {
        let projection = project(&round());
        let full = &projection.full;

        assert!(full.cells[45].is_min);
        assert!(full.cells[7].is_min);
        assert_eq!(full.cells[45].highlight, Highlight::Min);
        assert!(full.cells[12].is_max);
        assert_eq!(full.cells[12].highlight, Highlight::Max);
        assert_eq!(full.cells[50].highlight, Highlight::Default);
        assert_eq!(full.extrema.min, Amount::new(10));
        assert_eq!(full.extrema.max, Amount::new(30));
    }

    #[test]
    fn test_empty_positions_are_never_extremal() {
        let projection = project(&RoundView::new(RoundId::new("r1").unwrap()));
        assert!(projection
            .full
            .cells
            .iter()
            .all(|c| !c.is_min && !c.is_max && c.highlight == Highlight::Default));
        assert_eq!(projection.full.extrema.min, Amount::ZERO);
    }

    #[test]
    fn test_listed_cell_without_amount_is_minimum() {
        let mut round = RoundView::new(RoundId::new("r1").unwrap());
        round.snapshot.apply(
            FetchSeq::first(),
            &BoardUpdate {
                full: vec![
                    BidEntry {
                        number: 3,
                        amount: None,
                    },
                    BidEntry::new(4, 10),
                ],
                ..BoardUpdate::default()
            },
        );

        let full = project(&round).full;
        assert_eq!(full.cells[3].amount, None);
        assert!(full.cells[3].is_min);
        assert_eq!(full.cells[3].highlight, Highlight::Min);
        assert!(full.cells[4].is_max);
        assert!(!full.cells[5].is_min);
    }

    #[test]
    fn test_selected_highlight_loses_to_extrema() {
        let mut round = round();
        let snapshot = round.snapshot.clone();
        round.declarer.select(num(12), &snapshot).unwrap();
        let projection = project(&round);
        assert!(projection.full.cells[12].is_selected);
        assert_eq!(projection.full.cells[12].highlight, Highlight::Max);

        round.declarer.select(num(50), &snapshot).unwrap();
        let projection = project(&round);
        assert_eq!(projection.full.cells[50].highlight, Highlight::Selected);
        assert!(!projection.full.cells[12].is_selected);
    }

    #[test]
    fn test_selection_marks_inside_and_outside_digits() {
        let mut round = round();
        let snapshot = round.snapshot.clone();
        round.declarer.select(num(45), &snapshot).unwrap();

        let projection = project(&round);
        assert!(projection.inside.cells[4].is_selected);
        assert!(projection.outside.cells[5].is_selected);
        assert!(projection.inside.cells.iter().all(|c| !c.interactive));
        assert!(projection.outside.cells.iter().all(|c| !c.interactive));

        let selection = projection.selection.unwrap();
        assert_eq!(selection.inside.amount, Amount::new(15));
        assert_eq!(selection.outside.amount, Amount::new(11));
    }

    #[test]
    fn test_confirm_view_only_while_pending() {
        let mut round = round();
        let snapshot = round.snapshot.clone();
        round.declarer.select(num(45), &snapshot).unwrap();
        assert_eq!(project(&round).confirm, None);

        round.declarer.open_confirm(&snapshot).unwrap();
        assert_eq!(
            project(&round).confirm,
            Some(ConfirmView {
                number: num(45),
                amount: Amount::new(10)
            })
        );
    }

    #[test]
    fn test_declared_round_is_neutral_and_frozen() {
        let mut round = round();
        round.snapshot.declare(num(45));
        round.declarer.mark_declared(num(45));

        let projection = project(&round);
        assert_eq!(projection.declaration, DeclarationState::Declared(num(45)));
        for board in [&projection.full, &projection.inside, &projection.outside] {
            assert!(board
                .cells
                .iter()
                .all(|c| c.highlight == Highlight::Neutral && !c.interactive));
        }
        // Flags stay informative even though the palette is neutral.
        assert!(projection.full.cells[45].is_min);
    }

    #[test]
    fn test_resolve_highlight_precedence() {
        assert_eq!(resolve_highlight(true, true, true, true), Highlight::Neutral);
        assert_eq!(resolve_highlight(false, true, true, true), Highlight::Min);
        assert_eq!(resolve_highlight(false, false, true, true), Highlight::Max);
        assert_eq!(resolve_highlight(false, false, false, true), Highlight::Selected);
        assert_eq!(resolve_highlight(false, false, false, false), Highlight::Default);
    }
}
