//! Bid boards: fixed-domain collections of wagered amounts

use std::fmt;

use serde::Serialize;

use crate::extrema::Extrema;

/// A wagered amount in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One wager line as delivered by the service.
///
/// `number` is not yet validated against a board domain; that happens when
/// the entry is loaded into a [`Board`]. An absent amount still lists the
/// number; it counts as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BidEntry {
    pub number: u8,
    pub amount: Option<Amount>,
}

impl BidEntry {
    pub fn new(number: u8, amount: u64) -> Self {
        Self {
            number,
            amount: Some(Amount::new(amount)),
        }
    }
}

/// Which of the three boards a collection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardKind {
    /// Positions `0..=99`
    Full,
    /// Leading-digit grouping, `0..=9`
    Inside,
    /// Trailing-digit grouping, `0..=9`
    Outside,
}

impl BoardKind {
    /// Number of positions on this board.
    pub fn domain_size(self) -> usize {
        match self {
            BoardKind::Full => 100,
            BoardKind::Inside | BoardKind::Outside => 10,
        }
    }

    pub fn contains(self, number: u8) -> bool {
        usize::from(number) < self.domain_size()
    }

    pub fn label(self) -> &'static str {
        match self {
            BoardKind::Full => "full",
            BoardKind::Inside => "inside",
            BoardKind::Outside => "outside",
        }
    }
}

impl fmt::Display for BoardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One board position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Slot {
    #[default]
    Empty,
    /// Listed by the service, with the amount it sent (if any)
    Listed(Option<Amount>),
}

impl Slot {
    fn wager(self) -> Option<Amount> {
        match self {
            Slot::Empty => None,
            Slot::Listed(amount) => Some(amount.unwrap_or(Amount::ZERO)),
        }
    }
}

/// A fixed-domain board; at most one entry per position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    kind: BoardKind,
    slots: Vec<Slot>,
}

impl Board {
    /// Create an empty board.
    pub fn new(kind: BoardKind) -> Self {
        Self {
            kind,
            slots: vec![Slot::Empty; kind.domain_size()],
        }
    }

    /// Build a board from raw entries. See [`Board::replace_with`].
    pub fn from_entries(kind: BoardKind, entries: &[BidEntry]) -> Self {
        let mut board = Self::new(kind);
        board.replace_with(entries);
        board
    }

    pub fn kind(&self) -> BoardKind {
        self.kind
    }

    /// Amount the service sent for `number`, or `None` when it sent none or
    /// the number is outside this board's domain.
    pub fn amount_of(&self, number: u8) -> Option<Amount> {
        match self.slots.get(usize::from(number)) {
            Some(Slot::Listed(amount)) => *amount,
            _ => None,
        }
    }

    /// Amount counted for extrema: listed positions without an amount count
    /// as zero, unlisted positions are `None`.
    pub fn wager_of(&self, number: u8) -> Option<Amount> {
        self.slots
            .get(usize::from(number))
            .copied()
            .and_then(Slot::wager)
    }

    /// Amount wagered on `number`, treating "no wager" as zero.
    pub fn amount_or_zero(&self, number: u8) -> Amount {
        self.amount_of(number).unwrap_or(Amount::ZERO)
    }

    /// Replace every entry with `entries` (no merge).
    ///
    /// Positions absent from `entries` end up empty. Entries outside the
    /// domain are skipped; when a number repeats, the last entry wins.
    /// Returns how many entries were skipped.
    pub fn replace_with(&mut self, entries: &[BidEntry]) -> usize {
        self.slots.iter_mut().for_each(|slot| *slot = Slot::Empty);

        let mut skipped = 0;
        for entry in entries {
            match self.slots.get_mut(usize::from(entry.number)) {
                Some(slot) => *slot = Slot::Listed(entry.amount),
                None => {
                    skipped += 1;
                    tracing::warn!(
                        "Dropping {} board entry {} (outside 0..{})",
                        self.kind,
                        entry.number,
                        self.kind.domain_size()
                    );
                }
            }
        }
        skipped
    }

    /// Listed positions with their counted amount, ascending.
    pub fn entries(&self) -> impl Iterator<Item = (u8, Amount)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            // domain_size() <= 100, so the index always fits in u8
            slot.wager().map(|amount| (i as u8, amount))
        })
    }

    /// Number of listed positions.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| **slot != Slot::Empty).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| *slot == Slot::Empty)
    }

    /// Minimum and maximum wagered amounts on this board.
    pub fn extrema(&self) -> Extrema {
        Extrema::of(self.entries().map(|(_, amount)| amount))
    }
}
