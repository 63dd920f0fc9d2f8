//! Minimum/maximum wagered amounts used for highlight coloring

use serde::Serialize;

use crate::board::Amount;

/// Minimum and maximum amount across a set of wagers.
///
/// These are values, not positions: every position whose amount equals
/// `min` (or `max`) is extremal, so ties all share the flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Extrema {
    pub min: Amount,
    pub max: Amount,
}

impl Extrema {
    /// Compute extrema; an empty set yields zero for both.
    pub fn of<I>(amounts: I) -> Self
    where
        I: IntoIterator<Item = Amount>,
    {
        amounts
            .into_iter()
            .fold(None, |acc: Option<Extrema>, amount| {
                Some(match acc {
                    None => Extrema {
                        min: amount,
                        max: amount,
                    },
                    Some(e) => Extrema {
                        min: e.min.min(amount),
                        max: e.max.max(amount),
                    },
                })
            })
            .unwrap_or_default()
    }

    /// Flags for a position holding `amount`. Empty positions are never
    /// extremal. When all amounts are equal a position gets both flags.
    pub fn flags_for(&self, amount: Option<Amount>) -> ExtremalFlags {
        match amount {
            Some(a) => ExtremalFlags {
                is_min: a == self.min,
                is_max: a == self.max,
            },
            None => ExtremalFlags::default(),
        }
    }
}

/// Extremal markers for one board position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ExtremalFlags {
    pub is_min: bool,
    pub is_max: bool,
}

impl ExtremalFlags {
    pub fn any(&self) -> bool {
        self.is_min || self.is_max
    }
}
