//! # bidboard-core - Core Domain Types
//!
//! Foundation crate for the bid board. Provides board domain types, the
//! number decomposition and extrema rules, declaration state, error handling
//! and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Boards (`board`, `number`, `extrema`)
//! - [`BoardNumber`] - A full-board position, `0..=99`
//! - [`decompose()`] - Split a position into its inside/outside digits
//! - [`Board`], [`BoardKind`], [`BidEntry`], [`Amount`] - Fixed-domain wager collections
//! - [`Extrema`], [`ExtremalFlags`] - Min/max amounts and per-position flags
//!
//! ### Round State (`declaration`, `snapshot`, `round`)
//! - [`DeclarationState`] - `Open` or `Declared(number)`; one-way
//! - [`BoardSnapshot`] - The three boards plus declaration state of one round
//! - [`BoardUpdate`], [`FetchSeq`], [`ApplyOutcome`] - Ordered application of fetches
//! - [`RoundId`] - Round identifier
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use bidboard_core::prelude::*;
//! ```

pub mod board;
pub mod declaration;
pub mod error;
pub mod extrema;
pub mod logging;
pub mod number;
pub mod prelude;
pub mod round;
pub mod snapshot;

// Re-export commonly used types at crate root for convenience
pub use board::{Amount, BidEntry, Board, BoardKind};
pub use declaration::{DeclarationState, DeclareTransition};
pub use error::{Error, Result, ResultExt};
pub use extrema::{ExtremalFlags, Extrema};
pub use number::{decompose, BoardNumber, Decomposition, ParseBoardNumberError};
pub use round::RoundId;
pub use snapshot::{ApplyOutcome, BoardSnapshot, BoardUpdate, FetchSeq};
