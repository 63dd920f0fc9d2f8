//! Game-data service abstraction
//!
//! The application talks to the remote service only through this trait, so
//! the synchronizer and declarer can be driven by the HTTP client in
//! production and by a scripted double in tests.

use bidboard_core::prelude::*;
use bidboard_core::{BoardUpdate, RoundId};

use crate::protocol::{DeclareReceipt, DeclareRequest};

/// Remote operations for one round's bid data.
#[trait_variant::make(GameDataService: Send)]
pub trait LocalGameDataService {
    /// Fetch the current boards and declaration state of `round`.
    async fn fetch_bids(&self, round: &RoundId) -> Result<BoardUpdate>;

    /// Ask the service to fix the winning number of `round`.
    ///
    /// Returns [`Error::Rejected`] when the service refuses the declaration.
    async fn declare(&self, round: &RoundId, request: DeclareRequest) -> Result<DeclareReceipt>;
}
