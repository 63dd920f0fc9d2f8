//! Test utilities for the remote service
//!
//! [`ScriptedGameDataService`] answers fetches and declarations from queues
//! filled by the test, and records every call it receives.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bidboard_core::prelude::*;
use bidboard_core::{BidEntry, BoardNumber, BoardUpdate, RoundId};

use crate::protocol::{DeclareReceipt, DeclareRequest};
use crate::service::GameDataService;

/// One scripted answer.
#[derive(Debug, Clone)]
pub enum Scripted<T> {
    Ok(T),
    Transport(String),
    Rejected(String),
    Malformed(String),
}

impl<T> Scripted<T> {
    fn into_result(self) -> Result<T> {
        match self {
            Scripted::Ok(value) => Ok(value),
            Scripted::Transport(msg) => Err(Error::http(msg)),
            Scripted::Rejected(msg) => Err(Error::rejected(msg)),
            Scripted::Malformed(msg) => Err(Error::malformed(msg)),
        }
    }
}

#[derive(Debug, Default)]
struct Script {
    fetches: VecDeque<Scripted<BoardUpdate>>,
    /// Answer repeated once `fetches` runs dry.
    fallback_fetch: Option<BoardUpdate>,
    declares: VecDeque<Scripted<DeclareReceipt>>,
    declare_delay: Option<Duration>,
    fetch_calls: usize,
    declare_requests: Vec<(RoundId, DeclareRequest)>,
}

/// Scripted game-data service. Cheap to clone; clones share the script.
#[derive(Debug, Clone, Default)]
pub struct ScriptedGameDataService {
    script: Arc<Mutex<Script>>,
}

impl ScriptedGameDataService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful fetch.
    pub fn push_fetch(&self, update: BoardUpdate) -> &Self {
        self.with_script(|s| s.fetches.push_back(Scripted::Ok(update)));
        self
    }

    /// Queue an arbitrary fetch outcome.
    pub fn push_fetch_outcome(&self, outcome: Scripted<BoardUpdate>) -> &Self {
        self.with_script(|s| s.fetches.push_back(outcome));
        self
    }

    /// Answer every fetch past the queue with `update`.
    pub fn set_fallback_fetch(&self, update: BoardUpdate) -> &Self {
        self.with_script(|s| s.fallback_fetch = Some(update));
        self
    }

    pub fn push_declare(&self, outcome: Scripted<DeclareReceipt>) -> &Self {
        self.with_script(|s| s.declares.push_back(outcome));
        self
    }

    /// Delay every declaration answer by `delay`.
    pub fn set_declare_delay(&self, delay: Duration) -> &Self {
        self.with_script(|s| s.declare_delay = Some(delay));
        self
    }

    pub fn fetch_calls(&self) -> usize {
        self.with_script(|s| s.fetch_calls)
    }

    pub fn declare_requests(&self) -> Vec<(RoundId, DeclareRequest)> {
        self.with_script(|s| s.declare_requests.clone())
    }

    fn with_script<R>(&self, f: impl FnOnce(&mut Script) -> R) -> R {
        let mut guard = match self.script.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}

impl GameDataService for ScriptedGameDataService {
    async fn fetch_bids(&self, _round: &RoundId) -> Result<BoardUpdate> {
        let next = self.with_script(|s| {
            s.fetch_calls += 1;
            s.fetches
                .pop_front()
                .or_else(|| s.fallback_fetch.clone().map(Scripted::Ok))
        });
        match next {
            Some(outcome) => outcome.into_result(),
            None => Ok(BoardUpdate::default()),
        }
    }

    async fn declare(&self, round: &RoundId, request: DeclareRequest) -> Result<DeclareReceipt> {
        let (next, delay) = self.with_script(|s| {
            s.declare_requests.push((round.clone(), request));
            (s.declares.pop_front(), s.declare_delay)
        });

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match next {
            Some(outcome) => outcome.into_result(),
            None => Ok(declared_receipt(request.bid_number)),
        }
    }
}

/// A success receipt reporting `number` as the winner.
pub fn declared_receipt(number: BoardNumber) -> DeclareReceipt {
    DeclareReceipt {
        declared: Some(number),
        message: Some("Bid declared successfully".to_string()),
    }
}

/// Board update with only the full board populated.
pub fn full_board_update(entries: &[(u8, u64)]) -> BoardUpdate {
    BoardUpdate {
        full: entries
            .iter()
            .map(|&(number, amount)| BidEntry::new(number, amount))
            .collect(),
        ..BoardUpdate::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bidboard_core::Amount;

    fn round() -> RoundId {
        RoundId::new("round-1").unwrap()
    }

    #[tokio::test]
    async fn test_scripted_fetches_in_order_then_fallback() {
        let service = ScriptedGameDataService::new();
        service
            .push_fetch(full_board_update(&[(1, 10)]))
            .push_fetch_outcome(Scripted::Transport("connection reset".into()))
            .set_fallback_fetch(full_board_update(&[(2, 20)]));

        assert_eq!(
            service.fetch_bids(&round()).await.unwrap().full,
            vec![BidEntry::new(1, 10)]
        );
        assert!(matches!(
            service.fetch_bids(&round()).await,
            Err(Error::Http { .. })
        ));
        assert_eq!(
            service.fetch_bids(&round()).await.unwrap().full,
            vec![BidEntry::new(2, 20)]
        );
        assert_eq!(service.fetch_calls(), 3);
    }

    #[tokio::test]
    async fn test_declare_records_requests() {
        let service = ScriptedGameDataService::new();
        let request = DeclareRequest {
            bid_number: BoardNumber::new(45).unwrap(),
            bid_amount: Amount::new(10),
        };

        let receipt = service.declare(&round(), request).await.unwrap();
        assert_eq!(receipt.declared, BoardNumber::new(45));
        assert_eq!(service.declare_requests(), vec![(round(), request)]);
    }
}
