//! bidboard-app - Round view state and orchestration for the bid board
//!
//! This crate implements the TEA (The Elm Architecture) pattern for the
//! round view: the synchronizer that keeps the boards fresh, the operator's
//! selection, the declaration workflow, render-ready projections and the
//! Engine that ties them to the game-data service.

pub mod actions;
pub mod config;
pub mod declarer;
pub mod engine;
pub mod engine_event;
pub mod handler;
pub mod message;
pub mod process;
pub mod projection;
pub mod selection;
pub mod signals;
pub mod state;
pub mod sync;

// Re-export primary types
pub use engine::Engine;
pub use engine_event::EngineEvent;
pub use handler::{UpdateAction, UpdateResult};
pub use message::{FailureKind, Message};
pub use projection::RoundProjection;
pub use state::AppState;
