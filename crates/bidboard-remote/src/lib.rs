//! # bidboard-remote - Game-Data Service Client
//!
//! Talks to the remote service that owns the bid boards of a round and
//! accepts the winning-number declaration.
//!
//! Depends on [`bidboard_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Service Abstraction
//! - [`GameDataService`] - Fetch boards and declare a winner (async, `Send`)
//! - [`HttpGameDataService`] - reqwest-backed implementation
//! - [`HttpServiceConfig`] - Base URL, endpoint paths, credentials
//!
//! ### Protocol Parsing
//! - [`parse_bids_response()`] - Bids envelope into a [`bidboard_core::BoardUpdate`]
//! - [`parse_declare_response()`] - Declare envelope into a [`DeclareReceipt`]
//! - [`DeclareRequest`] - Body of the declare call

pub mod http;
pub mod protocol;
pub mod service;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use http::{authorization_value, classify_response, HttpGameDataService, HttpServiceConfig};
pub use protocol::{
    parse_bids_response, parse_declare_response, parse_error_envelope, DeclareReceipt,
    DeclareRequest,
};
pub use service::{GameDataService, LocalGameDataService};
