//! Bid Board Library
//!
//! Live bid boards and winning-number declaration for one game round,
//! driven from the command line.

pub mod headless;

// Re-export main entry point
pub use headless::runner::run_headless;
