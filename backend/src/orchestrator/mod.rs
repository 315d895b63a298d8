//! Orchestrator - round settlement and match sessions
//!
//! `engine` settles a single round as a pure function; `session` strings
//! rounds together into a 12-month match with a persistent ledger.

pub mod checkpoint;
pub mod engine;
pub mod session;

// Re-export main types for convenience
pub use engine::{resolve_active_players, settle_round, validate_input, SettlementResult};
pub use session::{Match, MatchError};

// Re-export checkpoint types
pub use checkpoint::{validate_snapshot, CheckpointError, MatchSnapshot};
