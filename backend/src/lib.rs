//! Hanafuda Settlement Core - Rust Engine
//!
//! Settles completed hanafuda rounds (koi-koi, hachihachi) into signed
//! per-player point deltas and keeps the running score ledger of a match.
//!
//! # Architecture
//!
//! - **core**: Match calendar
//! - **models**: Domain types (Roster, RoundInput, ScoreSheet, ScoreLedger, SettlementTrace)
//! - **rules**: Rule sets, hand tables and presets
//! - **scoring**: Card scoring, recognizer translation and detection cache
//! - **settlement**: Outcome, hand bonus, side payment and multiplier stages
//! - **orchestrator**: Round settlement pipeline and match sessions
//!
//! # Critical Invariants
//!
//! 1. All point values are i64 once the outcome is resolved
//! 2. Active players' deltas are zero-sum before side payments
//! 3. Settlement is a pure function of (rules, roster, round input)
//! 4. FFI boundary is minimal and safe

// Module declarations
pub mod core;
pub mod models;
pub mod orchestrator;
pub mod rules;
pub mod scoring;
pub mod settlement;

// Re-exports for convenience
pub use crate::core::calendar::MatchCalendar;
pub use models::{
    event::{SettlementEvent, SettlementTrace},
    ledger::{LedgerError, ScoreLedger},
    roster::{Roster, RosterError},
    round::{BonusClaim, FieldState, HandClaim, Outcome, PlayerCapture, RoundInput, SitOutFees},
    score_sheet::ScoreSheet,
};
pub use orchestrator::{settle_round, Match, MatchError, MatchSnapshot, SettlementResult};
pub use rules::{RulePreset, RuleSet, RuleSetError};
pub use settlement::SettlementError;

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn hanafuda_settlement_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::session::PyMatch>()?;
    m.add_function(wrap_pyfunction!(ffi::settle_round_json, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::preset_json, m)?)?;
    Ok(())
}
