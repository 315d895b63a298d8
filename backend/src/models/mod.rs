//! Domain models for the settlement engine

pub mod event;
pub mod ledger;
pub mod roster;
pub mod round;
pub mod score_sheet;

// Re-exports
pub use event::{SettlementEvent, SettlementTrace};
pub use ledger::{LedgerError, LedgerRow, RowLabel, ScoreLedger};
pub use roster::{resolve_unique_names, Roster, RosterError};
pub use round::{
    BonusClaim, FieldState, HandClaim, Outcome, OutcomeKind, PlayerCapture, RoundInput, SitOutFees,
};
pub use score_sheet::{PlayerScore, ScoreSheet};
