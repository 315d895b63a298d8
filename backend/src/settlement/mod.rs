//! Settlement Module
//!
//! The staged algorithms that turn one round's outcome into point transfers:
//! - **outcome**: NoHand / DeclaredHand / SpecialHand resolution (exactly one per round)
//! - **hand_bonus**: pairwise hand-bonus (teyaku) adjustment
//! - **side_payments**: sit-out, catch-up and forced-loss fees
//! - **multiplier**: field/custom stake multiplier on active players
//!
//! # Critical Invariants
//!
//! 1. **Active zero-sum**: after outcome + hand bonus, active deltas sum to exactly 0
//! 2. **Roster zero-sum**: side payments move points between players, never create them
//! 3. **Integer points**: every delta leaving the outcome stage is an `i64`
//!
//! # Example
//!
//! ```rust
//! use hanafuda_settlement_core_rs::models::{Outcome, PlayerCapture, RoundInput, SettlementTrace};
//! use hanafuda_settlement_core_rs::rules::RuleSet;
//! use hanafuda_settlement_core_rs::settlement::resolve_outcome;
//!
//! let rules = RuleSet::default();
//! let active = vec!["A".to_string(), "B".to_string()];
//! let input = RoundInput::new(Outcome::NoHand)
//!     .with_capture("A", PlayerCapture::ManualScore(30))
//!     .with_capture("B", PlayerCapture::ManualScore(18));
//!
//! let mut trace = SettlementTrace::new();
//! let sheet = resolve_outcome(&rules, &active, &input, &mut trace).unwrap();
//! assert_eq!(sheet.value("A"), 12);
//! assert_eq!(sheet.value("B"), -12);
//! ```

pub mod hand_bonus;
pub mod multiplier;
pub mod outcome;
pub mod side_payments;

// Re-export public API
pub use hand_bonus::{apply_hand_bonuses, bonus_total, CHECKBOX_BONUS};
pub use multiplier::{apply_multiplier, combined_multiplier};
pub use outcome::{resolve_outcome, settle_no_hand};
pub use side_payments::{apply_side_payments, FORCED_LOSS_UNIT};

use crate::rules::{HandTableKind, RuleSetError, MAX_SCORE};
use thiserror::Error;

/// Errors that stop a round from settling
#[derive(Debug, Error, PartialEq)]
pub enum SettlementError {
    #[error("Participant count below minimum: {active} active, at least {required} required")]
    InsufficientParticipants { active: usize, required: usize },

    #[error("Player not in roster: {0}")]
    UnknownPlayer(String),

    #[error("Hand '{name}' not found in the {table} table")]
    UnknownHand { table: HandTableKind, name: String },

    #[error("Hand '{name}' is disabled in the {table} table")]
    InactiveHand { table: HandTableKind, name: String },

    #[error("Hand '{name}' claimed more than once in the {table} table")]
    DuplicateClaim { table: HandTableKind, name: String },

    #[error("Score {score} entered for {player} exceeds the limit of {max}", max = MAX_SCORE)]
    ScoreOutOfRange { player: String, score: i64 },

    #[error("Point arithmetic overflowed while settling the round")]
    Overflow,

    #[error("Custom multiplier must be at least 1")]
    InvalidMultiplier,

    #[error("Rule set error: {0}")]
    RuleSet(#[from] RuleSetError),
}
