//! Settlement trace
//!
//! Every significant step of a settlement is recorded as a typed event so a
//! round can be audited after the fact:
//! - **Base scores**: per-player captured score (NoHand rounds)
//! - **Outcome**: which branch settled the round and for how much
//! - **Hand bonus**: per-player bonus totals used for the pairwise adjustment
//! - **Side payments**: sit-out, catch-up and forced-loss transfers
//! - **Multiplier**: combined stake multiplier and who it touched
//! - **Warnings**: non-blocking rule violations (card total mismatch)
//!
//! # Example
//!
//! ```rust
//! use hanafuda_settlement_core_rs::models::event::{SettlementEvent, SettlementTrace};
//!
//! let mut trace = SettlementTrace::new();
//! trace.log(SettlementEvent::SitOutFeePaid {
//!     payer: "Dan".to_string(),
//!     leader: "Ann".to_string(),
//!     amount: 12,
//! });
//! assert_eq!(trace.events_for_player("Ann").len(), 1);
//! ```

use crate::models::round::OutcomeKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SettlementEvent {
    /// Base score derived from an active player's capture
    BaseScore { player: String, score: i64 },

    /// Active players' card scores do not add up to the deck total
    ScoreSumMismatch { expected: i64, actual: i64 },

    /// Outcome branch that settled the round
    OutcomeResolved {
        kind: OutcomeKind,
        winner: Option<String>,
        hand_total: i64,
        hatto: bool,
    },

    /// Nothing was paid: winner missing or not active
    OutcomeVoided { kind: OutcomeKind },

    /// Rounding residual moved onto the top scorer
    ResidualAssigned { player: String, residual: i64 },

    /// Hand-bonus total of one player, before pairwise adjustment
    HandBonusApplied { player: String, bonus_total: i64 },

    SitOutFeePaid {
        payer: String,
        leader: String,
        amount: i64,
    },

    CatchUpFeePaid {
        receiver: String,
        per_player: i64,
        active_count: usize,
    },

    ForcedLossApplied { player: String, gain: i64 },

    MultiplierApplied {
        multiplier: i64,
        players: Vec<String>,
    },
}

impl SettlementEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            SettlementEvent::BaseScore { .. } => "BaseScore",
            SettlementEvent::ScoreSumMismatch { .. } => "ScoreSumMismatch",
            SettlementEvent::OutcomeResolved { .. } => "OutcomeResolved",
            SettlementEvent::OutcomeVoided { .. } => "OutcomeVoided",
            SettlementEvent::ResidualAssigned { .. } => "ResidualAssigned",
            SettlementEvent::HandBonusApplied { .. } => "HandBonusApplied",
            SettlementEvent::SitOutFeePaid { .. } => "SitOutFeePaid",
            SettlementEvent::CatchUpFeePaid { .. } => "CatchUpFeePaid",
            SettlementEvent::ForcedLossApplied { .. } => "ForcedLossApplied",
            SettlementEvent::MultiplierApplied { .. } => "MultiplierApplied",
        }
    }

    /// Whether the event names `player`
    pub fn involves(&self, player: &str) -> bool {
        match self {
            SettlementEvent::BaseScore { player: p, .. }
            | SettlementEvent::ResidualAssigned { player: p, .. }
            | SettlementEvent::HandBonusApplied { player: p, .. }
            | SettlementEvent::ForcedLossApplied { player: p, .. } => p == player,
            SettlementEvent::CatchUpFeePaid { receiver, .. } => receiver == player,
            SettlementEvent::SitOutFeePaid { payer, leader, .. } => {
                payer == player || leader == player
            }
            SettlementEvent::OutcomeResolved { winner, .. } => winner.as_deref() == Some(player),
            SettlementEvent::MultiplierApplied { players, .. } => players.iter().any(|p| p == player),
            SettlementEvent::ScoreSumMismatch { .. } | SettlementEvent::OutcomeVoided { .. } => false,
        }
    }

    /// Warnings never block settlement
    pub fn is_warning(&self) -> bool {
        matches!(self, SettlementEvent::ScoreSumMismatch { .. })
    }
}

/// Ordered log of settlement events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettlementTrace {
    events: Vec<SettlementEvent>,
}

impl SettlementTrace {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn log(&mut self, event: SettlementEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[SettlementEvent] {
        &self.events
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<&SettlementEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    pub fn events_for_player(&self, player: &str) -> Vec<&SettlementEvent> {
        self.events.iter().filter(|e| e.involves(player)).collect()
    }

    pub fn warnings(&self) -> Vec<&SettlementEvent> {
        self.events.iter().filter(|e| e.is_warning()).collect()
    }
}
