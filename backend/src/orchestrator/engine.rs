//! Settlement Engine
//!
//! Settles one round as a pure function of the rule set, the roster and the
//! round input. No state survives the call; the caller owns the ledger.
//!
//! # Architecture
//!
//! ```text
//! settle_round(rules, roster, input):
//! 1. Validate rules and input, resolve active players
//! 2. Resolve the outcome (NoHand / DeclaredHand / SpecialHand)
//! 3. Apply hand bonuses (skipped for SpecialHand)
//! 4. Apply side payments (sit-out, catch-up, forced-loss)
//! 5. Apply the combined multiplier to active players
//! ```
//!
//! # Example
//!
//! ```rust
//! use hanafuda_settlement_core_rs::models::{HandClaim, Outcome, Roster, RoundInput};
//! use hanafuda_settlement_core_rs::orchestrator::settle_round;
//! use hanafuda_settlement_core_rs::rules::RulePreset;
//!
//! let rules = RulePreset::Hachihachi.load();
//! let roster = Roster::new(&["Ann", "Ben", "Cid"]).unwrap();
//! let input = RoundInput::new(Outcome::declared("Ann", vec![HandClaim::new("aotan")]));
//!
//! let result = settle_round(&rules, &roster, &input).unwrap();
//! assert_eq!(result.delta("Ann"), 168);
//! assert_eq!(result.delta("Ben"), -84);
//! assert_eq!(result.total(), 0);
//! ```

use crate::models::event::{SettlementEvent, SettlementTrace};
use crate::models::roster::{Roster, MIN_PLAYERS};
use crate::models::round::{Outcome, OutcomeKind, PlayerCapture, RoundInput};
use crate::models::score_sheet::ScoreSheet;
use crate::rules::{RuleSet, MAX_SCORE};
use crate::settlement::{
    apply_hand_bonuses, apply_multiplier, apply_side_payments, combined_multiplier,
    resolve_outcome, SettlementError,
};
use serde::{Deserialize, Serialize};

/// Final per-player deltas of one round, with the trace that produced them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementResult {
    /// Integer delta for every roster member, in roster order
    pub deltas: ScoreSheet,
    pub active_players: Vec<String>,
    pub multiplier: i64,
    pub trace: SettlementTrace,
}

impl SettlementResult {
    pub fn delta(&self, player: &str) -> i64 {
        self.deltas.value(player)
    }

    pub fn total(&self) -> i64 {
        self.deltas.total()
    }

    pub fn warnings(&self) -> Vec<&SettlementEvent> {
        self.trace.warnings()
    }

    pub fn is_active(&self, player: &str) -> bool {
        self.active_players.iter().any(|p| p == player)
    }
}

/// Active players in roster order
///
/// Every requested name must be in the roster. Rosters too small for
/// sitting out then always play in full.
pub fn resolve_active_players(
    roster: &Roster,
    input: &RoundInput,
) -> Result<Vec<String>, SettlementError> {
    let Some(requested) = &input.active_players else {
        return Ok(roster.players().to_vec());
    };
    if let Some(stranger) = requested.iter().find(|p| !roster.contains(p)) {
        return Err(SettlementError::UnknownPlayer(stranger.clone()));
    }
    if !roster.allows_sit_out() {
        return Ok(roster.players().to_vec());
    }

    let active: Vec<String> = roster
        .players()
        .iter()
        .filter(|p| requested.contains(p))
        .cloned()
        .collect();

    if active.len() < MIN_PLAYERS {
        return Err(SettlementError::InsufficientParticipants {
            active: active.len(),
            required: MIN_PLAYERS,
        });
    }
    Ok(active)
}

/// Reject inputs naming players outside the roster or entering
/// out-of-range manual scores
pub fn validate_input(roster: &Roster, input: &RoundInput) -> Result<(), SettlementError> {
    let hatto_players: &[String] = match &input.outcome {
        Outcome::DeclaredHand { hatto_players, .. } => hatto_players,
        _ => &[],
    };
    let named = input
        .captures
        .keys()
        .chain(input.bonuses.keys())
        .chain(input.fees.keys())
        .chain(input.forced_loss_player.iter())
        .chain(hatto_players.iter());

    for player in named {
        if !roster.contains(player) {
            return Err(SettlementError::UnknownPlayer(player.clone()));
        }
    }

    for (player, capture) in &input.captures {
        if let PlayerCapture::ManualScore(score) = capture {
            if score.unsigned_abs() > MAX_SCORE.unsigned_abs() {
                return Err(SettlementError::ScoreOutOfRange {
                    player: player.clone(),
                    score: *score,
                });
            }
        }
    }
    Ok(())
}

/// Settle one round
///
/// # Errors
///
/// - `InsufficientParticipants` when fewer than two players are active
/// - `UnknownPlayer` when the input names someone outside the roster
/// - `UnknownHand` / `InactiveHand` for a claimed hand the rules do not offer
/// - `DuplicateClaim` for a hand claimed twice in one selection
/// - `ScoreOutOfRange` for a manual score beyond `MAX_SCORE`
/// - `InvalidMultiplier` for a custom multiplier of 0
/// - `Overflow` when the multiplied totals no longer fit in an `i64`
pub fn settle_round(
    rules: &RuleSet,
    roster: &Roster,
    input: &RoundInput,
) -> Result<SettlementResult, SettlementError> {
    rules.validate()?;
    validate_input(roster, input)?;
    let active = resolve_active_players(roster, input)?;
    let multiplier = combined_multiplier(rules, input)?;

    let mut trace = SettlementTrace::new();

    // Outcome + hand bonus: zero-sum over the active players
    let mut deltas: ScoreSheet = resolve_outcome(rules, &active, input, &mut trace)?;
    if input.outcome.kind() != OutcomeKind::SpecialHand {
        apply_hand_bonuses(rules, &active, &input.bonuses, &mut deltas, &mut trace)?;
    }
    debug_assert_eq!(deltas.total(), 0, "active deltas must be zero-sum");

    let mut deltas = apply_side_payments(rules, roster, &active, input, &deltas, &mut trace);
    debug_assert_eq!(deltas.total(), 0, "side payments must be zero-sum");

    apply_multiplier(&mut deltas, &active, multiplier, &mut trace)?;

    log::debug!(
        "round settled: outcome={:?} active={} multiplier={}",
        input.outcome.kind(),
        active.len(),
        multiplier
    );

    Ok(SettlementResult {
        deltas,
        active_players: active,
        multiplier,
        trace,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::round::{Outcome, PlayerCapture};
    use crate::rules::RulePreset;

    #[test]
    fn test_small_roster_ignores_active_subset() {
        let roster = Roster::new(&["A", "B", "C"]).unwrap();
        let input = RoundInput::new(Outcome::NoHand).with_active_players(["A", "B"]);
        assert_eq!(
            resolve_active_players(&roster, &input).unwrap(),
            vec!["A", "B", "C"]
        );
    }

    #[test]
    fn test_small_roster_rejects_unknown_active_name() {
        let roster = Roster::new(&["A", "B", "C"]).unwrap();
        let input = RoundInput::new(Outcome::NoHand).with_active_players(["A", "Zed"]);
        assert_eq!(
            resolve_active_players(&roster, &input).unwrap_err(),
            SettlementError::UnknownPlayer("Zed".to_string())
        );
    }

    #[test]
    fn test_active_players_follow_roster_order() {
        let roster = Roster::new(&["A", "B", "C", "D"]).unwrap();
        let input = RoundInput::new(Outcome::NoHand).with_active_players(["D", "B", "A"]);
        assert_eq!(
            resolve_active_players(&roster, &input).unwrap(),
            vec!["A", "B", "D"]
        );
    }

    #[test]
    fn test_single_active_player_rejected() {
        let roster = Roster::new(&["A", "B", "C", "D"]).unwrap();
        let input = RoundInput::new(Outcome::NoHand).with_active_players(["A"]);
        assert_eq!(
            settle_round(&RuleSet::default(), &roster, &input).unwrap_err(),
            SettlementError::InsufficientParticipants {
                active: 1,
                required: 2
            }
        );
    }

    #[test]
    fn test_capture_for_stranger_rejected() {
        let roster = Roster::new(&["A", "B"]).unwrap();
        let input =
            RoundInput::new(Outcome::NoHand).with_capture("Z", PlayerCapture::ManualScore(1));
        assert_eq!(
            settle_round(&RuleSet::default(), &roster, &input).unwrap_err(),
            SettlementError::UnknownPlayer("Z".to_string())
        );
    }

    #[test]
    fn test_misspelled_hatto_player_rejected() {
        let rules = RulePreset::Hachihachi.load();
        let roster = Roster::new(&["A", "B", "C"]).unwrap();
        let input = RoundInput::new(Outcome::DeclaredHand {
            winner: Some("A".to_string()),
            hands: vec![crate::models::round::HandClaim::new("shiko")],
            hatto_players: vec!["b".to_string()],
        });
        assert_eq!(
            settle_round(&rules, &roster, &input).unwrap_err(),
            SettlementError::UnknownPlayer("b".to_string())
        );
    }

    #[test]
    fn test_manual_score_out_of_range_rejected() {
        let roster = Roster::new(&["A", "B", "C"]).unwrap();
        let input = RoundInput::new(Outcome::NoHand)
            .with_capture("A", PlayerCapture::ManualScore(i64::MAX))
            .with_capture("B", PlayerCapture::ManualScore(0));
        assert_eq!(
            settle_round(&RuleSet::default(), &roster, &input).unwrap_err(),
            SettlementError::ScoreOutOfRange {
                player: "A".to_string(),
                score: i64::MAX
            }
        );

        let input = RoundInput::new(Outcome::NoHand)
            .with_capture("A", PlayerCapture::ManualScore(-MAX_SCORE))
            .with_capture("B", PlayerCapture::ManualScore(MAX_SCORE));
        assert!(settle_round(&RuleSet::default(), &roster, &input).is_ok());
    }

    #[test]
    fn test_multiplied_overflow_is_an_error() {
        use crate::models::round::{FieldState, HandClaim};
        use crate::rules::{HandDefinition, HandTableKind};

        let mut rules = RulePreset::Hachihachi.load();
        rules
            .add_hand(
                HandTableKind::Declared,
                HandDefinition::fixed("kasu-plus", MAX_SCORE).variable(MAX_SCORE, "kasu"),
            )
            .unwrap();
        let roster = Roster::new(&["A", "B"]).unwrap();
        let input = RoundInput::new(Outcome::declared(
            "A",
            vec![HandClaim::new("kasu-plus").with_extra_items(u32::MAX)],
        ))
        .with_field_state(FieldState::Exceptional)
        .with_custom_multiplier(u32::MAX);
        assert_eq!(
            settle_round(&rules, &roster, &input).unwrap_err(),
            SettlementError::Overflow
        );
    }

    #[test]
    fn test_settlement_is_idempotent() {
        let rules = RulePreset::Hachihachi.load();
        let roster = Roster::new(&["A", "B", "C"]).unwrap();
        let input = RoundInput::new(Outcome::NoHand)
            .with_capture("A", PlayerCapture::ManualScore(120))
            .with_capture("B", PlayerCapture::ManualScore(80))
            .with_capture("C", PlayerCapture::ManualScore(64));

        let first = settle_round(&rules, &roster, &input).unwrap();
        let second = settle_round(&rules, &roster, &input).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.total(), 0);
    }
}
