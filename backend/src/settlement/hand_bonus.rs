//! Hand-Bonus Adjuster
//!
//! Every active player's hand-bonus (teyaku) total is compared against every
//! other active player's: for each ordered pair `(p1, p2)` with `p1 != p2`,
//! `p1` gains `total[p1] − total[p2]`. The adjustment is zero-sum over the
//! active players and is skipped entirely for special-hand rounds.

use super::SettlementError;
use crate::models::event::{SettlementEvent, SettlementTrace};
use crate::models::round::BonusClaim;
use crate::models::score_sheet::ScoreSheet;
use crate::rules::{HandTableKind, RuleSet};
use std::collections::{BTreeMap, HashSet};

/// Flat bonus for a qualifying jump-in or escape-hand declaration
pub const CHECKBOX_BONUS: i64 = 12;

/// Bonus hands that qualify a jump-in (tobikomi)
pub const JUMP_IN_HANDS: [&str; 2] = ["sanbon", "tatesanbon"];

/// Bonus hands that qualify an escape hand (nukeyaku)
pub const ESCAPE_HAND_HANDS: [&str; 4] = ["aka", "tan-ichi", "toichi", "karasu"];

fn holds_any(claim: &BonusClaim, qualifiers: &[&str]) -> bool {
    claim.hands.iter().any(|h| qualifiers.contains(&h.as_str()))
}

/// Bonus total of one player's claim
///
/// Each checkbox adds `CHECKBOX_BONUS` at most once, and only when the
/// selection holds a qualifying hand. A hand listed twice is rejected.
pub fn bonus_total(rules: &RuleSet, claim: &BonusClaim) -> Result<i64, SettlementError> {
    let mut total: i64 = 0;
    let mut seen = HashSet::new();
    for name in &claim.hands {
        if !seen.insert(name.as_str()) {
            return Err(SettlementError::DuplicateClaim {
                table: HandTableKind::Bonus,
                name: name.clone(),
            });
        }
        let hand = rules
            .hand_bonuses
            .get(name)
            .ok_or_else(|| SettlementError::UnknownHand {
                table: HandTableKind::Bonus,
                name: name.clone(),
            })?;
        if !hand.active {
            return Err(SettlementError::InactiveHand {
                table: HandTableKind::Bonus,
                name: name.clone(),
            });
        }
        total = total.checked_add(hand.score).ok_or(SettlementError::Overflow)?;
    }
    if claim.jump_in && holds_any(claim, &JUMP_IN_HANDS) {
        total += CHECKBOX_BONUS;
    }
    if claim.escape_hand && holds_any(claim, &ESCAPE_HAND_HANDS) {
        total += CHECKBOX_BONUS;
    }
    Ok(total)
}

/// Apply the pairwise hand-bonus adjustment to active players' deltas
pub fn apply_hand_bonuses(
    rules: &RuleSet,
    active: &[String],
    claims: &BTreeMap<String, BonusClaim>,
    deltas: &mut ScoreSheet,
    trace: &mut SettlementTrace,
) -> Result<(), SettlementError> {
    let mut totals = Vec::with_capacity(active.len());
    for player in active {
        let total = match claims.get(player) {
            Some(claim) => bonus_total(rules, claim)?,
            None => 0,
        };
        totals.push(total);
    }

    if totals.iter().all(|t| *t == 0) {
        return Ok(());
    }

    for (player, total) in active.iter().zip(&totals) {
        trace.log(SettlementEvent::HandBonusApplied {
            player: player.clone(),
            bonus_total: *total,
        });
    }

    for (i, p1) in active.iter().enumerate() {
        for (j, _p2) in active.iter().enumerate() {
            if i != j {
                let shifted = totals[i]
                    .checked_sub(totals[j])
                    .and_then(|diff| deltas.value(p1).checked_add(diff))
                    .ok_or(SettlementError::Overflow)?;
                deltas.set(p1, shifted);
            }
        }
    }

    log::debug!("hand bonuses applied: {:?}", totals);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RulePreset;

    fn players(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_checkbox_needs_qualifying_hand() {
        let rules = RulePreset::Hachihachi.load();

        let plain = BonusClaim::new(["kuttsuki"]).with_jump_in().with_escape_hand();
        assert_eq!(bonus_total(&rules, &plain).unwrap(), 48);

        let jump_in = BonusClaim::new(["sanbon"]).with_jump_in();
        assert_eq!(bonus_total(&rules, &jump_in).unwrap(), 36);

        let both = BonusClaim::new(["tatesanbon", "karasu"])
            .with_jump_in()
            .with_escape_hand();
        assert_eq!(bonus_total(&rules, &both).unwrap(), 36 + 48 + 24);
    }

    #[test]
    fn test_unknown_bonus_is_error() {
        let rules = RulePreset::Hachihachi.load();
        let claim = BonusClaim::new(["goko"]);
        assert!(matches!(
            bonus_total(&rules, &claim),
            Err(SettlementError::UnknownHand { .. })
        ));
    }

    #[test]
    fn test_repeated_bonus_hand_rejected() {
        let rules = RulePreset::Hachihachi.load();
        let claim = BonusClaim::new(["teshi", "teshi"]);
        assert_eq!(
            bonus_total(&rules, &claim),
            Err(SettlementError::DuplicateClaim {
                table: HandTableKind::Bonus,
                name: "teshi".to_string()
            })
        );
    }

    #[test]
    fn test_pairwise_adjustment() {
        let rules = RulePreset::Hachihachi.load();
        let active = players(&["A", "B", "C"]);
        let mut claims = BTreeMap::new();
        claims.insert("A".to_string(), BonusClaim::new(["teshi"]));

        let mut deltas = ScoreSheet::zeroed(active.iter().cloned());
        let mut trace = SettlementTrace::new();
        apply_hand_bonuses(&rules, &active, &claims, &mut deltas, &mut trace).unwrap();

        assert_eq!(deltas.value("A"), 144);
        assert_eq!(deltas.value("B"), -72);
        assert_eq!(deltas.value("C"), -72);
        assert_eq!(deltas.total(), 0);
        assert_eq!(trace.events_of_type("HandBonusApplied").len(), 3);
    }

    #[test]
    fn test_no_bonuses_leaves_deltas() {
        let rules = RulePreset::Hachihachi.load();
        let active = players(&["A", "B"]);
        let mut deltas = ScoreSheet::zeroed(active.iter().cloned());
        deltas.set("A", 10);
        let mut trace = SettlementTrace::new();
        apply_hand_bonuses(&rules, &active, &BTreeMap::new(), &mut deltas, &mut trace).unwrap();
        assert_eq!(deltas.value("A"), 10);
        assert!(trace.is_empty());
    }
}
