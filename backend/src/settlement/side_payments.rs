//! Side-Payment Stage
//!
//! Extends the running deltas to the whole roster and applies, in order:
//!
//! 1. **Sit-out fee** (orichin): each sit-out player pays their fee to the
//!    round leader, the active player with the highest delta so far
//! 2. **Catch-up fee** (oikomi): each sit-out player collects their fee from
//!    every active player
//! 3. **Forced-loss fee** (mizuten): the designated player gains 12 from
//!    every other roster member
//!
//! Each step is gated by its rule-set toggle. All three are zero-sum.

use crate::models::event::{SettlementEvent, SettlementTrace};
use crate::models::roster::Roster;
use crate::models::round::RoundInput;
use crate::models::score_sheet::ScoreSheet;
use crate::rules::RuleSet;

/// Points each other roster member pays the forced-loss player
pub const FORCED_LOSS_UNIT: i64 = 12;

/// Apply side payments and return deltas covering the whole roster
///
/// `deltas` holds the active players' running totals after the hand-bonus
/// stage; sit-out players join at 0.
pub fn apply_side_payments(
    rules: &RuleSet,
    roster: &Roster,
    active: &[String],
    input: &RoundInput,
    deltas: &ScoreSheet,
    trace: &mut SettlementTrace,
) -> ScoreSheet {
    let mut sheet = ScoreSheet::zeroed(roster.players().iter().cloned());
    for (player, delta) in deltas.iter() {
        sheet.set(player, delta);
    }

    let is_active = |player: &str| active.iter().any(|p| p == player);
    let sit_outs: Vec<&String> = roster
        .players()
        .iter()
        .filter(|p| !is_active(p.as_str()))
        .collect();

    if rules.sit_out_fee_enabled && !sit_outs.is_empty() && !deltas.is_empty() {
        // Leader is read from the active deltas before any fee moves
        if let Some(leader) = deltas.leader().map(str::to_string) {
            for payer in &sit_outs {
                let fee = input.fees.get(payer.as_str()).map_or(0, |f| f.sit_out_fee);
                if fee == 0 {
                    continue;
                }
                let amount = i64::from(fee);
                sheet.add(payer, -amount);
                sheet.add(&leader, amount);
                trace.log(SettlementEvent::SitOutFeePaid {
                    payer: payer.to_string(),
                    leader: leader.clone(),
                    amount,
                });
            }
        }
    }

    if rules.catch_up_fee_enabled {
        for receiver in &sit_outs {
            let fee = input.fees.get(receiver.as_str()).map_or(0, |f| f.catch_up_fee);
            if fee == 0 {
                continue;
            }
            let per_player = i64::from(fee);
            sheet.add(receiver, per_player * active.len() as i64);
            for player in active {
                sheet.add(player, -per_player);
            }
            trace.log(SettlementEvent::CatchUpFeePaid {
                receiver: receiver.to_string(),
                per_player,
                active_count: active.len(),
            });
        }
    }

    if rules.forced_loss_fee_enabled {
        if let Some(target) = input.forced_loss_player.as_deref() {
            if roster.contains(target) {
                let gain = FORCED_LOSS_UNIT * (roster.len() as i64 - 1);
                for player in roster.players() {
                    if player == target {
                        sheet.add(player, gain);
                    } else {
                        sheet.add(player, -FORCED_LOSS_UNIT);
                    }
                }
                trace.log(SettlementEvent::ForcedLossApplied {
                    player: target.to_string(),
                    gain,
                });
            }
        }
    }

    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::round::{Outcome, SitOutFees};
    use crate::rules::RulePreset;

    fn setup() -> (RuleSet, Roster, Vec<String>) {
        let rules = RulePreset::Hachihachi.load();
        let roster = Roster::new(&["A", "B", "C", "D"]).unwrap();
        let active = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        (rules, roster, active)
    }

    fn active_deltas() -> ScoreSheet {
        let mut sheet = ScoreSheet::new();
        sheet.set("A", -10);
        sheet.set("B", 30);
        sheet.set("C", -20);
        sheet
    }

    #[test]
    fn test_sit_out_fee_goes_to_leader() {
        let (rules, roster, active) = setup();
        let input = RoundInput::new(Outcome::NoHand).with_fees(
            "D",
            SitOutFees {
                sit_out_fee: 5,
                catch_up_fee: 0,
            },
        );
        let mut trace = SettlementTrace::new();
        let sheet = apply_side_payments(&rules, &roster, &active, &input, &active_deltas(), &mut trace);

        assert_eq!(sheet.value("B"), 35);
        assert_eq!(sheet.value("D"), -5);
        assert_eq!(sheet.total(), 0);
    }

    #[test]
    fn test_catch_up_fee_from_every_active_player() {
        let (rules, roster, active) = setup();
        let input = RoundInput::new(Outcome::NoHand).with_fees(
            "D",
            SitOutFees {
                sit_out_fee: 0,
                catch_up_fee: 4,
            },
        );
        let mut trace = SettlementTrace::new();
        let sheet = apply_side_payments(&rules, &roster, &active, &input, &active_deltas(), &mut trace);

        assert_eq!(sheet.value("D"), 12);
        assert_eq!(sheet.value("A"), -14);
        assert_eq!(sheet.total(), 0);
    }

    #[test]
    fn test_forced_loss_covers_whole_roster() {
        let (rules, roster, active) = setup();
        let input = RoundInput::new(Outcome::NoHand).with_forced_loss("D");
        let mut trace = SettlementTrace::new();
        let sheet = apply_side_payments(
            &rules,
            &roster,
            &active,
            &input,
            &ScoreSheet::zeroed(active.iter().cloned()),
            &mut trace,
        );

        assert_eq!(sheet.value("D"), 36);
        for p in ["A", "B", "C"] {
            assert_eq!(sheet.value(p), -12);
        }
    }

    #[test]
    fn test_disabled_toggles_do_nothing() {
        let (_, roster, active) = setup();
        let rules = RulePreset::HachihachiHouse.load();
        let input = RoundInput::new(Outcome::NoHand)
            .with_fees(
                "D",
                SitOutFees {
                    sit_out_fee: 5,
                    catch_up_fee: 5,
                },
            )
            .with_forced_loss("A");
        let mut trace = SettlementTrace::new();
        let sheet = apply_side_payments(&rules, &roster, &active, &input, &active_deltas(), &mut trace);

        assert_eq!(sheet.value("D"), 0);
        assert_eq!(sheet.value("B"), 30);
        assert!(trace.is_empty());
    }
}
