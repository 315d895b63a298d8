//! Outcome Resolver
//!
//! Exactly one branch settles a round:
//!
//! ```text
//! NoHand        2 active : higher base score takes the difference
//!               3+ active: base − mean, rounded half-to-even, residual onto top scorer
//! DeclaredHand  winner takes hand_total from every loser
//!               hatto    : flagged losers pay 2 × hand_total, others pay nothing
//! SpecialHand   as DeclaredHand without hatto
//! ```
//!
//! A declared/special round whose winner is missing or not active settles
//! to all zeros; that is a valid round, not an error.

use super::SettlementError;
use crate::models::event::{SettlementEvent, SettlementTrace};
use crate::models::round::{HandClaim, Outcome, OutcomeKind, PlayerCapture, RoundInput};
use crate::models::score_sheet::ScoreSheet;
use crate::rules::{HandTable, HandTableKind, RuleSet};
use crate::scoring::capture_score;
use std::collections::{BTreeMap, HashSet};

/// Resolve the round's outcome into active-player deltas
pub fn resolve_outcome(
    rules: &RuleSet,
    active: &[String],
    input: &RoundInput,
    trace: &mut SettlementTrace,
) -> Result<ScoreSheet, SettlementError> {
    match &input.outcome {
        Outcome::NoHand => {
            let base = base_scores(rules, active, &input.captures, trace);
            check_card_total(rules, &base, trace);
            Ok(settle_no_hand(&base, trace))
        }
        Outcome::DeclaredHand {
            winner,
            hands,
            hatto_players,
        } => settle_declared_hand(rules, active, winner.as_deref(), hands, hatto_players, trace),
        Outcome::SpecialHand { winner, hands } => {
            settle_special_hand(rules, active, winner.as_deref(), hands, trace)
        }
    }
}

/// Base score per active player; a player without a capture scores 0
fn base_scores(
    rules: &RuleSet,
    active: &[String],
    captures: &BTreeMap<String, PlayerCapture>,
    trace: &mut SettlementTrace,
) -> ScoreSheet {
    let mut base = ScoreSheet::zeroed(active.iter().cloned());
    for player in active {
        let score = captures
            .get(player)
            .map(|capture| capture_score(capture, rules))
            .unwrap_or(0);
        base.set(player, score);
        trace.log(SettlementEvent::BaseScore {
            player: player.clone(),
            score,
        });
    }
    base
}

/// Warn when the family's fixed card total is not met (an all-zero round is exempt)
fn check_card_total(rules: &RuleSet, base: &ScoreSheet, trace: &mut SettlementTrace) {
    let Some(expected) = rules.fixed_card_total() else {
        return;
    };
    let actual = base.total();
    if actual != expected && actual != 0 {
        log::warn!(
            "active players' card scores sum to {} instead of {}",
            actual,
            expected
        );
        trace.log(SettlementEvent::ScoreSumMismatch { expected, actual });
    }
}

/// Zero-sum settlement on base scores
///
/// With three or more players every `base − mean` is rounded half-to-even and
/// the summed rounding residual is subtracted from the first player holding
/// the highest base score.
pub fn settle_no_hand(base: &ScoreSheet, trace: &mut SettlementTrace) -> ScoreSheet {
    let players: Vec<&str> = base.players().collect();
    let mut deltas = ScoreSheet::zeroed(players.iter().copied());

    match players.len() {
        0 | 1 => {}
        2 => {
            let (a, b) = (players[0], players[1]);
            let difference = (base.value(a) - base.value(b)).abs();
            if base.value(a) > base.value(b) {
                deltas.set(a, difference);
                deltas.set(b, -difference);
            } else if base.value(b) > base.value(a) {
                deltas.set(a, -difference);
                deltas.set(b, difference);
            }
        }
        n => {
            let mean = base.total() as f64 / n as f64;
            for (player, score) in base.iter() {
                deltas.set(player, (score as f64 - mean).round_ties_even() as i64);
            }
            let residual = deltas.total();
            if residual != 0 {
                if let Some(top) = base.leader() {
                    deltas.add(top, -residual);
                    trace.log(SettlementEvent::ResidualAssigned {
                        player: top.to_string(),
                        residual,
                    });
                }
            }
        }
    }

    trace.log(SettlementEvent::OutcomeResolved {
        kind: OutcomeKind::NoHand,
        winner: None,
        hand_total: 0,
        hatto: false,
    });
    deltas
}

/// Sum of claimed hands, variable hands counting their extra items
///
/// Each hand may be claimed once per round.
fn hand_total(
    table: &HandTable,
    kind: HandTableKind,
    claims: &[HandClaim],
) -> Result<i64, SettlementError> {
    let mut total: i64 = 0;
    let mut seen = HashSet::new();
    for claim in claims {
        if !seen.insert(claim.name.as_str()) {
            return Err(SettlementError::DuplicateClaim {
                table: kind,
                name: claim.name.clone(),
            });
        }
        let hand = table
            .get(&claim.name)
            .ok_or_else(|| SettlementError::UnknownHand {
                table: kind,
                name: claim.name.clone(),
            })?;
        if !hand.active {
            return Err(SettlementError::InactiveHand {
                table: kind,
                name: claim.name.clone(),
            });
        }
        total = total
            .checked_add(hand.value_with_extras(claim.extra_items))
            .ok_or(SettlementError::Overflow)?;
    }
    Ok(total)
}

/// Winner only counts when among the active players
fn active_winner<'a>(active: &[String], winner: Option<&'a str>) -> Option<&'a str> {
    winner.filter(|w| active.iter().any(|p| p.as_str() == *w))
}

/// Winner collects `hand_total` from every loser
fn pay_flat(
    sheet: &mut ScoreSheet,
    winner: &str,
    losers: &[&String],
    hand_total: i64,
) -> Result<(), SettlementError> {
    if losers.is_empty() {
        return Ok(());
    }
    let gain = hand_total
        .checked_mul(losers.len() as i64)
        .ok_or(SettlementError::Overflow)?;
    sheet.set(winner, gain);
    for loser in losers {
        sheet.set(loser, -hand_total);
    }
    Ok(())
}

fn settle_declared_hand(
    rules: &RuleSet,
    active: &[String],
    winner: Option<&str>,
    claims: &[HandClaim],
    hatto_players: &[String],
    trace: &mut SettlementTrace,
) -> Result<ScoreSheet, SettlementError> {
    let mut sheet = ScoreSheet::zeroed(active.iter().cloned());
    let Some(winner) = active_winner(active, winner) else {
        trace.log(SettlementEvent::OutcomeVoided {
            kind: OutcomeKind::DeclaredHand,
        });
        return Ok(sheet);
    };

    let total = hand_total(&rules.declared_hands, HandTableKind::Declared, claims)?;
    let losers: Vec<&String> = active.iter().filter(|p| p.as_str() != winner).collect();
    let is_flagged = |player: &str| hatto_players.iter().any(|h| h == player);

    let hatto_hand = claims.iter().any(|claim| {
        rules
            .declared_hands
            .get(&claim.name)
            .map_or(false, |hand| hand.hatto_applicable)
    });
    let hatto = hatto_hand && losers.iter().any(|l| is_flagged(l.as_str()));

    if hatto {
        let payment = total.checked_mul(2).ok_or(SettlementError::Overflow)?;
        let mut winner_gain: i64 = 0;
        for loser in &losers {
            if is_flagged(loser.as_str()) {
                sheet.set(loser, -payment);
                winner_gain = winner_gain
                    .checked_add(payment)
                    .ok_or(SettlementError::Overflow)?;
            } else {
                sheet.set(loser, 0);
            }
        }
        sheet.set(winner, winner_gain);
    } else {
        pay_flat(&mut sheet, winner, &losers, total)?;
    }

    log::debug!("declared hand settled: winner={} hand_total={} hatto={}", winner, total, hatto);
    trace.log(SettlementEvent::OutcomeResolved {
        kind: OutcomeKind::DeclaredHand,
        winner: Some(winner.to_string()),
        hand_total: total,
        hatto,
    });
    Ok(sheet)
}

fn settle_special_hand(
    rules: &RuleSet,
    active: &[String],
    winner: Option<&str>,
    claims: &[HandClaim],
    trace: &mut SettlementTrace,
) -> Result<ScoreSheet, SettlementError> {
    let mut sheet = ScoreSheet::zeroed(active.iter().cloned());
    let Some(winner) = active_winner(active, winner) else {
        trace.log(SettlementEvent::OutcomeVoided {
            kind: OutcomeKind::SpecialHand,
        });
        return Ok(sheet);
    };

    let total = hand_total(&rules.special_hands, HandTableKind::Special, claims)?;
    let losers: Vec<&String> = active.iter().filter(|p| p.as_str() != winner).collect();
    pay_flat(&mut sheet, winner, &losers, total)?;

    trace.log(SettlementEvent::OutcomeResolved {
        kind: OutcomeKind::SpecialHand,
        winner: Some(winner.to_string()),
        hand_total: total,
        hatto: false,
    });
    Ok(sheet)
}
