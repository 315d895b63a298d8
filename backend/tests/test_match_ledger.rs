//! Match and Ledger Tests
//!
//! A full match driven month by month: ledger rows, cumulative totals,
//! late joiners, rule changes, resets and checkpoint round trips.

use hanafuda_settlement_core_rs::models::{
    HandClaim, LedgerError, Outcome, PlayerCapture, Roster, RoundInput, RowLabel, ScoreLedger,
    ScoreSheet,
};
use hanafuda_settlement_core_rs::orchestrator::{CheckpointError, MatchSnapshot};
use hanafuda_settlement_core_rs::rules::RulePreset;
use hanafuda_settlement_core_rs::{Match, MatchError};

fn no_hand(scores: &[(&str, i64)]) -> RoundInput {
    scores.iter().fold(RoundInput::new(Outcome::NoHand), |input, (p, s)| {
        input.with_capture(*p, PlayerCapture::ManualScore(*s))
    })
}

#[test]
fn test_initial_scores_by_family() {
    let hachi = Match::from_preset(RulePreset::Hachihachi, &["A", "B"]).unwrap();
    assert_eq!(hachi.standings().value("A"), 60);

    let koi = Match::from_preset(RulePreset::KoiKoi, &["A", "B"]).unwrap();
    assert_eq!(koi.standings().value("A"), 0);
}

#[test]
fn test_per_player_starting_scores() {
    let mut initial = ScoreSheet::new();
    initial.set("A", 90);
    initial.set("B", 30);
    let mut game = Match::with_initial_scores(
        RulePreset::Hachihachi.load(),
        Roster::new(&["A", "B", "C"]).unwrap(),
        &initial,
    )
    .unwrap();

    assert_eq!(game.ledger().rows()[0].label, RowLabel::Initial);
    assert_eq!(game.standings().value("A"), 90);
    assert_eq!(game.standings().value("B"), 30);
    assert_eq!(game.standings().value("C"), 60);

    game.settle_month(&no_hand(&[("A", 88), ("B", 88), ("C", 88)])).unwrap();
    assert_eq!(game.standings().total(), 180);

    let json = game.snapshot().unwrap().to_json().unwrap();
    let resumed =
        Match::restore(RulePreset::Hachihachi.load(), MatchSnapshot::from_json(&json).unwrap())
            .unwrap();
    assert_eq!(resumed.ledger().cumulative("B").unwrap(), vec![30, 30]);
}

#[test]
fn test_starting_score_for_unknown_player_rejected() {
    let mut initial = ScoreSheet::new();
    initial.set("Zed", 10);
    let err = Match::with_initial_scores(
        RulePreset::KoiKoi.load(),
        Roster::new(&["A", "B"]).unwrap(),
        &initial,
    )
    .unwrap_err();
    assert_eq!(err, MatchError::Ledger(LedgerError::UnknownPlayer("Zed".to_string())));
}

#[test]
fn test_full_twelve_month_match() {
    let mut game = Match::from_preset(RulePreset::Hachihachi, &["A", "B", "C"]).unwrap();

    for month in 1..=12u32 {
        assert_eq!(game.calendar().current_month(), month);
        let input = if month % 2 == 0 {
            RoundInput::new(Outcome::declared("B", vec![HandClaim::new("akatan")]))
        } else {
            no_hand(&[("A", 120), ("B", 90), ("C", 54)])
        };
        game.settle_month(&input).unwrap();
    }

    assert!(game.is_finished());
    assert_eq!(game.ledger().months_recorded(), 12);

    // 6 × NoHand (32, 2, −34) + 6 × akatan by B (−84, 168, −84)
    let standings = game.standings();
    assert_eq!(standings.value("A"), 60 + 6 * 32 - 6 * 84);
    assert_eq!(standings.value("B"), 60 + 6 * 2 + 6 * 168);
    assert_eq!(standings.value("C"), 60 - 6 * 34 - 6 * 84);
    assert_eq!(standings.total(), 180);

    assert_eq!(game.ledger().leader().map(|(p, _)| p), Some("B".to_string()));
    assert!(matches!(
        game.settle_month(&no_hand(&[])),
        Err(MatchError::Finished { months: 12 })
    ));
}

#[test]
fn test_ledger_rows_keyed_by_month() {
    let mut game = Match::from_preset(RulePreset::Hachihachi, &["A", "B"]).unwrap();
    game.settle_month(&no_hand(&[("A", 150), ("B", 114)])).unwrap();
    game.settle_month(&no_hand(&[("A", 100), ("B", 164)])).unwrap();

    let labels: Vec<RowLabel> = game.ledger().rows().iter().map(|r| r.label).collect();
    assert_eq!(
        labels,
        vec![RowLabel::Initial, RowLabel::Month(1), RowLabel::Month(2)]
    );
    assert_eq!(game.ledger().cumulative("A").unwrap(), vec![60, 96, 32]);
    assert_eq!(game.ledger().last_delta("B"), Some(64));
}

#[test]
fn test_late_joiner_sits_out_then_plays() {
    let mut game = Match::from_preset(RulePreset::Hachihachi, &["A", "B", "C"]).unwrap();
    game.settle_month(&no_hand(&[("A", 120), ("B", 90), ("C", 54)])).unwrap();

    let joined = game.add_player("D").unwrap();
    assert_eq!(joined, "D");
    assert_eq!(game.ledger().cumulative("D").unwrap(), vec![60, 60]);

    let input = no_hand(&[("A", 88), ("B", 88), ("D", 88)]).with_active_players(["A", "B", "D"]);
    let result = game.settle_month(&input).unwrap();
    assert!(!result.is_active("C"));
    assert_eq!(game.ledger().months_recorded(), 2);
}

#[test]
fn test_roster_cap_enforced_on_late_join() {
    let names = ["A", "B", "C", "D", "E", "F", "G"];
    let mut game = Match::from_preset(RulePreset::Hachihachi, &names).unwrap();
    assert!(matches!(game.add_player("H"), Err(MatchError::Roster(_))));
}

#[test]
fn test_preset_switch_mid_match() {
    let mut game = Match::from_preset(RulePreset::Hachihachi, &["A", "B", "C", "D"]).unwrap();
    let input = no_hand(&[("A", 120), ("B", 90), ("C", 54)])
        .with_active_players(["A", "B", "C"])
        .with_forced_loss("D");

    let with_fees = game.settle_month(&input).unwrap();
    assert_eq!(with_fees.delta("D"), 36);

    game.load_preset(RulePreset::HachihachiHouse);
    let without_fees = game.settle_month(&input).unwrap();
    assert_eq!(without_fees.delta("D"), 0);
    assert_eq!(game.ledger().months_recorded(), 2);
}

#[test]
fn test_reset_scores_keeps_roster_and_rules() {
    let mut game = Match::from_preset(RulePreset::Hachihachi, &["A", "B"]).unwrap();
    game.settle_month(&no_hand(&[("A", 150), ("B", 114)])).unwrap();
    game.add_player("C").unwrap();
    game.reset_scores();

    assert_eq!(game.roster().len(), 3);
    assert_eq!(game.calendar().current_month(), 1);
    assert_eq!(game.standings().value("A"), 60);
    assert_eq!(game.standings().value("C"), 60);
}

#[test]
fn test_checkpoint_json_restore() {
    let mut game = Match::from_preset(RulePreset::Hachihachi, &["A", "B"]).unwrap();
    game.settle_month(&no_hand(&[("A", 150), ("B", 114)])).unwrap();

    let json = game.snapshot().unwrap().to_json().unwrap();
    let snapshot = MatchSnapshot::from_json(&json).unwrap();
    let mut resumed = Match::restore(RulePreset::Hachihachi.load(), snapshot).unwrap();

    assert_eq!(resumed.standings(), game.standings());
    resumed.settle_month(&no_hand(&[("A", 132), ("B", 132)])).unwrap();
    assert_eq!(resumed.ledger().months_recorded(), 2);
}

#[test]
fn test_checkpoint_with_other_rules_rejected() {
    let game = Match::from_preset(RulePreset::Hachihachi, &["A", "B"]).unwrap();
    let snapshot = game.snapshot().unwrap();
    assert!(matches!(
        Match::restore(RulePreset::HachihachiHouse.load(), snapshot),
        Err(MatchError::Checkpoint(CheckpointError::ConfigMismatch { .. }))
    ));
}

#[test]
fn test_zero_month_snapshot_rejected() {
    let game = Match::from_preset(RulePreset::Hachihachi, &["A", "B"]).unwrap();
    let mut snapshot = game.snapshot().unwrap();
    snapshot.months_per_match = 0;
    assert!(matches!(
        Match::restore(RulePreset::Hachihachi.load(), snapshot),
        Err(MatchError::Checkpoint(CheckpointError::StateValidation(_)))
    ));
}

#[test]
fn test_standalone_ledger_append() {
    let mut ledger = ScoreLedger::new(&["A", "B"], 0);
    let mut month = ScoreSheet::new();
    month.set("A", 7);
    month.set("B", -7);
    ledger.append(1, &month).unwrap();
    ledger.append(4, &month).unwrap();
    assert!(ledger.append(2, &month).is_err());
    assert_eq!(ledger.totals().value("A"), 14);
}
