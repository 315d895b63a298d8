//! Match session
//!
//! A `Match` owns the state that outlives a single round: the rule set in
//! force, the roster, the score ledger and the month calendar. Each call to
//! [`Match::settle_month`] settles one round with [`settle_round`] and appends
//! the resulting deltas to the ledger.

use crate::core::calendar::{MatchCalendar, MONTHS_PER_MATCH};
use crate::models::ledger::{LedgerError, ScoreLedger};
use crate::models::roster::{Roster, RosterError};
use crate::models::round::RoundInput;
use crate::models::score_sheet::ScoreSheet;
use crate::orchestrator::checkpoint::{validate_snapshot, CheckpointError, MatchSnapshot};
use crate::orchestrator::engine::{settle_round, SettlementResult};
use crate::rules::{RulePreset, RuleSet, RuleSetError, MAX_SCORE};
use crate::settlement::SettlementError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MatchError {
    #[error("Match already finished after {months} months")]
    Finished { months: u32 },

    #[error(transparent)]
    Settlement(#[from] SettlementError),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    RuleSet(#[from] RuleSetError),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
}

#[derive(Debug, Clone)]
pub struct Match {
    rules: RuleSet,
    roster: Roster,
    ledger: ScoreLedger,
    calendar: MatchCalendar,
}

impl Match {
    /// Start a 12-month match; every player starts at the family's initial score
    pub fn new(rules: RuleSet, roster: Roster) -> Result<Self, MatchError> {
        Self::with_initial_scores(rules, roster, &ScoreSheet::new())
    }

    /// Start a 12-month match with per-player starting scores
    ///
    /// Roster players missing from `initial` start at the family's initial
    /// score. Naming a player outside the roster is an error.
    pub fn with_initial_scores(
        rules: RuleSet,
        roster: Roster,
        initial: &ScoreSheet,
    ) -> Result<Self, MatchError> {
        rules.validate()?;
        if let Some(stranger) = initial.players().find(|p| !roster.contains(p)) {
            return Err(LedgerError::UnknownPlayer(stranger.to_string()).into());
        }

        let mut starting = ScoreSheet::new();
        for player in roster.players() {
            let score = initial.get(player).unwrap_or_else(|| rules.initial_score());
            if score.unsigned_abs() > MAX_SCORE.unsigned_abs() {
                return Err(SettlementError::ScoreOutOfRange {
                    player: player.clone(),
                    score,
                }
                .into());
            }
            starting.set(player, score);
        }
        let ledger = ScoreLedger::with_initial_scores(&starting);
        Ok(Self {
            rules,
            roster,
            ledger,
            calendar: MatchCalendar::new(MONTHS_PER_MATCH),
        })
    }

    pub fn from_preset<S: AsRef<str>>(preset: RulePreset, names: &[S]) -> Result<Self, MatchError> {
        Self::new(preset.load(), Roster::new(names)?)
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    pub fn calendar(&self) -> &MatchCalendar {
        &self.calendar
    }

    pub fn is_finished(&self) -> bool {
        self.calendar.is_finished()
    }

    /// Current totals per player, starting score included
    pub fn standings(&self) -> ScoreSheet {
        self.ledger.totals()
    }

    /// Settle the current month and record it in the ledger
    pub fn settle_month(&mut self, input: &RoundInput) -> Result<SettlementResult, MatchError> {
        if self.calendar.is_finished() {
            return Err(MatchError::Finished {
                months: self.calendar.months_played(),
            });
        }
        let month = self.calendar.current_month();
        let result = settle_round(&self.rules, &self.roster, input)?;
        self.ledger.append(month, &result.deltas)?;
        self.calendar.advance_month();

        log::debug!("month {} recorded", month);
        Ok(result)
    }

    /// Late join; returns the name the player was registered under
    pub fn add_player(&mut self, name: &str) -> Result<String, MatchError> {
        let name = self.roster.add_player(name)?;
        self.ledger.add_player(&name, self.rules.initial_score())?;
        Ok(name)
    }

    /// Replace the rule set wholesale; recorded months are kept
    pub fn set_rules(&mut self, rules: RuleSet) -> Result<(), MatchError> {
        rules.validate()?;
        self.rules = rules;
        Ok(())
    }

    pub fn load_preset(&mut self, preset: RulePreset) {
        self.rules = preset.load();
    }

    /// Restart from month 1 with the same roster and rules
    ///
    /// Every player goes back to the family's initial score, including those
    /// who started the match with a custom score.
    pub fn reset_scores(&mut self) {
        self.ledger = ScoreLedger::new(self.roster.players(), self.rules.initial_score());
        self.calendar.reset();
    }

    pub fn snapshot(&self) -> Result<MatchSnapshot, MatchError> {
        Ok(MatchSnapshot {
            roster: self.roster.players().to_vec(),
            ledger: self.ledger.clone(),
            months_played: self.calendar.months_played(),
            months_per_match: self.calendar.months_per_match(),
            config_hash: self.rules.config_hash()?,
        })
    }

    /// Resume a match saved with [`Match::snapshot`] under the same rules
    pub fn restore(rules: RuleSet, snapshot: MatchSnapshot) -> Result<Self, MatchError> {
        validate_snapshot(&snapshot, &rules)?;
        let roster = Roster::new(&snapshot.roster)?;
        if roster.players() != snapshot.roster.as_slice() {
            return Err(CheckpointError::StateValidation(
                "snapshot roster contains duplicate names".to_string(),
            )
            .into());
        }
        Ok(Self {
            rules,
            roster,
            ledger: snapshot.ledger,
            calendar: MatchCalendar::resume(snapshot.months_per_match, snapshot.months_played),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::round::{Outcome, PlayerCapture};

    fn no_hand(a: i64, b: i64) -> RoundInput {
        RoundInput::new(Outcome::NoHand)
            .with_capture("A", PlayerCapture::ManualScore(a))
            .with_capture("B", PlayerCapture::ManualScore(b))
    }

    #[test]
    fn test_month_appended_to_ledger() {
        let mut game = Match::from_preset(RulePreset::Hachihachi, &["A", "B"]).unwrap();
        game.settle_month(&no_hand(150, 114)).unwrap();

        assert_eq!(game.calendar().current_month(), 2);
        assert_eq!(game.standings().value("A"), 96);
        assert_eq!(game.standings().value("B"), 24);
    }

    #[test]
    fn test_custom_starting_scores() {
        let roster = Roster::new(&["A", "B", "C"]).unwrap();
        let mut initial = ScoreSheet::new();
        initial.set("A", 100);
        initial.set("C", 20);
        let mut game =
            Match::with_initial_scores(RulePreset::Hachihachi.load(), roster, &initial).unwrap();

        assert_eq!(game.standings().value("A"), 100);
        assert_eq!(game.standings().value("B"), 60);
        assert_eq!(game.standings().value("C"), 20);

        game.reset_scores();
        assert_eq!(game.standings().value("A"), 60);
        assert_eq!(game.standings().value("C"), 60);
    }

    #[test]
    fn test_starting_score_for_stranger_rejected() {
        let roster = Roster::new(&["A", "B"]).unwrap();
        let mut initial = ScoreSheet::new();
        initial.set("Z", 10);
        assert_eq!(
            Match::with_initial_scores(RuleSet::default(), roster, &initial).unwrap_err(),
            MatchError::Ledger(LedgerError::UnknownPlayer("Z".to_string()))
        );
    }

    #[test]
    fn test_match_ends_after_twelve_months() {
        let mut game = Match::from_preset(RulePreset::KoiKoi, &["A", "B"]).unwrap();
        for _ in 0..12 {
            game.settle_month(&no_hand(0, 0)).unwrap();
        }
        assert!(game.is_finished());
        assert_eq!(
            game.settle_month(&no_hand(0, 0)).unwrap_err(),
            MatchError::Finished { months: 12 }
        );

        game.reset_scores();
        assert!(!game.is_finished());
        assert_eq!(game.ledger().months_recorded(), 0);
    }

    #[test]
    fn test_failed_round_leaves_ledger_untouched() {
        let mut game = Match::from_preset(RulePreset::Hachihachi, &["A", "B"]).unwrap();
        let bad = RoundInput::new(Outcome::NoHand).with_custom_multiplier(0);
        assert!(game.settle_month(&bad).is_err());
        assert_eq!(game.ledger().months_recorded(), 0);
        assert_eq!(game.calendar().current_month(), 1);
    }

    #[test]
    fn test_late_joiner_starts_at_initial_score() {
        let mut game = Match::from_preset(RulePreset::Hachihachi, &["A", "B", "C"]).unwrap();
        game.settle_month(&no_hand(100, 100)).unwrap();
        assert_eq!(game.add_player("A").unwrap(), "A_1");
        assert_eq!(game.standings().value("A_1"), 60);
        assert_eq!(game.roster().len(), 4);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut game = Match::from_preset(RulePreset::Hachihachi, &["A", "B"]).unwrap();
        game.settle_month(&no_hand(140, 124)).unwrap();

        let snapshot = game.snapshot().unwrap();
        let restored = Match::restore(RulePreset::Hachihachi.load(), snapshot.clone()).unwrap();
        assert_eq!(restored.standings(), game.standings());
        assert_eq!(restored.calendar().current_month(), 2);

        assert!(Match::restore(RulePreset::KoiKoi.load(), snapshot).is_err());
    }
}
