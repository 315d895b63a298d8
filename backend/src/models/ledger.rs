//! Score ledger
//!
//! Append-only per-match history: one initial row holding each player's
//! starting score, then one row per settled month. The ledger is the only
//! state that survives across rounds.
//!
//! # Critical Invariants
//!
//! 1. Month rows are appended in strictly increasing month order
//! 2. Every row covers exactly the ledger's players (late joiners read 0
//!    in rows recorded before they joined)

use crate::models::score_sheet::ScoreSheet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("Month {month} recorded out of order (last month {last})")]
    OutOfOrder { month: u32, last: u32 },

    #[error("Player not in ledger: {0}")]
    UnknownPlayer(String),

    #[error("Player already in ledger: {0}")]
    DuplicatePlayer(String),
}

/// Row key: the starting scores or a month number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowLabel {
    Initial,
    Month(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub label: RowLabel,
    pub scores: ScoreSheet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLedger {
    players: Vec<String>,
    rows: Vec<LedgerRow>,
}

impl ScoreLedger {
    /// Ledger whose initial row gives every player `initial_score`
    pub fn new<S: AsRef<str>>(players: &[S], initial_score: i64) -> Self {
        let mut initial = ScoreSheet::new();
        for player in players {
            initial.set(player.as_ref(), initial_score);
        }
        Self::with_initial_scores(&initial)
    }

    /// Ledger over the players of `initial`, each starting at their own score
    pub fn with_initial_scores(initial: &ScoreSheet) -> Self {
        Self {
            players: initial.players().map(str::to_string).collect(),
            rows: vec![LedgerRow {
                label: RowLabel::Initial,
                scores: initial.clone(),
            }],
        }
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn rows(&self) -> &[LedgerRow] {
        &self.rows
    }

    fn last_month(&self) -> u32 {
        self.rows
            .iter()
            .rev()
            .find_map(|r| match r.label {
                RowLabel::Month(m) => Some(m),
                RowLabel::Initial => None,
            })
            .unwrap_or(0)
    }

    /// Append one month's settlement
    ///
    /// Players missing from `scores` are recorded as 0.
    pub fn append(&mut self, month: u32, scores: &ScoreSheet) -> Result<(), LedgerError> {
        let last = self.last_month();
        if month <= last {
            return Err(LedgerError::OutOfOrder { month, last });
        }
        if let Some(stranger) = scores.players().find(|p| !self.players.iter().any(|q| q == p)) {
            return Err(LedgerError::UnknownPlayer(stranger.to_string()));
        }

        let mut row = ScoreSheet::zeroed(self.players.iter().cloned());
        for (player, score) in scores.iter() {
            row.set(player, score);
        }
        self.rows.push(LedgerRow {
            label: RowLabel::Month(month),
            scores: row,
        });
        Ok(())
    }

    /// Register a late joiner with their starting score
    pub fn add_player(&mut self, player: &str, initial_score: i64) -> Result<(), LedgerError> {
        if self.players.iter().any(|p| p == player) {
            return Err(LedgerError::DuplicatePlayer(player.to_string()));
        }
        self.players.push(player.to_string());
        for row in &mut self.rows {
            let score = match row.label {
                RowLabel::Initial => initial_score,
                RowLabel::Month(_) => 0,
            };
            row.scores.set(player, score);
        }
        Ok(())
    }

    /// Sum of every row per player
    pub fn totals(&self) -> ScoreSheet {
        let mut totals = ScoreSheet::zeroed(self.players.iter().cloned());
        for row in &self.rows {
            for (player, score) in row.scores.iter() {
                totals.add(player, score);
            }
        }
        totals
    }

    /// Running total of `player` after each row
    pub fn cumulative(&self, player: &str) -> Result<Vec<i64>, LedgerError> {
        if !self.players.iter().any(|p| p == player) {
            return Err(LedgerError::UnknownPlayer(player.to_string()));
        }
        let mut running = 0;
        Ok(self
            .rows
            .iter()
            .map(|row| {
                running += row.scores.value(player);
                running
            })
            .collect())
    }

    /// Change recorded for `player` in the latest month, if any month exists
    pub fn last_delta(&self, player: &str) -> Option<i64> {
        self.rows
            .last()
            .filter(|row| row.label != RowLabel::Initial)
            .and_then(|row| row.scores.get(player))
    }

    /// Player with the highest total (first on ties) and that total
    pub fn leader(&self) -> Option<(String, i64)> {
        let totals = self.totals();
        let leader = totals.leader()?.to_string();
        let score = totals.value(&leader);
        Some((leader, score))
    }

    pub fn months_recorded(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }
}
