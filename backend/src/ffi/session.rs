//! PyO3 wrapper for Match
//!
//! Python drives a match month by month; each month's round is passed as a
//! JSON string and the settlement result comes back as JSON.
//!
//! # Example (from Python)
//!
//! ```python
//! from hanafuda_settlement_core_rs import Match
//!
//! game = Match("hachihachi", ["Ann", "Ben", "Cid"])
//! result = game.settle_month('{"outcome": {"type": "no_hand"}}')
//! print(game.standings())
//! ```

use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::collections::HashMap;

use super::types::{parse_json, parse_rules, score_sheet_to_py, to_json, value_error};
use crate::models::{Roster, RoundInput, ScoreSheet};
use crate::orchestrator::Match as RustMatch;

#[pyclass(name = "Match")]
pub struct PyMatch {
    inner: RustMatch,
}

#[pymethods]
impl PyMatch {
    /// Start a match
    ///
    /// `rules` is a preset name or a rule set JSON snapshot. Players left out
    /// of `initial_scores` start at the family default.
    #[new]
    #[pyo3(signature = (rules, players, initial_scores=None))]
    fn new(
        rules: &str,
        players: Vec<String>,
        initial_scores: Option<HashMap<String, i64>>,
    ) -> PyResult<Self> {
        let rules = parse_rules(rules)?;
        let roster = Roster::new(&players).map_err(value_error)?;
        let mut initial = ScoreSheet::new();
        for (player, score) in initial_scores.unwrap_or_default() {
            initial.set(&player, score);
        }
        let inner = RustMatch::with_initial_scores(rules, roster, &initial).map_err(value_error)?;
        Ok(PyMatch { inner })
    }

    /// Settle the current month; returns the SettlementResult as JSON
    fn settle_month(&mut self, round_json: &str) -> PyResult<String> {
        let input: RoundInput = parse_json(round_json, "round")?;
        let result = self.inner.settle_month(&input).map_err(value_error)?;
        to_json(&result)
    }

    /// Late join; returns the registered name
    fn add_player(&mut self, name: &str) -> PyResult<String> {
        self.inner.add_player(name).map_err(value_error)
    }

    fn reset_scores(&mut self) {
        self.inner.reset_scores();
    }

    fn current_month(&self) -> u32 {
        self.inner.calendar().current_month()
    }

    fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    fn players(&self) -> Vec<String> {
        self.inner.roster().players().to_vec()
    }

    /// Totals per player, starting score included
    fn standings(&self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        score_sheet_to_py(py, &self.inner.standings())
    }

    /// Full ledger as JSON
    fn ledger_json(&self) -> PyResult<String> {
        to_json(self.inner.ledger())
    }

    fn snapshot_json(&self) -> PyResult<String> {
        let snapshot = self.inner.snapshot().map_err(value_error)?;
        to_json(&snapshot)
    }
}
