//! Python bindings
//!
//! - `settle_round_json(rules, players, round_json)`: one stateless settlement
//! - `preset_json(name)`: a preset rule set as JSON
//! - `Match`: month-by-month match with a ledger

pub mod session;
pub mod types;

use pyo3::prelude::*;

use crate::models::{Roster, RoundInput};
use crate::orchestrator::settle_round;
use crate::rules::RulePreset;
use types::{parse_json, parse_rules, to_json, value_error};

/// Settle one round; `rules` is a preset name or a rule set JSON snapshot
#[pyfunction]
pub fn settle_round_json(rules: &str, players: Vec<String>, round_json: &str) -> PyResult<String> {
    let rules = parse_rules(rules)?;
    let roster = Roster::new(&players).map_err(value_error)?;
    let input: RoundInput = parse_json(round_json, "round")?;
    let result = settle_round(&rules, &roster, &input).map_err(value_error)?;
    to_json(&result)
}

#[pyfunction]
pub fn preset_json(name: &str) -> PyResult<String> {
    let preset: RulePreset = name.parse().map_err(value_error)?;
    preset.load().to_json().map_err(value_error)
}
