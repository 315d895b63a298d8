//! Type conversion utilities for FFI boundary
//!
//! Rounds and rule sets cross the boundary as JSON strings; results come back
//! as JSON or as plain Python dicts for the small read-only views.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::ScoreSheet;
use crate::rules::{RulePreset, RuleSet};

/// Parse a JSON argument, raising ValueError naming the argument on failure
pub fn parse_json<T: DeserializeOwned>(json: &str, what: &str) -> PyResult<T> {
    serde_json::from_str(json)
        .map_err(|e| PyValueError::new_err(format!("Invalid {} JSON: {}", what, e)))
}

pub fn to_json<T: Serialize>(value: &T) -> PyResult<String> {
    serde_json::to_string(value)
        .map_err(|e| PyRuntimeError::new_err(format!("Serialization failed: {}", e)))
}

/// Rule set from either a preset name or a JSON snapshot
pub fn parse_rules(rules: &str) -> PyResult<RuleSet> {
    if let Ok(preset) = rules.parse::<RulePreset>() {
        return Ok(preset.load());
    }
    RuleSet::from_json(rules).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Any settlement-side error surfaces as ValueError
pub fn value_error<E: std::fmt::Display>(err: E) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Convert a ScoreSheet to an insertion-ordered Python dict
pub fn score_sheet_to_py(py: Python<'_>, sheet: &ScoreSheet) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new_bound(py);
    for (player, score) in sheet.iter() {
        dict.set_item(player, score)?;
    }
    Ok(dict.unbind())
}
